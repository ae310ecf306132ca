//! The reports page: report type and period controls, summary cards, category
//! breakdown, and the report table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregate::{percent_of_kind_total, running_balance},
    dates::{canonical_date_string, get_local_offset},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, CARD_TITLE_STYLE, CARD_VALUE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_class, base, format_currency, kind_badge,
        render, truncate_description,
    },
    navigation::NavBar,
    report::core::{Report, ReportQuery, ReportType},
    transaction::{TransactionKind, get_all_transactions},
};

/// The state needed for the report views and exports.
#[derive(Debug, Clone)]
pub struct ReportViewState {
    /// The database connection to load transactions from.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Load the full collection and assemble the report the query asks for.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub(super) fn load_report(state: &ReportViewState, query: &ReportQuery) -> Result<Report, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let transactions = {
        let connection = state.db_connection.lock().unwrap();

        get_all_transactions(&connection)?
    };

    let report_type = query.report.unwrap_or_default();
    let (from, to) = query.resolve_period(local_offset);

    Ok(Report::assemble(report_type, from, to, &transactions))
}

/// The query string that reproduces `report` on another report endpoint.
pub(super) fn report_query_string(report: &Report) -> String {
    let query = ReportQuery {
        report: Some(report.report_type),
        from: Some(canonical_date_string(report.from)),
        to: Some(canonical_date_string(report.to)),
    };

    // Serializing a struct of strings cannot fail.
    serde_urlencoded::to_string(&query).unwrap_or_default()
}

/// Display the reports page.
pub async fn get_reports_page(
    State(state): State<ReportViewState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let report = load_report(&state, &query)?;
    let query_string = report_query_string(&report);

    let content = html! {
        (NavBar::new(endpoints::REPORTS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center justify-between mb-4"
            {
                h1 class="text-2xl font-bold" { "Reports" }

                div class="flex gap-4 items-center"
                {
                    a
                        href=(format!("{}?{query_string}", endpoints::REPORT_PRINT_VIEW))
                        target="_blank"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Print"
                    }

                    a
                        href=(format!("{}?{query_string}", endpoints::EXPORT_CSV))
                        class=(LINK_STYLE)
                    {
                        "Download CSV"
                    }
                }
            }

            (report_controls(&report))

            (summary_cards(&report))

            @if !report.breakdown.is_empty() {
                (breakdown_section(&report))
            }

            (report_table(&report))
        }
    };

    Ok(render(StatusCode::OK, base("Reports", &content)))
}

fn report_controls(report: &Report) -> Markup {
    html! {
        form method="get" action=(endpoints::REPORTS_VIEW) class="flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="report" class=(FORM_LABEL_STYLE) { "Report type" }
                select name="report" id="report" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for report_type in ReportType::ALL {
                        option
                            value=(report_type.as_str())
                            selected[report.report_type == report_type]
                        {
                            (report_type.title())
                        }
                    }
                }
            }

            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="from"
                    id="from"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(canonical_date_string(report.from));
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="to"
                    id="to"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(canonical_date_string(report.to));
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Build report" }
        }
    }
}

fn summary_cards(report: &Report) -> Markup {
    let balance_class = if report.balance >= 0.0 {
        amount_class(TransactionKind::Credit)
    } else {
        amount_class(TransactionKind::Debit)
    };

    html! {
        div class="grid gap-4 md:grid-cols-3 mb-4"
        {
            div class=(CARD_STYLE)
            {
                span class=(CARD_TITLE_STYLE) { "Total Credit" }
                span class=(format!("{CARD_VALUE_STYLE} {}", amount_class(TransactionKind::Credit)))
                {
                    (format_currency(report.total_credit))
                }
            }

            div class=(CARD_STYLE)
            {
                span class=(CARD_TITLE_STYLE) { "Total Debit" }
                span class=(format!("{CARD_VALUE_STYLE} {}", amount_class(TransactionKind::Debit)))
                {
                    (format_currency(report.total_debit))
                }
            }

            div class=(CARD_STYLE)
            {
                span class=(CARD_TITLE_STYLE) { "Net Balance" }
                span class=(format!("{CARD_VALUE_STYLE} {balance_class}"))
                {
                    (format_currency(report.balance))
                }
            }
        }
    }
}

fn breakdown_section(report: &Report) -> Markup {
    html! {
        div class=(format!("{CARD_STYLE} mb-4"))
        {
            h2 class="text-lg font-bold" { "Category Breakdown" }

            @for group in &report.breakdown {
                div class="flex items-center justify-between py-2 border-b last:border-b-0 dark:border-gray-700"
                {
                    div
                    {
                        p class="font-medium" { (group.category) }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (group.count)
                            @if group.count == 1 { " transaction" } @else { " transactions" }
                            " · "
                            (group.kind.as_str())
                        }
                    }

                    div class="text-right"
                    {
                        p class=(format!("font-semibold {}", amount_class(group.kind)))
                        {
                            (format_currency(group.amount))
                        }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (format!(
                                "{:.1}%",
                                percent_of_kind_total(group.amount, report.kind_total(group.kind))
                            ))
                        }
                    }
                }
            }
        }
    }
}

fn report_table(report: &Report) -> Markup {
    let with_balance = report.report_type.shows_running_balance();
    let rows = running_balance(&report.rows);

    html! {
        h2 class="text-lg font-bold mb-2"
        {
            (report.report_type.title()) " · " (report.period_label())
        }

        div class="relative overflow-x-auto rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        @if with_balance {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Running Balance" }
                        }
                    }
                }

                tbody
                {
                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan=(if with_balance { "6" } else { "5" })
                            {
                                "No transactions found for the selected criteria."
                            }
                        }
                    }

                    @for (transaction, balance) in &rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (canonical_date_string(transaction.date)) }
                            td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (truncate_description(&transaction.description))
                            }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_class(transaction.kind)))
                            {
                                (format_currency(transaction.kind.signed(transaction.amount)))
                            }
                            @if with_balance {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_currency(*balance))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
