//! The printable report view.
//!
//! Renders a self-contained HTML document with its own print-oriented styles
//! and hands it to the browser's print dialog. No binary PDF is produced; the
//! user prints or saves from the dialog.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::OffsetDateTime;

use crate::{
    Error,
    dates::{canonical_date_string, get_local_offset},
    html::{format_currency, render},
    report::{
        core::{Report, ReportQuery},
        page::{ReportViewState, load_report},
    },
    transaction::TransactionKind,
};

/// The name printed at the top of every report.
const SCHOOL_NAME: &str = "One Ummah School";

const PRINT_STYLE: &str = "
    body { font-family: Arial, sans-serif; margin: 40px; color: #333; line-height: 1.6; }
    .header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #2d5a2d; padding-bottom: 20px; }
    .school-name { color: #2d5a2d; font-size: 24px; font-weight: bold; margin: 0; }
    .report-title { color: #666; font-size: 18px; margin: 5px 0; }
    .date-range { color: #888; font-size: 14px; margin-top: 10px; }
    .summary { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #2d5a2d; }
    .summary-row { display: flex; justify-content: space-between; margin: 10px 0; padding: 5px 0; }
    .summary-row.total { border-top: 2px solid #2d5a2d; font-weight: bold; font-size: 16px; margin-top: 15px; padding-top: 15px; }
    table { width: 100%; border-collapse: collapse; margin-top: 20px; background: white; }
    th, td { border: 1px solid #ddd; padding: 12px 8px; text-align: left; }
    th { background-color: #2d5a2d; color: white; font-weight: bold; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    .credit { color: #10b981; font-weight: bold; }
    .debit { color: #ef4444; font-weight: bold; }
    .amount { text-align: right; }
    .footer { margin-top: 40px; text-align: center; color: #666; font-size: 12px; border-top: 1px solid #ddd; padding-top: 20px; }
    .no-data { text-align: center; color: #666; font-style: italic; padding: 40px; }
";

/// Display the printable version of the requested report and open the print
/// dialog.
pub async fn get_report_print_page(
    State(state): State<ReportViewState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let report = load_report(&state, &query)?;

    let generated_on = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let document = html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="utf-8";
                title { (report.report_type.title()) }
                style { (PreEscaped(PRINT_STYLE)) }
            }

            body
            {
                div class="header"
                {
                    h1 class="school-name" { (SCHOOL_NAME) }
                    h2 class="report-title" { (report.report_type.title()) }
                    p class="date-range" { (report.period_label()) }
                }

                (summary_block(&report))

                (report_rows(&report))

                div class="footer"
                {
                    p { "Generated on " (canonical_date_string(generated_on)) }
                    p { (SCHOOL_NAME) " Finance Management System" }
                }

                script { (PreEscaped("window.onload = function () { window.print(); };")) }
            }
        }
    };

    Ok(render(StatusCode::OK, document))
}

fn summary_block(report: &Report) -> Markup {
    let balance_class = if report.balance >= 0.0 { "credit" } else { "debit" };

    html! {
        div class="summary"
        {
            h3 { "Financial Summary" }

            div class="summary-row"
            {
                span { "Total Credit (Income):" }
                span class="credit" { (format_currency(report.total_credit)) }
            }

            div class="summary-row"
            {
                span { "Total Debit (Expenses):" }
                span class="debit" { (format_currency(report.total_debit)) }
            }

            div class="summary-row total"
            {
                span { "Net Balance:" }
                span class=(balance_class) { (format_currency(report.balance)) }
            }
        }
    }
}

fn report_rows(report: &Report) -> Markup {
    if report.rows.is_empty() {
        return html! {
            div class="no-data"
            {
                p { "No transactions found for the selected criteria." }
            }
        };
    }

    html! {
        table
        {
            thead
            {
                tr
                {
                    th { "Date" }
                    th { "Type" }
                    th { "Category" }
                    th { "Description" }
                    th { "Amount" }
                }
            }

            tbody
            {
                @for transaction in &report.rows {
                    tr
                    {
                        td { (canonical_date_string(transaction.date)) }
                        td
                        {
                            span class=(transaction.kind.as_str()) { (transaction.kind.label()) }
                        }
                        td { (transaction.category) }
                        td
                        {
                            @if transaction.description.is_empty() { "-" }
                            @else { (transaction.description) }
                        }
                        td class=(format!("amount {}", transaction.kind.as_str()))
                        {
                            @if transaction.kind == TransactionKind::Credit { "+" } @else { "-" }
                            (format_currency(transaction.amount))
                        }
                    }
                }
            }
        }
    }
}
