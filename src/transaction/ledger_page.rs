//! The credits and debits ledger pages.
//!
//! Both pages render the same table over the transaction collection, scoped
//! to one kind and narrowed by the search, category, and date range controls.
//! The whole collection is reloaded from the database on every request.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregate::{average_per_transaction, total_by_kind},
    dates::{canonical_date_string, get_local_offset, normalize_date_text, parse_canonical_date},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, CARD_TITLE_STYLE, CARD_VALUE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_class, base,
        format_currency, render, truncate_description,
    },
    navigation::NavBar,
    transaction::{
        Transaction, TransactionFilter, TransactionKind,
        core::get_all_transactions,
        filter::ALL_CATEGORIES,
    },
};

/// The state needed for the ledger pages.
#[derive(Debug, Clone)]
pub struct LedgerViewState {
    /// The database connection to load transactions from.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The filter controls submitted by the ledger pages, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// Substring to look for in descriptions and categories.
    pub search: Option<String>,
    /// Category to restrict to, or the sentinel "all".
    pub category: Option<String>,
    /// Start of the date range, in any form the date normalizer understands.
    pub from: Option<String>,
    /// End of the date range.
    pub to: Option<String>,
}

impl LedgerQuery {
    /// Turn the raw query into a filter scoped to `kind`.
    ///
    /// Unparseable date bounds are dropped rather than reported; the page
    /// simply shows the unrestricted range.
    fn into_filter(self, kind: TransactionKind, local_offset: time::UtcOffset) -> TransactionFilter {
        let parse_bound = |text: Option<String>| {
            text.and_then(|text| {
                parse_canonical_date(&normalize_date_text(&text, local_offset)).ok()
            })
        };

        TransactionFilter {
            search: self.search,
            category: self.category,
            kind: Some(kind),
            from: parse_bound(self.from),
            to: parse_bound(self.to),
        }
    }
}

/// Display the ledger of credit transactions.
pub async fn get_credits_page(
    State(state): State<LedgerViewState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, Error> {
    ledger_page(TransactionKind::Credit, state, query)
}

/// Display the ledger of debit transactions.
pub async fn get_debits_page(
    State(state): State<LedgerViewState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, Error> {
    ledger_page(TransactionKind::Debit, state, query)
}

fn ledger_page(
    kind: TransactionKind,
    state: LedgerViewState,
    query: LedgerQuery,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let transactions = {
        let connection = state.db_connection.lock().unwrap();

        get_all_transactions(&connection)?
    };

    let selected_category = query.category.clone();
    let filter = query.into_filter(kind, local_offset);
    let rows = filter.select(&transactions);
    let total = total_by_kind(&rows, kind);
    let average = average_per_transaction(&rows);

    let (page_title, active_endpoint, new_label) = match kind {
        TransactionKind::Credit => ("Credits", endpoints::CREDITS_VIEW, "Record credit"),
        TransactionKind::Debit => ("Debits", endpoints::DEBITS_VIEW, "Record debit"),
    };

    let categories = known_categories(&transactions, kind);

    let content = html! {
        (NavBar::new(active_endpoint).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center justify-between mb-4"
            {
                h1 class="text-2xl font-bold" { (page_title) }

                a
                    href=(format!("{}?kind={}", endpoints::NEW_TRANSACTION_VIEW, kind.as_str()))
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    (new_label)
                }
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div class=(CARD_STYLE)
                {
                    span class=(CARD_TITLE_STYLE) { "Total (filtered)" }
                    span class=(format!("{CARD_VALUE_STYLE} {}", amount_class(kind)))
                    {
                        (format_currency(total))
                    }
                }

                div class=(CARD_STYLE)
                {
                    span class=(CARD_TITLE_STYLE) { "Average amount" }
                    span class=(CARD_VALUE_STYLE) { (format_currency(average)) }
                }
            }

            (filter_form(active_endpoint, &filter, selected_category.as_deref(), &categories))

            (transaction_table(&rows))
        }
    };

    Ok(render(StatusCode::OK, base(page_title, &content)))
}

/// The distinct categories present among stored records of `kind`, in the
/// order first seen.
fn known_categories(transactions: &[Transaction], kind: TransactionKind) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for transaction in transactions {
        if transaction.kind == kind && !categories.contains(&transaction.category) {
            categories.push(transaction.category.clone());
        }
    }

    categories
}

fn filter_form(
    action: &str,
    filter: &TransactionFilter,
    selected_category: Option<&str>,
    categories: &[String],
) -> Markup {
    html! {
        form method="get" action=(action) class="flex flex-wrap items-end gap-4 my-4"
        {
            div
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="text"
                    name="search"
                    id="search"
                    class=(FORM_TEXT_INPUT_STYLE)
                    placeholder="Description or category"
                    value=[filter.search.as_deref()];
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL_CATEGORIES) { "All categories" }

                    @for category in categories {
                        option
                            value=(category)
                            selected[selected_category == Some(category.as_str())]
                        {
                            (category)
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
                    value=[filter.from.map(canonical_date_string)];
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="to"
                    id="to"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[filter.to.map(canonical_date_string)];
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

            a href=(action) class=(LINK_STYLE) { "Clear" }
        }
    }
}

fn transaction_table(rows: &[Transaction]) -> Markup {
    html! {
        div class="relative overflow-x-auto rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5" { "No transactions match." }
                        }
                    }

                    @for transaction in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (canonical_date_string(transaction.date)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (truncate_description(&transaction.description))
                            }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_class(transaction.kind)))
                            {
                                (format_currency(transaction.amount))
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id))
                                    class=(format!("{LINK_STYLE} me-3"))
                                {
                                    "Edit"
                                }

                                button
                                    class=(BUTTON_DELETE_STYLE)
                                    hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction.id))
                                    hx-target="closest tr"
                                    hx-swap="outerHTML"
                                    hx-confirm="Delete this transaction? This cannot be undone."
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod ledger_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{LedgerQuery, LedgerViewState, get_credits_page, get_debits_page};

    fn get_test_state() -> LedgerViewState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        LedgerViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn seed_school_ledger(state: &LedgerViewState) {
        let connection = state.db_connection.lock().unwrap();

        for (kind, amount, category, description, date) in [
            (TransactionKind::Credit, 50_000.0, "Fee", "Term fees, class 5", date!(2024 - 12 - 15)),
            (TransactionKind::Credit, 7_500.0, "Donation", "Alumni donation", date!(2024 - 11 - 02)),
            (TransactionKind::Debit, 25_000.0, "Salary", "December salaries", date!(2024 - 12 - 14)),
        ] {
            create_transaction(
                Transaction::build(kind, amount, date)
                    .category(category)
                    .description(description),
                &connection,
            )
            .unwrap();
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn credits_page_shows_only_credits() {
        let state = get_test_state();
        seed_school_ledger(&state);

        let response = get_credits_page(State(state), Query(LedgerQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("Term fees, class 5"));
        assert!(text.contains("Alumni donation"));
        assert!(!text.contains("December salaries"));
        // Total and average over both credits.
        assert!(text.contains("Rs57,500"));
        assert!(text.contains("Rs28,750"));
    }

    #[tokio::test]
    async fn debits_page_shows_only_debits() {
        let state = get_test_state();
        seed_school_ledger(&state);

        let response = get_debits_page(State(state), Query(LedgerQuery::default()))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("December salaries"));
        assert!(!text.contains("Term fees, class 5"));
        assert!(text.contains("Rs25,000"));
    }

    #[tokio::test]
    async fn search_narrows_the_table_and_total() {
        let state = get_test_state();
        seed_school_ledger(&state);

        let response = get_credits_page(
            State(state),
            Query(LedgerQuery {
                search: Some("donation".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("Alumni donation"));
        assert!(!text.contains("Term fees, class 5"));
        assert!(text.contains("Rs7,500"));
    }

    #[tokio::test]
    async fn date_range_requires_both_bounds() {
        let state = get_test_state();
        seed_school_ledger(&state);

        // Only a lower bound: the range must not activate.
        let response = get_credits_page(
            State(state.clone()),
            Query(LedgerQuery {
                from: Some("2024-12-01".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("Alumni donation"));

        // Both bounds: only December's credit remains.
        let response = get_credits_page(
            State(state),
            Query(LedgerQuery {
                from: Some("2024-12-01".to_owned()),
                to: Some("2024-12-31".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("Term fees, class 5"));
        assert!(!text.contains("Alumni donation"));
    }

    #[tokio::test]
    async fn empty_ledger_shows_placeholder_row() {
        let state = get_test_state();

        let response = get_credits_page(State(state), Query(LedgerQuery::default()))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("No transactions match."));
    }
}
