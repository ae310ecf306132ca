//! The dashboard page: the running position of the school's books and the
//! latest activity.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregate::{net_balance, total_by_kind},
    dates::canonical_date_string,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, CARD_TITLE_STYLE, CARD_VALUE_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_class,
        base, format_currency, kind_badge, render, truncate_description,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, get_all_transactions},
};

/// How many of the latest transactions the dashboard lists.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection to load transactions from.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the school's books.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state.db_connection.lock().unwrap();

        get_all_transactions(&connection)?
    };

    let balance = net_balance(&transactions);
    let total_credit = total_by_kind(&transactions, TransactionKind::Credit);
    let total_debit = total_by_kind(&transactions, TransactionKind::Debit);

    let balance_class = if balance >= 0.0 {
        amount_class(TransactionKind::Credit)
    } else {
        amount_class(TransactionKind::Debit)
    };

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center justify-between mb-4"
            {
                h1 class="text-2xl font-bold" { "Dashboard" }

                div class="flex gap-4"
                {
                    a
                        href=(format!("{}?kind=credit", endpoints::NEW_TRANSACTION_VIEW))
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Record credit"
                    }

                    a
                        href=(format!("{}?kind=debit", endpoints::NEW_TRANSACTION_VIEW))
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Record debit"
                    }
                }
            }

            div class="grid gap-4 md:grid-cols-3 mb-4"
            {
                div class=(CARD_STYLE)
                {
                    span class=(CARD_TITLE_STYLE) { "Balance" }
                    span class=(format!("{CARD_VALUE_STYLE} {balance_class}"))
                    {
                        (format_currency(balance))
                    }
                }

                div class=(CARD_STYLE)
                {
                    span class=(CARD_TITLE_STYLE) { "Total Credit" }
                    span class=(format!(
                        "{CARD_VALUE_STYLE} {}",
                        amount_class(TransactionKind::Credit)
                    ))
                    {
                        (format_currency(total_credit))
                    }
                }

                div class=(CARD_STYLE)
                {
                    span class=(CARD_TITLE_STYLE) { "Total Debit" }
                    span class=(format!(
                        "{CARD_VALUE_STYLE} {}",
                        amount_class(TransactionKind::Debit)
                    ))
                    {
                        (format_currency(total_debit))
                    }
                }
            }

            (recent_transactions(&transactions))
        }
    };

    Ok(render(StatusCode::OK, base("Dashboard", &content)))
}

fn recent_transactions(transactions: &[Transaction]) -> Markup {
    // `get_all_transactions` already returns the most recent day first.
    let recent = &transactions[..transactions.len().min(RECENT_TRANSACTION_COUNT)];

    html! {
        div class="flex items-center justify-between mb-2"
        {
            h2 class="text-lg font-bold" { "Recent Transactions" }

            a href=(endpoints::CREDITS_VIEW) class=(LINK_STYLE) { "View all" }
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
                    }
                }

                tbody
                {
                    @if recent.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5"
                            {
                                "Nothing recorded yet. Record the first credit or debit above."
                            }
                        }
                    }

                    @for transaction in recent {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (canonical_date_string(transaction.date))
                            }
                            td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (truncate_description(&transaction.description))
                            }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_class(transaction.kind)))
                            {
                                (format_currency(transaction.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}
