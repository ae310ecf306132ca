//! Defines the route handler for the page that edits an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Response,
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{PAGE_CONTAINER_STYLE, base, render},
    navigation::NavBar,
    not_found::get_404_not_found_response,
    transaction::{
        core::get_transaction,
        form::{FormMethod, FormValues, transaction_form},
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection to load the transaction from.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing transaction `transaction_id`, with the form
/// pre-filled from the stored record.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let transaction = {
        let connection = state.db_connection.lock().unwrap();

        match get_transaction(transaction_id, &connection) {
            Ok(transaction) => transaction,
            Err(Error::NotFound) => return get_404_not_found_response(),
            Err(error) => return error.into_alert_response(),
        }
    };

    let form = transaction_form(
        FormMethod::Put(format_endpoint(endpoints::TRANSACTION, transaction_id)),
        &FormValues {
            kind: transaction.kind,
            amount: Some(transaction.amount),
            category: transaction.category,
            description: transaction.description,
            date: transaction.date,
        },
        "Save changes",
    );

    let content = html! {
        (NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Edit transaction" }

            (form)
        }
    };

    render(StatusCode::OK, base("Edit Transaction", &content))
}
