//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    dates::{get_local_offset, normalize_date_text, parse_canonical_date},
    endpoints,
    html::render,
    transaction::{
        Transaction, TransactionBuilder, TransactionKind,
        core::create_transaction,
    },
};

/// The state needed to create, update, or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating or updating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is a credit or a debit, as a lowercase string.
    pub kind: String,
    /// The value of the transaction in rupees.
    pub amount: f64,
    /// The date when the transaction occurred, in any form the date
    /// normalizer understands.
    pub date: String,
    /// The category label.
    pub category: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// Turn the raw form data into a validated builder, or an alert response
/// describing what was wrong.
pub(super) fn builder_from_form(
    form: &TransactionForm,
    local_offset: UtcOffset,
) -> Result<TransactionBuilder, Response> {
    let kind: TransactionKind = form
        .kind
        .parse()
        .map_err(|error: Error| error.into_alert_response())?;

    let date = parse_canonical_date(&normalize_date_text(&form.date, local_offset)).map_err(|_| {
        render(
            StatusCode::BAD_REQUEST,
            AlertTemplate::error(
                "Invalid date",
                &format!("\"{}\" is not a date the app understands. Use YYYY-MM-DD.", form.date),
            ),
        )
    })?;

    Ok(Transaction::build(kind, form.amount, date)
        .category(&form.category)
        .description(&form.description))
}

/// The ledger page that lists transactions of `kind`.
pub(super) fn ledger_endpoint_for(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Credit => endpoints::CREDITS_VIEW,
        TransactionKind::Debit => endpoints::DEBITS_VIEW,
    }
}

/// A route handler for creating a new transaction.
///
/// Redirects to the credits or debits page on success so that the list the
/// user sees next is re-fetched from the database.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    let builder = match builder_from_form(&form, local_offset) {
        Ok(builder) => builder,
        Err(response) => return response,
    };
    let kind = builder.kind;

    let connection = state.db_connection.lock().unwrap();

    if let Err(error) = create_transaction(builder, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(ledger_endpoint_for(kind).to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
