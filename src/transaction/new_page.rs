//! Defines the route handler for the page that records a new transaction.

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use maud::html;
use serde::Deserialize;

use crate::{
    AppState, Error,
    dates::{get_local_offset, local_today},
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, render},
    navigation::NavBar,
    transaction::{
        TransactionKind,
        form::{FormMethod, FormValues, transaction_form},
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string accepted by the new transaction page.
#[derive(Deserialize)]
pub struct NewTransactionQuery {
    /// Which kind to pre-select, e.g. when arriving from the debits page.
    pub kind: Option<TransactionKind>,
}

/// Render the page for recording a new transaction.
///
/// The date field defaults to today on the school's local calendar.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let kind = query.kind.unwrap_or(TransactionKind::Credit);

    let form = transaction_form(
        FormMethod::Post(endpoints::TRANSACTIONS_API.to_owned()),
        &FormValues {
            kind,
            amount: None,
            category: String::new(),
            description: String::new(),
            date: local_today(local_offset),
        },
        "Record transaction",
    );

    let content = html! {
        (NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Record a transaction" }

            (form)
        }
    };

    Ok(render(StatusCode::OK, base("New Transaction", &content)))
}
