//! Defines the endpoint for updating an existing transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error,
    database_id::TransactionId,
    dates::get_local_offset,
    transaction::{
        core::update_transaction,
        create_endpoint::{TransactionApiState, TransactionForm, builder_from_form, ledger_endpoint_for},
    },
};

/// A route handler for overwriting the stored fields of a transaction.
///
/// Redirects to the ledger page for the updated kind on success, so the list
/// the user returns to reflects the database.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
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

    if let Err(error) = update_transaction(transaction_id, builder, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(ledger_endpoint_for(kind).to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod edit_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        transaction::{
            Transaction, TransactionKind, create_transaction,
            create_endpoint::{TransactionApiState, TransactionForm},
            get_transaction,
        },
    };

    use super::edit_transaction_endpoint;

    fn get_test_state() -> TransactionApiState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionApiState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn seed_credit(state: &TransactionApiState) -> Transaction {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Credit, 100.0, date!(2024 - 01 - 01))
                .category("Fee"),
            &connection,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn edit_overwrites_all_fields() {
        let state = get_test_state();
        let transaction = seed_credit(&state);

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(transaction.id),
            Form(TransactionForm {
                kind: "debit".to_owned(),
                amount: 250.0,
                date: "2024-02-02".to_owned(),
                category: "Rent".to_owned(),
                description: "February rent".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DEBITS_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(updated.kind, TransactionKind::Debit);
        assert_eq!(updated.amount, 250.0);
        assert_eq!(updated.category, "Rent");
        assert_eq!(updated.description, "February rent");
        assert_eq!(updated.date, date!(2024 - 02 - 02));
    }

    #[tokio::test]
    async fn edit_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let response = edit_transaction_endpoint(
            State(state),
            Path(999),
            Form(TransactionForm {
                kind: "credit".to_owned(),
                amount: 1.0,
                date: "2024-01-01".to_owned(),
                category: "Fee".to_owned(),
                description: String::new(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_rejects_invalid_amount_without_touching_the_row() {
        let state = get_test_state();
        let transaction = seed_credit(&state);

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(transaction.id),
            Form(TransactionForm {
                kind: "credit".to_owned(),
                amount: 0.0,
                date: "2024-02-02".to_owned(),
                category: "Fee".to_owned(),
                description: String::new(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let stored = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(stored.amount, 100.0);
        assert_eq!(stored.date, date!(2024 - 01 - 01));
    }
}
