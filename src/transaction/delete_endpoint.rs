//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    database_id::TransactionId,
    transaction::{core::delete_transaction, create_endpoint::TransactionApiState},
};

/// A route handler for deleting a transaction.
///
/// Returns an empty body on success so that htmx removes the table row the
/// delete button lives in.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => Html("").into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{
            Transaction, TransactionKind, count_transactions, create_transaction,
            create_endpoint::TransactionApiState,
        },
    };

    use super::delete_transaction_endpoint;

    fn get_test_state() -> TransactionApiState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionApiState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Credit, 10.0, date!(2024 - 01 - 01)),
                &connection,
            )
            .unwrap()
        };

        let response =
            delete_transaction_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let response = delete_transaction_endpoint(State(state), Path(999)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
