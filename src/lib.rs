//! Bursary is a web app for keeping the financial records of a small school:
//! credits (fees, donations, grants) in, debits (salaries, rent, bills) out,
//! and the reports that account for both.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregate;
mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod database_id;
mod dates;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod report;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword, set_password};
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::AlertTemplate,
    html::render,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing or formatting a date-time, e.g. for the
    /// auth cookie expiry.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not handle date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The app already has its password set, so the registration page is
    /// closed.
    #[error("a password has already been registered")]
    RegistrationClosed,

    /// A transaction amount was zero, negative, or not a finite number.
    ///
    /// Transactions record money that actually moved, so the amount must be a
    /// positive, finite quantity. The direction is carried by the kind
    /// (credit or debit), not the sign.
    #[error("{0} is not a valid transaction amount, must be greater than zero")]
    NonPositiveAmount(f64),

    /// An empty string was submitted as a transaction category.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// A transaction kind string was neither "credit" nor "debit".
    #[error("\"{0}\" is not a transaction kind, expected \"credit\" or \"debit\"")]
    InvalidKind(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NonPositiveAmount(amount) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Enter an amount greater than zero."),
                ),
            ),
            Error::EmptyCategory => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error("Missing category", "Choose or enter a category."),
            ),
            Error::InvalidKind(kind) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid transaction kind",
                    &format!("\"{kind}\" is neither a credit nor a debit."),
                ),
            ),
            Error::UpdateMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::DeleteMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
