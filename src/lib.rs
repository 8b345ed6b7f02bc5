//! A web app for tracking a household's monthly budget.
//!
//! A recurring template of income and expense items is turned into a ledger at
//! the start of each month. Clearing ledger items, logging pending
//! transactions and updating the bank balance keeps a running projection of
//! how much money is left to spend until the next 25th.
//!
//! This library serves HTML pages directly.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
pub mod calendar;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod form;
mod html;
mod internal_server_error;
mod ledger;
mod logging;
mod month_reset;
mod navigation;
mod not_found;
mod pending;
pub mod projection;
mod routing;
mod savings;
mod settings;
mod template;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFound};

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
    /// The passphrase entered at log-in was wrong.
    #[error("invalid passphrase")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token in the cookie has expired.
    #[error("the auth token has expired")]
    TokenExpired,

    /// An error occurred while serializing or deserializing a struct as JSON.
    #[error("could not (de)serialize JSON: {0}")]
    JSONSerializationError(String),

    /// A date could not be constructed, e.g., a month number outside 1-12 or a
    /// year outside the supported range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// An amount entered in a form could not be parsed as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A debit day entered in a form is not a day of the month.
    #[error("\"{0}\" is not a valid day of the month")]
    InvalidDebitDay(String),

    /// A pending transaction was submitted without a name or an amount.
    #[error("a pending transaction needs a name and an amount")]
    IncompletePendingTransaction,

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

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a ledger item that does not exist
    #[error("tried to update a ledger item that is not in the database")]
    UpdateMissingLedgerItem,

    /// Tried to delete a pending transaction that does not exist
    #[error("tried to delete a pending transaction that is not in the database")]
    DeleteMissingPendingTransaction,
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
            Error::NotFound => NotFound.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::InvalidAmount(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("\"{amount}\" is not a number. Enter an amount such as 12.34."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidDebitDay(day) => Alert::Error {
                message: "Invalid debit day".to_owned(),
                details: format!("\"{day}\" is not a day of the month. Enter a number from 1 to 31."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::IncompletePendingTransaction => Alert::ErrorSimple {
                message: "Enter a name and an amount for the pending transaction".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingLedgerItem => Alert::Error {
                message: "Could not update ledger item".to_owned(),
                details: "The item could not be found. \
                    Try refreshing the page, the month may have been reset."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingPendingTransaction => Alert::Error {
                message: "Could not delete pending transaction".to_owned(),
                details: "The pending transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
