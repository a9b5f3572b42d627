//! Failures talking to AnkiConnect.
//!
//! AnkiConnect answers almost everything with HTTP 200 and puts failures in
//! the `error` slot of the envelope; those arrive as [`Error::AnkiConnect`]
//! with the add-on's text untouched, so callers can show it to users as is.
//! Permission failures get their own variant, still carrying that text.
//!
//! ```no_run
//! use mdanki_connect::{AnkiClient, Error};
//!
//! # async fn example() {
//! let anki = AnkiClient::new();
//!
//! if let Err(Error::ConnectionRefused) = anki.misc().version().await {
//!     eprintln!("start Anki first");
//! }
//! # }
//! ```

use thiserror::Error;

/// Everything that can go wrong with one AnkiConnect call.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure other than a refused connection, or an unreadable
    /// HTTP body.
    #[error("request to AnkiConnect failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The add-on rejected the action. The message is passed through
    /// verbatim, e.g. `model was not found: Basic`.
    #[error("AnkiConnect: {0}")]
    AnkiConnect(String),

    /// A value was expected but both envelope slots were null.
    #[error("AnkiConnect answered with neither a result nor an error")]
    EmptyResponse,

    /// Serialising parameters or decoding a result failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing is listening; Anki is closed or the add-on is missing.
    #[error("could not reach AnkiConnect; is Anki running with the add-on installed?")]
    ConnectionRefused,

    /// The request lacked a valid API key or was not approved. Holds the
    /// add-on's message.
    #[error("AnkiConnect refused permission: {0}")]
    PermissionDenied(String),
}

impl Error {
    /// Classify the text from an envelope's `error` slot.
    pub(crate) fn from_message(message: String) -> Self {
        if message.contains("permission") {
            Error::PermissionDenied(message)
        } else {
            Error::AnkiConnect(message)
        }
    }
}

/// Result of an AnkiConnect call.
pub type Result<T> = std::result::Result<T, Error>;
