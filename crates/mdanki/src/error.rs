//! Error types for mdanki.
//!
//! Extraction errors ([`Error::MissingTitle`], [`Error::MediaRead`]) abort a
//! document before anything is sent to Anki. Remote errors carry the
//! AnkiConnect message unchanged.
//!
//! # Example
//!
//! ```no_run
//! use mdanki::{Error, Sender, Settings};
//!
//! # async fn example() {
//! let sender = Sender::from_settings(&Settings::default());
//!
//! match sender.send_file("notes.md").await {
//!     Ok(report) => println!("{} added, {} updated", report.sync.added, report.sync.updated),
//!     Err(Error::MissingTitle) => eprintln!("Add a `# Deck name` heading or enable the default deck"),
//!     Err(Error::Remote(e)) => eprintln!("Anki said: {}", e),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for mdanki operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or syncing a document.
#[derive(Debug, Error)]
pub enum Error {
    /// The document has no level-1 heading and the default deck is disabled.
    #[error("could not find a level-1 heading to use as deck name")]
    MissingTitle,

    /// A media file referenced by a card could not be read.
    #[error("failed to read media file {}: {source}", path.display())]
    MediaRead {
        /// Resolved path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The remote store reported an error.
    #[error(transparent)]
    Remote(#[from] mdanki_connect::Error),

    /// The remote store contradicted itself, e.g. flagged a duplicate that
    /// its own search cannot find.
    #[error("remote store inconsistency: {0}")]
    Inconsistent(String),

    /// Invalid settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Settings file parse error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
