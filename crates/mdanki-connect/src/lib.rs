//! An async Rust client for the subset of the AnkiConnect API that mdanki
//! needs to push Markdown flashcards into Anki.
//!
//! # Quick Start
//!
//! ```no_run
//! use mdanki_connect::AnkiClient;
//!
//! # async fn example() -> mdanki_connect::Result<()> {
//! // Create a client with default settings (localhost:8765)
//! let client = AnkiClient::new();
//!
//! let version = client.misc().version().await?;
//! println!("AnkiConnect version: {}", version);
//! # Ok(())
//! # }
//! ```
//!
//! # Action Groups
//!
//! - [`AnkiClient::notes()`] - Check for duplicates, find, update and add notes
//! - [`AnkiClient::media()`] - Store media files, one at a time or batched
//! - [`AnkiClient::misc()`] - Version, AnkiWeb sync and `multi` batching
//!
//! # Requirements
//!
//! Anki must be running with the [AnkiConnect](https://ankiweb.net/shared/info/2055492159)
//! add-on installed. By default the client connects to `http://127.0.0.1:8765`.

pub mod actions;
pub mod client;
pub mod error;
pub mod query;
mod request;
pub mod types;

pub use client::{AnkiClient, ClientBuilder, DEFAULT_TIMEOUT, DEFAULT_URL};
pub use error::{Error, Result};
pub use query::QueryBuilder;
pub use types::{DuplicateScope, Note, NoteBuilder, NoteOptions, StoreMediaParams};
