//! Turn annotated Markdown documents into Anki flashcards.
//!
//! A document's first level-1 heading names the deck. Cards are written
//! inline as HTML comments:
//!
//! ```markdown
//! # Rust
//!
//! <!-- q: What does `?` do? -->
//! Propagates the error to the caller.
//! <!-- /q -->
//!
//! <!-- q:front -->What is a **lifetime**?<!-- /q:front -->
//! <!-- q:back -->The scope a reference is valid for.<!-- /q:back -->
//! ```
//!
//! Questions and answers are rendered to HTML, local `src="..."` media is
//! collected under content-addressed names, and the cards are added to or
//! updated in Anki through AnkiConnect.
//!
//! # Usage
//!
//! ```no_run
//! use mdanki::{Sender, Settings};
//!
//! # async fn example() -> mdanki::Result<()> {
//! let sender = Sender::from_settings(&Settings::default());
//! let report = sender.send_file("rust.md").await?;
//!
//! for issue in &report.sync.missing {
//!     eprintln!("card {} skipped: {}", issue.index, issue.error);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Find question/answer blocks in document text
//! - [`render`] - Render blocks into cards
//! - [`media`] - Collect and rename referenced media
//! - [`title`] - Resolve the deck name
//! - [`sync`] - Reconcile cards with the remote store
//! - [`sender`] - The full document workflow

pub mod card;
pub mod config;
pub mod deck;
mod error;
pub mod extract;
pub mod media;
pub mod render;
pub mod sender;
pub mod store;
pub mod sync;
pub mod title;

pub use card::{Card, FieldNames};
pub use config::{ConnectSettings, Settings};
pub use deck::{Deck, ParsedDocument};
pub use error::{Error, Result};
pub use extract::{RawBlock, extract_blocks};
pub use media::{Media, MediaExtractor, MediaRecord, MediaSource};
pub use render::{MarkdownRenderer, Renderer, render_cards};
pub use sender::{SendReport, Sender, sanitize_tag};
pub use store::RemoteStore;
pub use sync::{ReconcilePolicy, SyncReconciler, SyncReport};
pub use title::resolve_title;

// Re-export the client so callers don't need a direct dependency.
pub use mdanki_connect::{AnkiClient, ClientBuilder};
