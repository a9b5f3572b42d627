//! The note actions a document sync is built from.
//!
//! A sync checks the whole batch with [`NoteActions::can_add`], locates each
//! duplicate with [`NoteActions::find`] and rewrites it with
//! [`NoteActions::update_fields`], then submits the rest through
//! [`NoteActions::add_many`].
//!
//! ```no_run
//! use mdanki_connect::{AnkiClient, NoteBuilder, QueryBuilder};
//!
//! # async fn example() -> mdanki_connect::Result<()> {
//! let anki = AnkiClient::new();
//! let card = NoteBuilder::new("Rust", "Basic")
//!     .field("Front", "What does `?` do?")
//!     .field("Back", "Propagates the error")
//!     .build();
//!
//! if anki.notes().can_add(std::slice::from_ref(&card)).await?[0] {
//!     anki.notes().add_many(&[card]).await?;
//! } else {
//!     let query = QueryBuilder::new().deck("Rust").field_exact("Front", "What does `?` do?");
//!     let ids = anki.notes().find(&query.build()).await?;
//!     if let Some(&id) = ids.first() {
//!         anki.notes().update_fields(id, &card.fields).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::AnkiClient;
use crate::error::Result;
use crate::types::Note;

/// Note actions, borrowed from [`AnkiClient::notes()`].
#[derive(Debug)]
pub struct NoteActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

#[derive(Serialize)]
struct Query<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct Batch<'a> {
    notes: &'a [Note],
}

#[derive(Serialize)]
struct FieldUpdate<'a> {
    note: NoteFields<'a>,
}

#[derive(Serialize)]
struct NoteFields<'a> {
    id: i64,
    fields: &'a BTreeMap<String, String>,
}

impl NoteActions<'_> {
    /// Ids of the notes matching an Anki search, in Anki's order.
    pub async fn find(&self, query: &str) -> Result<Vec<i64>> {
        self.client.invoke("findNotes", Query { query }).await
    }

    /// Replace the given fields of one note.
    ///
    /// Fields missing from `fields` and the note's tags are left alone.
    /// Anki may drop the change if the note is open in its browser window.
    pub async fn update_fields(&self, note_id: i64, fields: &BTreeMap<String, String>) -> Result<()> {
        let params = FieldUpdate {
            note: NoteFields {
                id: note_id,
                fields,
            },
        };
        self.client.invoke_void("updateNoteFields", params).await
    }

    /// Add a batch; the result lines up with `notes` and `None` marks a
    /// note Anki refused.
    pub async fn add_many(&self, notes: &[Note]) -> Result<Vec<Option<i64>>> {
        self.client.invoke("addNotes", Batch { notes }).await
    }

    /// Dry-run an add: `false` at a position means that note would be a
    /// duplicate within its duplicate scope (or is otherwise invalid).
    pub async fn can_add(&self, notes: &[Note]) -> Result<Vec<bool>> {
        self.client.invoke("canAddNotes", Batch { notes }).await
    }
}
