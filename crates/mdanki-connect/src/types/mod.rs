//! Wire types for AnkiConnect.

mod media;
mod note;

pub use media::StoreMediaParams;
pub use note::{DuplicateScope, Note, NoteBuilder, NoteOptions};
