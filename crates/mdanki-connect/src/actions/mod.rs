//! Action groups for AnkiConnect operations.

mod media;
mod misc;
mod notes;

pub use media::MediaActions;
pub use misc::{MiscActions, MultiAction};
pub use notes::NoteActions;
