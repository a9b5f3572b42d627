//! Note-related types.

use std::collections::BTreeMap;

use serde::Serialize;

/// A note record as AnkiConnect expects it in `addNotes` and `canAddNotes`.
///
/// Use [`NoteBuilder`] for a more ergonomic way to construct notes.
///
/// Field values are HTML and field names must match the model exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// The deck to add the note to.
    pub deck_name: String,
    /// The note type (model) name.
    pub model_name: String,
    /// Field values, keyed by field name.
    pub fields: BTreeMap<String, String>,
    /// Tags for the note.
    pub tags: Vec<String>,
    /// Options for duplicate handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<NoteOptions>,
}

impl Note {
    /// Value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Options for adding notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    /// Allow duplicate notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_duplicate: Option<bool>,
    /// Scope for duplicate checking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_scope: Option<DuplicateScope>,
}

/// Scope for duplicate note checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateScope {
    /// Check for duplicates within the target deck only.
    Deck,
}

/// Builder for creating notes with a fluent API.
///
/// # Example
///
/// ```
/// use mdanki_connect::{DuplicateScope, NoteBuilder};
///
/// let note = NoteBuilder::new("My Deck", "Basic")
///     .field("Front", "What is the capital of France?")
///     .field("Back", "Paris")
///     .tag("geography")
///     .allow_duplicate(false)
///     .duplicate_scope(DuplicateScope::Deck)
///     .build();
///
/// assert_eq!(note.field("Back"), Some("Paris"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoteBuilder {
    deck_name: String,
    model_name: String,
    fields: BTreeMap<String, String>,
    tags: Vec<String>,
    options: Option<NoteOptions>,
}

impl NoteBuilder {
    /// Create a new note builder for a deck and model.
    pub fn new(deck: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            deck_name: deck.into(),
            model_name: model.into(),
            ..Default::default()
        }
    }

    /// Set a field value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Replace all field values.
    pub fn fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = fields;
        self
    }

    /// Add a tag to the note.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags to the note.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Allow duplicate notes.
    pub fn allow_duplicate(mut self, allow: bool) -> Self {
        self.options
            .get_or_insert_with(NoteOptions::default)
            .allow_duplicate = Some(allow);
        self
    }

    /// Set the duplicate checking scope.
    pub fn duplicate_scope(mut self, scope: DuplicateScope) -> Self {
        self.options
            .get_or_insert_with(NoteOptions::default)
            .duplicate_scope = Some(scope);
        self
    }

    /// Build the note.
    pub fn build(self) -> Note {
        Note {
            deck_name: self.deck_name,
            model_name: self.model_name,
            fields: self.fields,
            tags: self.tags,
            options: self.options,
        }
    }
}
