//! The card entity produced by the extraction pipeline.

use std::collections::BTreeMap;

use mdanki_connect::{DuplicateScope, Note, NoteBuilder};
use serde::{Deserialize, Serialize};

/// Question field of Anki's stock `Basic` model.
pub const FRONT: &str = "Front";

/// Answer field of Anki's stock `Basic` model.
pub const BACK: &str = "Back";

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "Basic";

/// Which model fields receive the question and the answer.
///
/// The question field should be the model's first field: Anki checks
/// duplicates on it and the sync searches by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Field holding the rendered question.
    pub question: String,
    /// Field holding the rendered answer.
    pub answer: String,
}

impl FieldNames {
    /// Field names for a model.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// `Text` / `Back Extra`, the fields of Anki's stock `Cloze` model.
    pub fn cloze() -> Self {
        Self::new("Text", "Back Extra")
    }
}

impl Default for FieldNames {
    /// `Front` / `Back`.
    fn default() -> Self {
        Self::new(FRONT, BACK)
    }
}

/// A flashcard parsed from a document.
///
/// `question` and `answer` hold rendered HTML; the entries named by
/// [`field_names`](Card::field_names) always mirror them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Remote note id, set once Anki has accepted the card.
    pub id: Option<i64>,
    question: String,
    answer: String,
    field_names: FieldNames,
    fields: BTreeMap<String, String>,
    tags: Vec<String>,
    /// Note type the card is sent as.
    pub model_name: String,
    /// Deck the card belongs to, by name.
    pub deck: Option<String>,
}

impl Card {
    /// Create a card from rendered question and answer text, stored in
    /// `Front`/`Back`.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        let answer = answer.into();
        let field_names = FieldNames::default();
        let mut fields = BTreeMap::new();
        fields.insert(field_names.question.clone(), question.clone());
        fields.insert(field_names.answer.clone(), answer.clone());

        Self {
            id: None,
            question,
            answer,
            field_names,
            fields,
            tags: Vec::new(),
            model_name: DEFAULT_MODEL.to_string(),
            deck: None,
        }
    }

    /// Rendered question text.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Rendered answer text, empty for cloze cards.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Field values keyed by field name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Names of the question and answer fields.
    pub fn field_names(&self) -> &FieldNames {
        &self.field_names
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The question field's value, used to find the card again in Anki.
    pub fn front(&self) -> &str {
        &self.question
    }

    /// Whether the card has no answer side.
    pub fn is_cloze(&self) -> bool {
        self.answer.trim().is_empty()
    }

    /// Replace the question and its field.
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.fields
            .insert(self.field_names.question.clone(), self.question.clone());
    }

    /// Replace the answer and its field.
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
        self.fields
            .insert(self.field_names.answer.clone(), self.answer.clone());
    }

    /// Move question and answer to other fields, e.g. for a cloze model.
    /// Extra fields are kept.
    pub fn set_field_names(&mut self, names: FieldNames) {
        self.fields.remove(&self.field_names.question);
        self.fields.remove(&self.field_names.answer);
        self.field_names = names;
        self.fields
            .insert(self.field_names.question.clone(), self.question.clone());
        self.fields
            .insert(self.field_names.answer.clone(), self.answer.clone());
    }

    /// Set an extra field. The question and answer fields go through their
    /// setters.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name == self.field_names.question {
            self.set_question(value);
        } else if name == self.field_names.answer {
            self.set_answer(value);
        } else {
            self.fields.insert(name, value.into());
        }
    }

    /// Add a tag unless it is empty or already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Set the deck back-reference.
    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = Some(deck.into());
        self
    }

    /// The deck this card targets, falling back to `default_deck`.
    pub fn deck_or<'a>(&'a self, default_deck: &'a str) -> &'a str {
        self.deck.as_deref().unwrap_or(default_deck)
    }

    /// Convert to the AnkiConnect note record.
    ///
    /// Duplicates are checked within the target deck.
    pub fn to_note(&self, default_deck: &str, allow_duplicate: bool) -> Note {
        NoteBuilder::new(self.deck_or(default_deck), &self.model_name)
            .fields(self.fields.clone())
            .tags(self.tags.iter().cloned())
            .allow_duplicate(allow_duplicate)
            .duplicate_scope(DuplicateScope::Deck)
            .build()
    }
}
