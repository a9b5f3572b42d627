//! Settings loaded from a TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! default_deck = "Default"
//! use_default_deck = false
//! basic_model = "Basic"
//! cloze_model = "Cloze"
//! tags = ["markdown"]
//! title_tag = true
//! media_dir = "."
//! sync_after_send = false
//!
//! [basic_fields]
//! question = "Front"
//! answer = "Back"
//!
//! [cloze_fields]
//! question = "Text"
//! answer = "Back Extra"
//!
//! [connect]
//! url = "http://127.0.0.1:8765"
//! timeout_secs = 30
//!
//! [reconcile]
//! on_missing_target = "skip"   # skip | fail | add
//! on_update_error = "continue" # continue | abort
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use mdanki_connect::{AnkiClient, DEFAULT_TIMEOUT, DEFAULT_URL};
use serde::{Deserialize, Serialize};

use crate::card::{DEFAULT_MODEL, FieldNames};
use crate::error::{Error, Result};
use crate::sync::ReconcilePolicy;

/// Settings for extracting and sending documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deck for documents without a `# Title`.
    pub default_deck: String,
    /// Allow titleless documents to go to `default_deck`.
    pub use_default_deck: bool,
    /// Model for cards with an answer.
    pub basic_model: String,
    /// Model for cards without an answer.
    pub cloze_model: String,
    /// Fields of `basic_model` receiving question and answer.
    pub basic_fields: FieldNames,
    /// Fields of `cloze_model` receiving question and answer.
    pub cloze_fields: FieldNames,
    /// Tags attached to every card.
    pub tags: Vec<String>,
    /// Tag every card with the sanitised deck name.
    pub title_tag: bool,
    /// Base directory for `src="..."` references.
    pub media_dir: PathBuf,
    /// Ask Anki to sync with AnkiWeb after a send.
    pub sync_after_send: bool,
    /// AnkiConnect connection.
    pub connect: ConnectSettings,
    /// Reconciliation policy.
    pub reconcile: ReconcilePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_deck: "Default".to_string(),
            use_default_deck: false,
            basic_model: DEFAULT_MODEL.to_string(),
            cloze_model: "Cloze".to_string(),
            basic_fields: FieldNames::default(),
            cloze_fields: FieldNames::cloze(),
            tags: Vec::new(),
            title_tag: false,
            media_dir: PathBuf::from("."),
            sync_after_send: false,
            connect: ConnectSettings::default(),
            reconcile: ReconcilePolicy::default(),
        }
    }
}

/// How to reach AnkiConnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectSettings {
    /// AnkiConnect URL.
    pub url: String,
    /// API key, if AnkiConnect requires one.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.default_deck.trim().is_empty() {
            return Err(Error::Config("default_deck must not be empty".into()));
        }
        if self.basic_model.trim().is_empty() || self.cloze_model.trim().is_empty() {
            return Err(Error::Config("model names must not be empty".into()));
        }
        for names in [&self.basic_fields, &self.cloze_fields] {
            if names.question.trim().is_empty() || names.answer.trim().is_empty() {
                return Err(Error::Config("field names must not be empty".into()));
            }
            if names.question == names.answer {
                return Err(Error::Config(format!(
                    "question and answer both map to field '{}'",
                    names.question
                )));
            }
        }
        if self.connect.url.trim().is_empty() {
            return Err(Error::Config("connect.url must not be empty".into()));
        }
        if self.connect.timeout_secs == 0 {
            return Err(Error::Config("connect.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Model name for a card, depending on whether it has an answer.
    pub fn model_for(&self, is_cloze: bool) -> &str {
        if is_cloze {
            &self.cloze_model
        } else {
            &self.basic_model
        }
    }

    /// Field names for a card, depending on whether it has an answer.
    pub fn fields_for(&self, is_cloze: bool) -> &FieldNames {
        if is_cloze {
            &self.cloze_fields
        } else {
            &self.basic_fields
        }
    }

    /// Build an AnkiConnect client from the `[connect]` table.
    pub fn client(&self) -> AnkiClient {
        let mut builder = AnkiClient::builder()
            .url(&self.connect.url)
            .timeout(Duration::from_secs(self.connect.timeout_secs));
        if let Some(key) = &self.connect.api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{OnMissingTarget, OnUpdateError};

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.connect.url, "http://127.0.0.1:8765");
        assert_eq!(settings.fields_for(true), &FieldNames::new("Text", "Back Extra"));
    }

    #[test]
    fn test_full_file() {
        let settings = Settings::parse(
            r#"
            default_deck = "Inbox"
            use_default_deck = true
            basic_model = "MdBasic"
            cloze_model = "MdCloze"
            tags = ["md", "notes"]
            title_tag = true
            media_dir = "assets"

            [cloze_fields]
            question = "Body"
            answer = "Extra"

            [connect]
            url = "http://localhost:9999"
            api_key = "secret"
            timeout_secs = 5

            [reconcile]
            on_missing_target = "fail"
            on_update_error = "abort"
            "#,
        )
        .unwrap();

        assert_eq!(settings.default_deck, "Inbox");
        assert!(settings.use_default_deck);
        assert_eq!(settings.model_for(true), "MdCloze");
        assert_eq!(settings.model_for(false), "MdBasic");
        assert_eq!(settings.fields_for(true), &FieldNames::new("Body", "Extra"));
        assert_eq!(settings.fields_for(false), &FieldNames::default());
        assert_eq!(settings.tags, vec!["md", "notes"]);
        assert_eq!(settings.media_dir, PathBuf::from("assets"));
        assert_eq!(settings.connect.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.reconcile.on_missing_target, OnMissingTarget::Fail);
        assert_eq!(settings.reconcile.on_update_error, OnUpdateError::Abort);
        assert_eq!(settings.client().url(), "http://localhost:9999");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::parse("default_deck = \" \""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::parse("[connect]\ntimeout_secs = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::parse("[cloze_fields]\nquestion = \"Back Extra\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::parse("tags = 3"),
            Err(Error::TomlParse(_))
        ));
    }
}
