//! The document-to-Anki workflow.
//!
//! [`Sender`] runs the whole pipeline for one document: title, blocks,
//! rendering, media, then media upload and reconciliation. Everything that
//! can fail locally fails before the first request goes out.

use std::path::Path;

use mdanki_connect::AnkiClient;
use serde::Serialize;
use tracing::{debug, info};

use crate::card::Card;
use crate::config::Settings;
use crate::deck::{Deck, ParsedDocument};
use crate::error::Result;
use crate::extract::extract_blocks;
use crate::media::{FsSource, Media, MediaExtractor, MediaRecord, MediaSource};
use crate::render::{MarkdownRenderer, Renderer, render_cards};
use crate::store::RemoteStore;
use crate::sync::{SyncReconciler, SyncReport};
use crate::title::resolve_title;

/// Trim a string and replace whitespace with underscores, for use as a tag.
///
/// ```
/// assert_eq!(mdanki::sanitize_tag("  Rust Basics "), "Rust_Basics");
/// ```
pub fn sanitize_tag(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Result of sending one document.
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    /// Deck the cards went to, with the ids of stored cards.
    pub deck: Deck,
    /// Cards after media rewriting and id assignment.
    pub cards: Vec<Card>,
    /// Number of media files uploaded.
    pub media_stored: usize,
    /// Reconciliation outcome.
    pub sync: SyncReport,
}

impl SendReport {
    /// Whether every card reached the store.
    pub fn is_clean(&self) -> bool {
        self.sync.is_clean()
    }
}

/// Sends Markdown documents to a [`RemoteStore`].
///
/// # Example
///
/// ```no_run
/// use mdanki::{Sender, Settings};
///
/// # async fn example() -> mdanki::Result<()> {
/// let settings = Settings::from_file("mdanki.toml")?;
/// let sender = Sender::from_settings(&settings);
///
/// let report = sender.send_file("rust.md").await?;
/// println!("{}: {} added, {} updated", report.deck.name, report.sync.added, report.sync.updated);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Sender<S, R = MarkdownRenderer, M = FsSource> {
    store: S,
    renderer: R,
    media: MediaExtractor<M>,
    settings: Settings,
}

impl Sender<AnkiClient> {
    /// Create a sender talking to AnkiConnect as configured.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.client(), settings.clone())
    }
}

impl<S: RemoteStore> Sender<S> {
    /// Create a sender with the Markdown renderer and file-system media.
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store,
            renderer: MarkdownRenderer,
            media: MediaExtractor::new(settings.media_dir.clone()),
            settings,
        }
    }
}

impl<S, R, M> Sender<S, R, M>
where
    S: RemoteStore,
    R: Renderer,
    M: MediaSource,
{
    /// Swap the snippet renderer.
    pub fn with_renderer<R2: Renderer>(self, renderer: R2) -> Sender<S, R2, M> {
        Sender {
            store: self.store,
            renderer,
            media: self.media,
            settings: self.settings,
        }
    }

    /// Swap where media bytes are read from.
    pub fn with_media_source<M2: MediaSource>(self, source: M2) -> Sender<S, R, M2> {
        Sender {
            store: self.store,
            renderer: self.renderer,
            media: MediaExtractor::with_source(source, self.settings.media_dir.clone()),
            settings: self.settings,
        }
    }

    /// The active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Extract cards and media from a document without contacting the store.
    pub async fn parse(&self, text: &str) -> Result<ParsedDocument> {
        let deck_name = resolve_title(text, self.settings.use_default_deck)?;

        let blocks = extract_blocks(text);
        let mut cards = render_cards(&blocks, &self.renderer);
        debug!(blocks = blocks.len(), cards = cards.len(), "extracted cards");

        let title_tag = deck_name
            .as_deref()
            .filter(|_| self.settings.title_tag)
            .map(sanitize_tag);

        for card in &mut cards {
            let is_cloze = card.is_cloze();
            card.model_name = self.settings.model_for(is_cloze).to_string();
            card.set_field_names(self.settings.fields_for(is_cloze).clone());
            card.deck = deck_name.clone();
            for tag in &self.settings.tags {
                card.add_tag(sanitize_tag(tag));
            }
            if let Some(tag) = &title_tag {
                card.add_tag(tag.clone());
            }
        }

        let media = self.media.extract(&mut cards).await?;

        Ok(ParsedDocument {
            deck_name,
            cards,
            media,
        })
    }

    /// Parse a document, upload its media and reconcile its cards.
    pub async fn send_text(&self, text: &str) -> Result<SendReport> {
        let parsed = self.parse(text).await?;
        let deck_name = parsed
            .deck_name
            .unwrap_or_else(|| self.settings.default_deck.clone());

        if !parsed.media.is_empty() {
            let records: Vec<MediaRecord> = parsed.media.iter().map(Media::to_record).collect();
            self.store.store_media(&records).await?;
            info!(count = records.len(), "stored media");
        }

        let mut cards = parsed.cards;
        let sync = SyncReconciler::new(&self.store)
            .with_policy(self.settings.reconcile)
            .reconcile(&deck_name, &mut cards)
            .await?;

        if self.settings.sync_after_send {
            self.store.sync_collection().await?;
            info!("synced collection with AnkiWeb");
        }

        let mut deck = Deck::new(deck_name);
        for card in &cards {
            deck.add_card(card);
        }

        Ok(SendReport {
            deck,
            cards,
            media_stored: parsed.media.len(),
            sync,
        })
    }

    /// Read a document from disk and send it.
    pub async fn send_file(&self, path: impl AsRef<Path>) -> Result<SendReport> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        info!(path = %path.display(), "sending document");
        self.send_text(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_tag() {
        assert_eq!(sanitize_tag("Rust"), "Rust");
        assert_eq!(sanitize_tag(" Rust  Basics\t"), "Rust__Basics");
        assert_eq!(sanitize_tag(""), "");
    }
}
