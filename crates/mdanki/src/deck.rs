//! Decks and the parsed-document contract between extraction and sync.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::card::Card;
use crate::media::Media;

/// A named deck in Anki.
///
/// Cards are referenced by their remote id, not owned; identity is the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    /// Deck name, including `::` separators for subdecks.
    pub name: String,
    /// Remote deck id, when known.
    pub id: Option<i64>,
    card_ids: BTreeSet<i64>,
}

impl Deck {
    /// Create a deck with no remote id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the remote id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether a card id is referenced by this deck.
    pub fn has_card(&self, card_id: i64) -> bool {
        self.card_ids.contains(&card_id)
    }

    /// Reference a card that has been stored remotely.
    ///
    /// Cards without an id are ignored. Returns whether the card was new to
    /// this deck.
    pub fn add_card(&mut self, card: &Card) -> bool {
        match card.id {
            Some(id) => self.card_ids.insert(id),
            None => false,
        }
    }

    /// Number of referenced cards.
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    /// Whether no cards are referenced.
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }
}

/// Output of the extraction phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedDocument {
    /// Deck from the document title; `None` means "use the default deck".
    pub deck_name: Option<String>,
    /// Cards in extraction order.
    pub cards: Vec<Card>,
    /// Distinct media referenced by the cards.
    pub media: Vec<Media>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_references_stored_cards_only() {
        let mut deck = Deck::new("Rust").with_id(7);
        let mut card = Card::new("Q", "A");
        assert!(!deck.add_card(&card));

        card.id = Some(100);
        assert!(deck.add_card(&card));
        assert!(!deck.add_card(&card));
        assert!(deck.has_card(100));
        assert_eq!(deck.len(), 1);
    }
}
