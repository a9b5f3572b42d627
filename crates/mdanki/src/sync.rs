//! Add/update reconciliation of parsed cards against the remote store.
//!
//! The store decides what is new: every card is checked with one batched
//! `canAddNotes` call. Cards it reports as addable are added in one batch;
//! cards it reports as duplicates are located by deck and question field
//! and have their fields overwritten, one card at a time.
//!
//! # Example
//!
//! ```no_run
//! use mdanki::{AnkiClient, Card};
//! use mdanki::sync::{OnMissingTarget, ReconcilePolicy, SyncReconciler};
//!
//! # async fn example() -> mdanki::Result<()> {
//! let client = AnkiClient::new();
//! let mut cards = vec![Card::new("What is 2 + 2?", "4")];
//!
//! let policy = ReconcilePolicy {
//!     on_missing_target: OnMissingTarget::Fail,
//!     ..Default::default()
//! };
//! let report = SyncReconciler::new(&client)
//!     .with_policy(policy)
//!     .reconcile("Maths", &mut cards)
//!     .await?;
//! println!("{} added, {} updated", report.added, report.updated);
//! # Ok(())
//! # }
//! ```

use mdanki_connect::{Note, QueryBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::card::Card;
use crate::error::{Error, Result};
use crate::store::RemoteStore;

/// What to do when a card is flagged as a duplicate but the search for it
/// comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMissingTarget {
    /// Leave the card alone and list it in [`SyncReport::missing`].
    #[default]
    Skip,
    /// Stop the sync with [`Error::Inconsistent`].
    Fail,
    /// Add the card anyway, allowing the duplicate.
    Add,
}

/// What to do when searching for or updating an existing note fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnUpdateError {
    /// Record the failure and carry on with the next card.
    #[default]
    Continue,
    /// Stop the sync with the store's error.
    Abort,
}

/// Policy knobs for [`SyncReconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    /// Duplicate flagged, but nothing found.
    pub on_missing_target: OnMissingTarget,
    /// Search or update call failed.
    pub on_update_error: OnUpdateError,
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Notes created.
    pub added: usize,
    /// Existing notes whose fields were overwritten.
    pub updated: usize,
    /// Duplicates that could not be located and were skipped.
    pub missing: Vec<SyncIssue>,
    /// Cards that failed to add or update.
    pub failures: Vec<SyncIssue>,
}

impl SyncReport {
    /// Whether every card was either added or updated.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.failures.is_empty()
    }
}

/// A card that did not make it to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncIssue {
    /// Index of the card in the input slice.
    pub index: usize,
    /// The card's question text.
    pub front: String,
    /// What went wrong.
    pub error: String,
}

/// Search query locating the existing note whose `field` equals `value`.
pub fn duplicate_query(deck_name: &str, field: &str, value: &str) -> String {
    QueryBuilder::new()
        .deck(deck_name)
        .field_exact(field, value)
        .build()
}

/// Reconciles cards with a [`RemoteStore`].
#[derive(Debug)]
pub struct SyncReconciler<'a, S> {
    store: &'a S,
    policy: ReconcilePolicy,
}

impl<'a, S: RemoteStore> SyncReconciler<'a, S> {
    /// Create a reconciler with the default policy.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            policy: ReconcilePolicy::default(),
        }
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add new cards and update existing ones.
    ///
    /// `deck_name` is used for cards without their own deck. Added and
    /// updated cards get their remote id. Errors from `canAddNotes` and
    /// `addNotes` always abort; search/update errors follow the policy.
    pub async fn reconcile(&self, deck_name: &str, cards: &mut [Card]) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        if cards.is_empty() {
            return Ok(report);
        }

        let notes: Vec<Note> = cards
            .iter()
            .map(|card| card.to_note(deck_name, false))
            .collect();

        let can_add = self.store.can_add(&notes).await?;
        if can_add.len() != notes.len() {
            return Err(Error::Inconsistent(format!(
                "canAddNotes returned {} results for {} notes",
                can_add.len(),
                notes.len()
            )));
        }

        let (to_add, to_update): (Vec<usize>, Vec<usize>) =
            (0..notes.len()).partition(|&index| can_add[index]);
        debug!(
            to_add = to_add.len(),
            to_update = to_update.len(),
            "partitioned cards"
        );

        let mut forced = Vec::new();
        for index in to_update {
            let note = &notes[index];
            let field = cards[index].field_names().question.clone();
            match self.update_existing(note, &field).await {
                Ok(Some(note_id)) => {
                    cards[index].id = Some(note_id);
                    report.updated += 1;
                }
                Ok(None) => match self.policy.on_missing_target {
                    OnMissingTarget::Skip => {
                        warn!(front = %cards[index].front(), deck = %note.deck_name, "duplicate not found, skipping");
                        report.missing.push(issue(index, &cards[index], "flagged as duplicate but not found"));
                    }
                    OnMissingTarget::Fail => {
                        return Err(Error::Inconsistent(format!(
                            "note flagged as duplicate but not found in deck '{}': {}",
                            note.deck_name,
                            cards[index].front()
                        )));
                    }
                    OnMissingTarget::Add => forced.push(index),
                },
                Err(e) => match self.policy.on_update_error {
                    OnUpdateError::Continue => {
                        warn!(front = %cards[index].front(), error = %e, "update failed");
                        report.failures.push(issue(index, &cards[index], &e.to_string()));
                    }
                    OnUpdateError::Abort => return Err(e),
                },
            }
        }

        let mut batch: Vec<usize> = to_add;
        let mut batch_notes: Vec<Note> = batch.iter().map(|&index| notes[index].clone()).collect();
        for index in forced {
            batch.push(index);
            batch_notes.push(cards[index].to_note(deck_name, true));
        }

        if !batch.is_empty() {
            let ids = self.store.add_notes(&batch_notes).await?;
            if ids.len() != batch.len() {
                return Err(Error::Inconsistent(format!(
                    "addNotes returned {} ids for {} notes",
                    ids.len(),
                    batch.len()
                )));
            }

            for (index, id) in batch.into_iter().zip(ids) {
                match id {
                    Some(note_id) => {
                        cards[index].id = Some(note_id);
                        report.added += 1;
                    }
                    None => {
                        warn!(front = %cards[index].front(), "note was not added");
                        report.failures.push(issue(index, &cards[index], "note was not added"));
                    }
                }
            }
        }

        info!(
            added = report.added,
            updated = report.updated,
            missing = report.missing.len(),
            failed = report.failures.len(),
            "reconciled cards"
        );
        Ok(report)
    }

    /// Locate the existing note for a duplicate and overwrite its fields.
    ///
    /// Only the first search hit is used. `Ok(None)` means nothing matched.
    async fn update_existing(&self, note: &Note, field: &str) -> Result<Option<i64>> {
        let query = duplicate_query(&note.deck_name, field, note.field(field).unwrap_or_default());
        let target = self.store.find_notes(&query).await?.into_iter().next();

        let Some(note_id) = target else {
            return Ok(None);
        };

        self.store.update_fields(note_id, &note.fields).await?;
        debug!(note_id, "updated existing note");
        Ok(Some(note_id))
    }
}

fn issue(index: usize, card: &Card, error: &str) -> SyncIssue {
    SyncIssue {
        index,
        front: card.front().to_string(),
        error: error.to_string(),
    }
}
