//! The remote flashcard store seen by the sync step.
//!
//! [`RemoteStore`] is the only way the reconciler talks to Anki, which lets
//! tests swap AnkiConnect for an in-memory store.

use std::collections::BTreeMap;
use std::future::Future;

use mdanki_connect::{AnkiClient, Note, StoreMediaParams};

use crate::media::MediaRecord;

/// Operations a flashcard store must offer for a document sync.
///
/// Every call either returns its result or the store's error message, which
/// callers must not swallow.
pub trait RemoteStore {
    /// One flag per note: `true` when the note can be added without
    /// creating a duplicate.
    fn can_add(&self, notes: &[Note])
    -> impl Future<Output = mdanki_connect::Result<Vec<bool>>> + Send;

    /// Note ids matching an Anki search query.
    fn find_notes(&self, query: &str)
    -> impl Future<Output = mdanki_connect::Result<Vec<i64>>> + Send;

    /// Overwrite a note's fields. Tags are not touched.
    fn update_fields(
        &self,
        note_id: i64,
        fields: &BTreeMap<String, String>,
    ) -> impl Future<Output = mdanki_connect::Result<()>> + Send;

    /// Add a batch of notes; `None` marks a note the store refused.
    fn add_notes(
        &self,
        notes: &[Note],
    ) -> impl Future<Output = mdanki_connect::Result<Vec<Option<i64>>>> + Send;

    /// Store a batch of media files in one request.
    fn store_media(
        &self,
        files: &[MediaRecord],
    ) -> impl Future<Output = mdanki_connect::Result<()>> + Send;

    /// Push the collection to AnkiWeb. Stores without a remote do nothing.
    fn sync_collection(&self) -> impl Future<Output = mdanki_connect::Result<()>> + Send {
        async { Ok(()) }
    }
}

impl RemoteStore for AnkiClient {
    async fn can_add(&self, notes: &[Note]) -> mdanki_connect::Result<Vec<bool>> {
        self.notes().can_add(notes).await
    }

    async fn find_notes(&self, query: &str) -> mdanki_connect::Result<Vec<i64>> {
        self.notes().find(query).await
    }

    async fn update_fields(
        &self,
        note_id: i64,
        fields: &BTreeMap<String, String>,
    ) -> mdanki_connect::Result<()> {
        self.notes().update_fields(note_id, fields).await
    }

    async fn add_notes(&self, notes: &[Note]) -> mdanki_connect::Result<Vec<Option<i64>>> {
        self.notes().add_many(notes).await
    }

    async fn store_media(&self, files: &[MediaRecord]) -> mdanki_connect::Result<()> {
        let params: Vec<StoreMediaParams> = files
            .iter()
            .map(|file| StoreMediaParams::from_base64(&file.filename, &file.data))
            .collect();
        self.media().store_many(&params).await?;
        Ok(())
    }

    async fn sync_collection(&self) -> mdanki_connect::Result<()> {
        self.misc().sync().await
    }
}

impl<S: RemoteStore + Sync> RemoteStore for &S {
    async fn can_add(&self, notes: &[Note]) -> mdanki_connect::Result<Vec<bool>> {
        (**self).can_add(notes).await
    }

    async fn find_notes(&self, query: &str) -> mdanki_connect::Result<Vec<i64>> {
        (**self).find_notes(query).await
    }

    async fn update_fields(
        &self,
        note_id: i64,
        fields: &BTreeMap<String, String>,
    ) -> mdanki_connect::Result<()> {
        (**self).update_fields(note_id, fields).await
    }

    async fn add_notes(&self, notes: &[Note]) -> mdanki_connect::Result<Vec<Option<i64>>> {
        (**self).add_notes(notes).await
    }

    async fn store_media(&self, files: &[MediaRecord]) -> mdanki_connect::Result<()> {
        (**self).store_media(files).await
    }

    async fn sync_collection(&self) -> mdanki_connect::Result<()> {
        (**self).sync_collection().await
    }
}
