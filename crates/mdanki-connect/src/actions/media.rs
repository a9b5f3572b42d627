//! Media-related AnkiConnect actions.
//!
//! # Example
//!
//! ```no_run
//! use mdanki_connect::{AnkiClient, StoreMediaParams};
//!
//! # async fn example() -> mdanki_connect::Result<()> {
//! let client = AnkiClient::new();
//!
//! let files = vec![
//!     StoreMediaParams::from_base64("a.txt", "SGVsbG8="),
//!     StoreMediaParams::from_base64("b.txt", "V29ybGQ="),
//! ];
//! client.media().store_many(&files).await?;
//! # Ok(())
//! # }
//! ```

use crate::actions::misc::{MultiAction, check_multi_results};
use crate::client::AnkiClient;
use crate::error::Result;
use crate::types::StoreMediaParams;

/// Provides access to media-related AnkiConnect operations.
///
/// Obtained via [`AnkiClient::media()`].
#[derive(Debug)]
pub struct MediaActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

impl<'a> MediaActions<'a> {
    /// Store a media file.
    ///
    /// Returns the filename Anki used.
    pub async fn store(&self, params: StoreMediaParams) -> Result<String> {
        self.client.invoke("storeMediaFile", params).await
    }

    /// Store several media files in one `multi` request.
    ///
    /// Each file is a separate `storeMediaFile` sub-action. The first
    /// sub-action reporting an error fails the call, but files stored before
    /// it stay stored.
    pub async fn store_many(&self, files: &[StoreMediaParams]) -> Result<Vec<serde_json::Value>> {
        let actions = files
            .iter()
            .map(|file| Ok(MultiAction::with_params("storeMediaFile", serde_json::to_value(file)?)))
            .collect::<Result<Vec<_>>>()?;

        let results = self.client.misc().multi(&actions).await?;
        check_multi_results(results)
    }
}
