//! Miscellaneous AnkiConnect actions.

use serde::Serialize;

use crate::client::AnkiClient;
use crate::error::{Error, Result};

/// Provides access to miscellaneous AnkiConnect operations.
///
/// Obtained via [`AnkiClient::misc()`].
#[derive(Debug)]
pub struct MiscActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

#[derive(Serialize)]
struct MultiParams<'a> {
    actions: &'a [MultiAction<'a>],
}

/// A single action for the multi endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MultiAction<'a> {
    /// The action name.
    pub action: &'a str,
    /// The action's parameters.
    pub params: serde_json::Value,
}

impl<'a> MultiAction<'a> {
    /// Create an action with parameters.
    pub fn with_params(action: &'a str, params: serde_json::Value) -> Self {
        Self { action, params }
    }
}

impl<'a> MiscActions<'a> {
    /// Get the AnkiConnect API version.
    pub async fn version(&self) -> Result<u32> {
        self.client.query("version").await
    }

    /// Synchronize the local collection with AnkiWeb.
    pub async fn sync(&self) -> Result<()> {
        self.client.trigger("sync").await
    }

    /// Execute multiple actions in a single request.
    ///
    /// Sub-actions are not transactional: one failing does not roll back the
    /// others. The raw per-action results are returned in request order.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mdanki_connect::{AnkiClient, actions::MultiAction};
    /// use serde_json::json;
    ///
    /// # async fn example() -> mdanki_connect::Result<()> {
    /// let client = AnkiClient::new();
    /// let results = client
    ///     .misc()
    ///     .multi(&[
    ///         MultiAction::with_params("findNotes", json!({"query": "deck:A"})),
    ///         MultiAction::with_params("findNotes", json!({"query": "deck:B"})),
    ///     ])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn multi(&self, actions: &[MultiAction<'_>]) -> Result<Vec<serde_json::Value>> {
        self.client.invoke("multi", MultiParams { actions }).await
    }
}

/// Turn the first failed sub-result of a `multi` call into an error.
///
/// Version 6 wraps every sub-result as `{"result": ..., "error": ...}`.
pub(crate) fn check_multi_results(results: Vec<serde_json::Value>) -> Result<Vec<serde_json::Value>> {
    let mut values = Vec::with_capacity(results.len());
    for item in results {
        match item {
            serde_json::Value::Object(mut map) if map.contains_key("error") => {
                if let Some(serde_json::Value::String(err)) = map.remove("error") {
                    return Err(Error::from_message(err));
                }
                values.push(map.remove("result").unwrap_or(serde_json::Value::Null));
            }
            other => values.push(other),
        }
    }
    Ok(values)
}
