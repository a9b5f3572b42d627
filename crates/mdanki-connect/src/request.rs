//! Wire envelope for the AnkiConnect protocol.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Protocol version spoken by this client.
pub(crate) const API_VERSION: u8 = 6;

/// The request body posted to AnkiConnect.
#[derive(Debug, Serialize)]
pub(crate) struct AnkiRequest<'a, P = ()> {
    action: &'a str,
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<P>,
}

impl<'a> AnkiRequest<'a> {
    /// A bare request for `action`.
    pub fn action(action: &'a str) -> Self {
        Self {
            action,
            version: API_VERSION,
            key: None,
            params: None,
        }
    }
}

impl<'a, P> AnkiRequest<'a, P> {
    pub fn params<Q>(self, params: Q) -> AnkiRequest<'a, Q> {
        AnkiRequest {
            action: self.action,
            version: self.version,
            key: self.key,
            params: Some(params),
        }
    }

    pub fn key(mut self, key: Option<&'a str>) -> Self {
        self.key = key;
        self
    }

    pub fn name(&self) -> &str {
        self.action
    }
}

/// Every AnkiConnect answer carries both slots; at most one should be set.
#[derive(Debug, Deserialize)]
pub(crate) struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    /// The error slot wins; a null result without an error is `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>> {
        match self.error {
            Some(message) => Err(Error::from_message(message)),
            None => Ok(self.result),
        }
    }
}
