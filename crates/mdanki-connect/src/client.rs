//! Connection to a running AnkiConnect add-on.

use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

use crate::actions::{MediaActions, MiscActions, NoteActions};
use crate::error::{Error, Result};
use crate::request::{AnkiRequest, AnkiResponse};

/// Where AnkiConnect listens unless configured otherwise.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";

/// Upper bound on a whole request, including a slow `multi` media upload.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to one AnkiConnect endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// ```no_run
/// use mdanki_connect::AnkiClient;
///
/// # async fn example() -> mdanki_connect::Result<()> {
/// let anki = AnkiClient::new();
/// println!("speaking AnkiConnect v{}", anki.misc().version().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnkiClient {
    http: Client,
    endpoint: String,
    key: Option<String>,
}

impl AnkiClient {
    /// Client for [`DEFAULT_URL`] with [`DEFAULT_TIMEOUT`] and no API key.
    pub fn new() -> Self {
        ClientBuilder::default().build()
    }

    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.endpoint
    }

    /// Duplicate probing, search, update and add.
    pub fn notes(&self) -> NoteActions<'_> {
        NoteActions { client: self }
    }

    /// Files in Anki's media folder.
    pub fn media(&self) -> MediaActions<'_> {
        MediaActions { client: self }
    }

    /// Version, AnkiWeb sync and batching.
    pub fn misc(&self) -> MiscActions<'_> {
        MiscActions { client: self }
    }

    /// Run an action whose result must not be null.
    pub(crate) async fn invoke<P, R>(&self, action: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.send(AnkiRequest::action(action).params(params))
            .await?
            .ok_or(Error::EmptyResponse)
    }

    /// Run an action that answers with null on success.
    pub(crate) async fn invoke_void<P: Serialize>(&self, action: &str, params: P) -> Result<()> {
        self.send::<_, serde_json::Value>(AnkiRequest::action(action).params(params))
            .await
            .map(drop)
    }

    /// Run a parameterless action whose result must not be null.
    pub(crate) async fn query<R: DeserializeOwned>(&self, action: &str) -> Result<R> {
        self.send(AnkiRequest::action(action))
            .await?
            .ok_or(Error::EmptyResponse)
    }

    /// Run a parameterless action that answers with null on success.
    pub(crate) async fn trigger(&self, action: &str) -> Result<()> {
        self.send::<_, serde_json::Value>(AnkiRequest::action(action))
            .await
            .map(drop)
    }

    async fn send<P, R>(&self, request: AnkiRequest<'_, P>) -> Result<Option<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = request.key(self.key.as_deref());
        trace!(action = request.name(), url = %self.endpoint, "AnkiConnect request");

        let reply = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope: AnkiResponse<R> = reply.json().await?;
        envelope.into_result()
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_connect() {
        Error::ConnectionRefused
    } else {
        Error::Http(e)
    }
}

impl Default for AnkiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for an [`AnkiClient`].
///
/// ```no_run
/// use std::time::Duration;
/// use mdanki_connect::AnkiClient;
///
/// let anki = AnkiClient::builder()
///     .url("http://192.168.1.20:8765")
///     .api_key("hunter2")
///     .timeout(Duration::from_secs(120))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    key: Option<String>,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_URL.to_owned(),
            key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientBuilder {
    /// Same as [`ClientBuilder::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// AnkiConnect endpoint.
    pub fn url(self, url: impl Into<String>) -> Self {
        Self {
            endpoint: url.into(),
            ..self
        }
    }

    /// Key sent with every request, for setups with `apiKey` configured.
    pub fn api_key(self, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..self
        }
    }

    /// Limit on a whole request.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Finish configuration.
    ///
    /// # Panics
    ///
    /// Panics if reqwest cannot set up its TLS backend.
    pub fn build(self) -> AnkiClient {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("reqwest client configuration is valid");

        AnkiClient {
            http,
            endpoint: self.endpoint,
            key: self.key,
        }
    }
}
