//! HTTP client for the playerctl bridge
//!
//! The bridge is a tiny HTTP service running next to `playerctl` on the local
//! machine. Every field is exposed as its own text endpoint and transport
//! actions go through `GET /cmd?op=...`.
//!
//! # Example
//!
//! ```no_run
//! use pmoplayerctl::{Field, PlayerctlClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlayerctlClient::new()?;
//!     let status = client.get(Field::Status).await?;
//!     println!("Player is {}", status);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::field::{Command, Field};
use crate::transport::PlayerTransport;

/// Default bridge address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:6767";

/// Default timeout for HTTP requests (5 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "pmoplayerctl/0.1.0";

/// playerctl bridge HTTP client
///
/// The client only knows the bridge address. It does not cache responses
/// and never retries: callers that poll are expected to try again on their
/// next cycle.
#[derive(Debug, Clone)]
pub struct PlayerctlClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl PlayerctlClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL of a field endpoint, e.g. `http://127.0.0.1:6767/status`
    pub fn field_url(&self, field: Field) -> Result<Url> {
        Ok(self.base_url.join(field.path())?)
    }

    /// URL of a command endpoint, e.g. `http://127.0.0.1:6767/cmd?op=next`
    pub fn command_url(&self, command: Command) -> Result<Url> {
        let mut url = self.base_url.join("cmd")?;
        url.query_pairs_mut().append_pair("op", command.op());
        Ok(url)
    }

    /// Fetch the raw text of one field
    pub async fn get(&self, field: Field) -> Result<String> {
        let url = self.field_url(field)?;
        let response = self.send(url).await?;
        let body = response.text().await.inspect_err(|e| {
            debug!(field = %field, error = %e, "Failed to read bridge response body");
        })?;
        Ok(body)
    }

    /// Issue a transport command, discarding the response body
    pub async fn command(&self, command: Command) -> Result<()> {
        let url = self.command_url(command)?;
        self.send(url).await?;
        Ok(())
    }

    /// Download an arbitrary resource (cover art)
    pub async fn download(&self, url: &str) -> Result<Bytes> {
        let url = Url::parse(url)?;
        let response = self.send(url).await?;
        let bytes = response.bytes().await.inspect_err(|e| {
            debug!(error = %e, "Failed to read asset body");
        })?;
        Ok(bytes)
    }

    async fn send(&self, url: Url) -> Result<Response> {
        let response = match self.client.get(url.clone()).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = Error::from(e);
                debug!(
                    url = %url,
                    unreachable = error.is_unreachable(),
                    error = %error,
                    "Bridge request failed"
                );
                return Err(error);
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Bridge answered with an error status");
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl PlayerTransport for PlayerctlClient {
    async fn fetch_field(&self, field: Field) -> Result<String> {
        self.get(field).await
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.command(command).await
    }

    async fn fetch_asset(&self, url: &str) -> Result<Bytes> {
        self.download(url).await
    }
}

/// Builder for [`PlayerctlClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the bridge base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PlayerctlClient> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(PlayerctlClient {
            client,
            base_url,
            timeout: self.timeout,
        })
    }
}
