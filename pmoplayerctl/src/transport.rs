//! Trait seam between the session store and the bridge.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::field::{Command, Field};

/// Request/response access to a media-control source.
///
/// Implementations are stateless from the caller's point of view: no
/// caching, no diffing and no retries. A failed call means "no new
/// information"; the caller retries on its next poll cycle.
#[async_trait]
pub trait PlayerTransport: Send + Sync {
    /// Fetches the raw text of one field.
    async fn fetch_field(&self, field: Field) -> Result<String>;

    /// Issues a transport command. The response body is discarded.
    async fn send_command(&self, command: Command) -> Result<()>;

    /// Plain binary GET, used to download cover art.
    async fn fetch_asset(&self, url: &str) -> Result<Bytes>;
}
