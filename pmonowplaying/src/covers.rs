//! In-memory cover art cache keyed by source URL.
//!
//! Each distinct URL is downloaded and decoded at most once while the
//! decoded image stays cached. Concurrent resolutions of the same URL share
//! one download. Images that fail to decode are not cached, so a later
//! resolution of the same URL downloads again. Entries are never evicted.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use image::DynamicImage;
use pmoplayerctl::PlayerTransport;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

/// A decoded cover image.
pub struct CoverArt {
    url: String,
    image: DynamicImage,
    encoded_len: usize,
}

impl CoverArt {
    /// Decodes an encoded image (PNG, JPEG, WebP, ...) fetched from `url`.
    pub fn decode(url: impl Into<String>, bytes: &[u8]) -> Result<Self, image::ImageError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self {
            url: url.into(),
            image,
            encoded_len: bytes.len(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the payload the image was decoded from.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }
}

impl fmt::Debug for CoverArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverArt")
            .field("url", &self.url)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("encoded_len", &self.encoded_len)
            .finish()
    }
}

/// URL-keyed store of decoded cover art.
#[derive(Default)]
pub struct CoverCache {
    entries: RwLock<HashMap<String, Arc<CoverArt>>>,
    /// One gate per URL currently being downloaded
    downloads: AsyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CoverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<CoverArt>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached image for `url`, downloading and decoding it
    /// through `transport` on a miss.
    ///
    /// `None` means the download or the decode failed; nothing is cached in
    /// that case.
    pub async fn resolve(
        &self,
        url: &str,
        transport: &dyn PlayerTransport,
    ) -> Option<Arc<CoverArt>> {
        if let Some(cover) = self.get(url) {
            debug!(url = %url, "Cover served from cache");
            return Some(cover);
        }

        let gate = {
            let mut downloads = self.downloads.lock().await;
            Arc::clone(downloads.entry(url.to_string()).or_default())
        };

        let result = {
            let _download = gate.lock().await;

            // Another task may have finished the same download while we waited
            match self.get(url) {
                Some(cover) => Some(cover),
                None => {
                    let fetched = Self::fetch_and_decode(url, transport).await;
                    if let Some(cover) = &fetched {
                        self.entries
                            .write()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(url.to_string(), Arc::clone(cover));
                    }
                    fetched
                }
            }
        };

        // Drop the gate once nobody else is queued on it (map + our clone)
        let mut downloads = self.downloads.lock().await;
        if downloads
            .get(url)
            .is_some_and(|current| Arc::ptr_eq(current, &gate) && Arc::strong_count(&gate) <= 2)
        {
            downloads.remove(url);
        }

        result
    }

    async fn fetch_and_decode(url: &str, transport: &dyn PlayerTransport) -> Option<Arc<CoverArt>> {
        let bytes = match transport.fetch_asset(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url = %url, error = %e, "Cover download failed");
                return None;
            }
        };

        let owned_url = url.to_string();
        let decoded =
            tokio::task::spawn_blocking(move || CoverArt::decode(owned_url, &bytes)).await;

        match decoded {
            Ok(Ok(cover)) => {
                debug!(
                    url = %url,
                    width = cover.width(),
                    height = cover.height(),
                    "Cover decoded"
                );
                Some(Arc::new(cover))
            }
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "Cover could not be decoded, not caching it");
                None
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Cover decoding task failed");
                None
            }
        }
    }
}

impl fmt::Debug for CoverCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverCache")
            .field("entries", &self.len())
            .finish()
    }
}
