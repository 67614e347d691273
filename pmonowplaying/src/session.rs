//! Session model: what one playback source is currently doing.

use std::sync::{Arc, Weak};

use crate::covers::CoverArt;

/// Identifier of the session created for the playerctl bridge.
pub const DEFAULT_SESSION_ID: &str = "playerctl-default";

/// Known state of one playback source.
///
/// The store hands out copies of this struct; mutating a copy has no effect
/// on the store. Timeline values are seconds.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genres: Vec<String>,
    pub track_number: u32,
    pub album_title: String,
    pub album_artist: String,
    pub album_track_count: u32,
    pub start_time: f64,
    /// Track length as reported by the source.
    pub end_time: f64,
    pub position: f64,
    /// Opaque status text as sent by the source (`Playing`, `Paused`, ...).
    pub playback_status: String,
    /// The cover cache owns the image; sessions only point at it.
    pub(crate) thumbnail: Option<Weak<CoverArt>>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Current cover art, if one was resolved for this session.
    pub fn thumbnail(&self) -> Option<Arc<CoverArt>> {
        self.thumbnail.as_ref().and_then(Weak::upgrade)
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail().is_some()
    }

    /// Case-insensitive check against the `playing` status.
    pub fn is_playing(&self) -> bool {
        self.playback_status.trim().eq_ignore_ascii_case("playing")
    }

    /// Position as a fraction of the track length, clamped to `0.0..=1.0`.
    ///
    /// `None` while the length is unknown.
    pub fn progress(&self) -> Option<f64> {
        let length = self.end_time - self.start_time;
        if length <= 0.0 {
            return None;
        }
        Some(((self.position - self.start_time) / length).clamp(0.0, 1.0))
    }
}
