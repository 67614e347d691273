//! # pmonowplaying - "what is playing right now" for PMONowPlaying
//!
//! This crate keeps an in-memory model of the current playback sessions in
//! sync with a media-control source (the playerctl bridge, see
//! `pmoplayerctl`) and tells interested consumers when something material
//! changed.
//!
//! ## Features
//!
//! - One session per source, with a focused session
//! - Poll cycle with exact comparison for text fields and deadband
//!   comparison for the timeline
//! - Four notification channels: focus, playback state, media metadata,
//!   timeline
//! - Cover art cache keyed by URL, downloaded at most once per URL
//! - Fire-and-forget transport commands and media keys
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pmonowplaying::{MediaKeyCode, SessionStore, StoreOptions};
//! use pmoplayerctl::PlayerctlClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SessionStore::new(Arc::new(PlayerctlClient::new()?), StoreOptions::default())?;
//!     let timeline = store.subscribe_timeline_changed();
//!
//!     store.initialize()?;
//!     store.start()?;
//!
//!     store.push_key(MediaKeyCode::NextTrack);
//!
//!     while let Ok(session) = timeline.try_recv() {
//!         println!("{:.0}/{:.0}", session.position, session.end_time);
//!     }
//!
//!     store.stop().await;
//!     Ok(())
//! }
//! ```

pub mod change;
pub mod covers;
pub mod error;
mod events;
pub mod keys;
pub mod session;
pub mod store;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use change::{DURATION_THRESHOLD_SECS, POSITION_THRESHOLD_SECS};
pub use covers::{CoverArt, CoverCache};
pub use error::{Result, StoreError};
pub use keys::MediaKeyCode;
pub use session::{DEFAULT_SESSION_ID, Session};
pub use store::{CycleReport, DEFAULT_POLL_INTERVAL, SessionStore, StoreOptions};

#[cfg(feature = "pmoconfig")]
pub use config_ext::NowPlayingConfigExt;
