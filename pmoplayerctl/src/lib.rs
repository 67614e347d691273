//! playerctl bridge client for PMONowPlaying
//!
//! This crate talks to a small HTTP bridge sitting in front of `playerctl`
//! (MPRIS) on the local machine. It knows how to read one field at a time
//! and how to send a transport command; it keeps no state beyond the bridge
//! address.
//!
//! # Endpoints
//!
//! | Request                  | Answer                              |
//! |--------------------------|-------------------------------------|
//! | `GET /status`            | playback status text                |
//! | `GET /metadata`          | raw metadata dump (reserved)        |
//! | `GET /artist`, `/title`  | text                                |
//! | `GET /duration`          | seconds, as text                    |
//! | `GET /position`          | seconds, as text                    |
//! | `GET /cover`             | cover art URL                       |
//! | `GET /cmd?op=...`        | `play-pause`, `next` or `previous`  |
//!
//! # Example
//!
//! ```no_run
//! use pmoplayerctl::{Command, Field, PlayerctlClient, PlayerTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlayerctlClient::builder()
//!         .base_url("http://127.0.0.1:6767")
//!         .build()?;
//!
//!     let title = client.fetch_field(Field::Title).await?;
//!     println!("Now playing: {}", title);
//!
//!     client.send_command(Command::Next).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod field;
pub mod transport;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use client::{ClientBuilder, PlayerctlClient, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use field::{Command, Field};
pub use transport::PlayerTransport;

#[cfg(feature = "pmoconfig")]
pub use config_ext::PlayerctlConfigExt;
