use std::sync::Arc;

use crossbeam_channel::select;
use pmoconfig::get_config;
use pmonowplaying::{NowPlayingConfigExt, SessionStore};
use pmoplayerctl::PlayerctlConfigExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config()?;

    // RUST_LOG wins over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.get_log_min_level()?.to_lowercase())?,
    };
    if config.get_log_enable_console()? {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .init();
    }

    info!(config_dir = %config.directory().display(), "🎵 Starting PMONowPlaying");

    let client = config.create_playerctl_client()?;
    info!(bridge = %client.base_url(), "📡 Using playerctl bridge");

    let store = SessionStore::new(Arc::new(client), config.store_options()?)?;
    log_notifications(&store);

    store.initialize()?;
    store.start()?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    store.stop().await;

    Ok(())
}

/// Logs every notification of the store from a dedicated thread. The thread
/// ends once the store, and with it the senders, is dropped.
fn log_notifications(store: &SessionStore) {
    let focus = store.subscribe_focus_changed();
    let playback = store.subscribe_playback_state_changed();
    let media = store.subscribe_media_changed();
    let timeline = store.subscribe_timeline_changed();

    std::thread::spawn(move || {
        loop {
            select! {
                recv(focus) -> msg => match msg {
                    Ok(session) => info!(session = %session.id, "Focus changed"),
                    Err(_) => break,
                },
                recv(playback) -> msg => match msg {
                    Ok(session) => info!(status = %session.playback_status, "Playback state changed"),
                    Err(_) => break,
                },
                recv(media) -> msg => match msg {
                    Ok(session) => info!(
                        artist = %session.artist,
                        title = %session.title,
                        cover = session.has_thumbnail(),
                        "Now playing"
                    ),
                    Err(_) => break,
                },
                recv(timeline) -> msg => match msg {
                    Ok(session) => info!(
                        position = session.position,
                        duration = session.end_time,
                        "Timeline"
                    ),
                    Err(_) => break,
                },
            }
        }
    });
}
