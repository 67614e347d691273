//! Session store: keeps the sessions in sync with the playerctl bridge.
//!
//! ## Poll cycle
//!
//! Each iteration runs three phases in a fixed order, then sleeps for the
//! configured interval:
//!
//! 1. **status**: one fetch, exact comparison.
//! 2. **metadata**: artist and title fetched concurrently, exact
//!    comparison, one event for both. A change also spawns a cover refresh
//!    that runs in the background.
//! 3. **timeline**: position and duration fetched concurrently, applied
//!    only past their deadband ([`POSITION_THRESHOLD_SECS`],
//!    [`DURATION_THRESHOLD_SECS`]).
//!
//! Failed fetches leave the stored value untouched; the next cycle tries
//! again. Nothing that happens in a phase stops the loop.
//!
//! ## Notifications
//!
//! Subscribers receive a copy of the session taken right after the change
//! was applied, so what they hold never changes under them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use crossbeam_channel::Receiver;
use pmoplayerctl::{Command, Field, PlayerTransport};
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::change::{
    DURATION_THRESHOLD_SECS, POSITION_THRESHOLD_SECS, apply_text, apply_with_threshold,
    parse_seconds, usable_text,
};
use crate::covers::CoverCache;
use crate::error::{Result, StoreError};
use crate::events::SessionEvents;
use crate::keys::MediaKeyCode;
use crate::session::{DEFAULT_SESSION_ID, Session};

/// Default delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tunables of a [`SessionStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub poll_interval: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What one call to [`SessionStore::poll_once`] changed.
#[derive(Debug)]
pub struct CycleReport {
    pub status_changed: bool,
    pub metadata_changed: bool,
    pub timeline_changed: bool,
    cover_refresh: Option<JoinHandle<()>>,
}

impl CycleReport {
    pub fn changed(&self) -> bool {
        self.status_changed || self.metadata_changed || self.timeline_changed
    }

    pub fn cover_refresh_triggered(&self) -> bool {
        self.cover_refresh.is_some()
    }

    /// Waits for the cover refresh spawned by this cycle, if any.
    ///
    /// Dropping the report instead lets the refresh finish on its own.
    pub async fn wait_cover_refresh(self) {
        if let Some(handle) = self.cover_refresh {
            if let Err(e) = handle.await {
                warn!(error = %e, "Cover refresh task failed");
            }
        }
    }
}

/// Stop request of one poll loop. Every loop gets its own, so a request
/// aimed at a loop never reaches the one started after it.
#[derive(Default)]
struct StopSignal {
    requested: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

struct PollWorker {
    handle: JoinHandle<()>,
    signal: Arc<StopSignal>,
}

impl PollWorker {
    fn is_active(&self) -> bool {
        !self.signal.is_requested() && !self.handle.is_finished()
    }
}

#[derive(Debug, Default)]
struct SessionTable {
    sessions: HashMap<String, Session>,
    focused: Option<String>,
}

struct StoreInner {
    transport: Arc<dyn PlayerTransport>,
    options: StoreOptions,
    runtime: Handle,
    table: Mutex<SessionTable>,
    /// Session fed by the poll cycle; set once by `initialize`.
    polled: OnceLock<String>,
    covers: CoverCache,
    events: SessionEvents,
    /// Held for the duration of a cycle so that cycles never overlap.
    cycle: AsyncMutex<()>,
    worker: Mutex<Option<PollWorker>>,
}

/// Owner of the sessions, their focus and the cover cache.
///
/// `SessionStore` is a cheap handle: clones share the same state. Build one
/// at startup and hand clones to whoever needs to read sessions, subscribe
/// to notifications or send commands.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use pmonowplaying::{SessionStore, StoreOptions};
/// use pmoplayerctl::PlayerctlClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PlayerctlClient::new()?;
///     let store = SessionStore::new(Arc::new(client), StoreOptions::default())?;
///
///     let media = store.subscribe_media_changed();
///     std::thread::spawn(move || {
///         for session in media.iter() {
///             println!("{} - {}", session.artist, session.title);
///         }
///     });
///
///     store.initialize()?;
///     store.start()?;
///     tokio::signal::ctrl_c().await?;
///     store.stop().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("options", &self.inner.options)
            .field("focused", &self.focused_session_id())
            .field("covers", &self.inner.covers)
            .field("is_running", &self.is_running())
            .finish()
    }
}

impl SessionStore {
    /// Creates an empty store.
    ///
    /// Must be called from within a tokio runtime: background work
    /// (poll loop, cover refreshes, commands) is spawned on it, which lets
    /// the command methods be called from synchronous code later on.
    pub fn new(transport: Arc<dyn PlayerTransport>, options: StoreOptions) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self {
            inner: Arc::new(StoreInner {
                transport,
                options,
                runtime,
                table: Mutex::new(SessionTable::default()),
                polled: OnceLock::new(),
                covers: CoverCache::new(),
                events: SessionEvents::new(),
                cycle: AsyncMutex::new(()),
                worker: Mutex::new(None),
            }),
        })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    pub fn cover_cache(&self) -> &CoverCache {
        &self.inner.covers
    }

    fn table(&self) -> MutexGuard<'_, SessionTable> {
        self.inner
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn worker(&self) -> MutexGuard<'_, Option<PollWorker>> {
        self.inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn polled_id(&self) -> Result<&str> {
        self.inner
            .polled
            .get()
            .map(String::as_str)
            .ok_or(StoreError::NotInitialized)
    }

    // =========================================================================
    // Sessions and focus
    // =========================================================================

    /// Creates the session of the playerctl bridge, focuses it and emits a
    /// focus-changed notification.
    ///
    /// Allowed once per store; later calls fail with
    /// [`StoreError::AlreadyInitialized`] and change nothing.
    pub fn initialize(&self) -> Result<Session> {
        let session = Session::new(DEFAULT_SESSION_ID);
        if self.inner.polled.set(session.id.clone()).is_err() {
            return Err(StoreError::AlreadyInitialized);
        }

        {
            let mut table = self.table();
            table.sessions.insert(session.id.clone(), session.clone());
            table.focused = Some(session.id.clone());
        }

        info!(session = %session.id, "Session store initialized");
        self.inner.events.focus_changed.broadcast(session.clone());
        Ok(session)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.polled.get().is_some()
    }

    /// Moves the focus to an existing session.
    ///
    /// Emits focus-changed only when the focus actually moves.
    pub fn focus(&self, id: &str) -> Result<Session> {
        let (session, moved) = {
            let mut table = self.table();
            let session = table
                .sessions
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::UnknownSession(id.to_string()))?;
            let moved = table.focused.as_deref() != Some(id);
            if moved {
                table.focused = Some(id.to_string());
            }
            (session, moved)
        };

        if moved {
            debug!(session = %id, "Session focused");
            self.inner.events.focus_changed.broadcast(session.clone());
        }
        Ok(session)
    }

    pub fn session(&self, id: &str) -> Option<Session> {
        self.table().sessions.get(id).cloned()
    }

    /// All sessions, sorted by id.
    pub fn sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.table().sessions.values().cloned().collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        sessions
    }

    pub fn focused_session_id(&self) -> Option<String> {
        self.table().focused.clone()
    }

    pub fn focused_session(&self) -> Option<Session> {
        let table = self.table();
        table
            .focused
            .as_ref()
            .and_then(|id| table.sessions.get(id))
            .cloned()
    }

    /// Applies `update` to a session under the lock. Returns a copy of the
    /// session if `update` reported a change.
    fn update_session(&self, id: &str, update: impl FnOnce(&mut Session) -> bool) -> Option<Session> {
        let mut table = self.table();
        let session = table.sessions.get_mut(id)?;
        update(session).then(|| session.clone())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscribe_focus_changed(&self) -> Receiver<Session> {
        self.inner.events.focus_changed.subscribe()
    }

    pub fn subscribe_playback_state_changed(&self) -> Receiver<Session> {
        self.inner.events.playback_state_changed.subscribe()
    }

    /// Text metadata changes and cover art arrivals.
    pub fn subscribe_media_changed(&self) -> Receiver<Session> {
        self.inner.events.media_changed.subscribe()
    }

    pub fn subscribe_timeline_changed(&self) -> Receiver<Session> {
        self.inner.events.timeline_changed.subscribe()
    }

    // =========================================================================
    // Poll cycle
    // =========================================================================

    /// Runs one status → metadata → timeline pass.
    ///
    /// Calls are serialised: a pass started while another one runs waits for
    /// it to finish.
    pub async fn poll_once(&self) -> Result<CycleReport> {
        let id = self.polled_id()?.to_string();
        let _cycle = self.inner.cycle.lock().await;

        let status_changed = self.check_status(&id).await;
        let metadata_changed = self.check_metadata(&id).await;
        let cover_refresh = metadata_changed.then(|| self.spawn_cover_refresh(id.clone()));
        let timeline_changed = self.check_timeline(&id).await;

        Ok(CycleReport {
            status_changed,
            metadata_changed,
            timeline_changed,
            cover_refresh,
        })
    }

    async fn check_status(&self, id: &str) -> bool {
        let status = usable_text(self.inner.transport.fetch_field(Field::Status).await);

        let Some(session) =
            self.update_session(id, |session| apply_text(&mut session.playback_status, status))
        else {
            return false;
        };

        debug!(session = %id, status = %session.playback_status, "Playback state changed");
        self.inner.events.playback_state_changed.broadcast(session);
        true
    }

    async fn check_metadata(&self, id: &str) -> bool {
        let transport = &self.inner.transport;
        let (artist, title) = tokio::join!(
            transport.fetch_field(Field::Artist),
            transport.fetch_field(Field::Title)
        );
        let artist = usable_text(artist);
        let title = usable_text(title);

        let Some(session) = self.update_session(id, |session| {
            let artist_changed = apply_text(&mut session.artist, artist);
            let title_changed = apply_text(&mut session.title, title);
            artist_changed || title_changed
        }) else {
            return false;
        };

        debug!(
            session = %id,
            artist = %session.artist,
            title = %session.title,
            "Media metadata changed"
        );
        self.inner.events.media_changed.broadcast(session);
        true
    }

    async fn check_timeline(&self, id: &str) -> bool {
        let transport = &self.inner.transport;
        let (position, duration) = tokio::join!(
            transport.fetch_field(Field::Position),
            transport.fetch_field(Field::Duration)
        );
        let position = parse_seconds(Field::Position, position);
        let duration = parse_seconds(Field::Duration, duration);

        let Some(session) = self.update_session(id, |session| {
            let duration_changed =
                apply_with_threshold(&mut session.end_time, duration, DURATION_THRESHOLD_SECS);
            let position_changed =
                apply_with_threshold(&mut session.position, position, POSITION_THRESHOLD_SECS);
            duration_changed || position_changed
        }) else {
            return false;
        };

        self.inner.events.timeline_changed.broadcast(session);
        true
    }

    fn spawn_cover_refresh(&self, id: String) -> JoinHandle<()> {
        let store = self.clone();
        self.inner
            .runtime
            .spawn(async move { store.refresh_cover(&id).await })
    }

    async fn refresh_cover(&self, id: &str) {
        let Some(url) = usable_text(self.inner.transport.fetch_field(Field::Cover).await) else {
            return;
        };
        let url = url.trim();

        let Some(cover) = self
            .inner
            .covers
            .resolve(url, self.inner.transport.as_ref())
            .await
        else {
            return;
        };

        let Some(session) = self.update_session(id, |session| {
            session.thumbnail = Some(Arc::downgrade(&cover));
            true
        }) else {
            return;
        };

        debug!(session = %id, url = %url, "Cover art updated");
        self.inner.events.media_changed.broadcast(session);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Spawns the poll loop. Does nothing if it is already running.
    ///
    /// A loop that was asked to stop but has not exited yet does not count as
    /// running: a fresh loop is spawned and the old one finishes on its own.
    pub fn start(&self) -> Result<()> {
        self.polled_id()?;

        let mut worker = self.worker();
        if worker.as_ref().is_some_and(PollWorker::is_active) {
            return Ok(());
        }

        let signal = Arc::new(StopSignal::default());
        let store = self.clone();
        let loop_signal = Arc::clone(&signal);
        let handle = self
            .inner
            .runtime
            .spawn(async move { store.run(loop_signal).await });
        *worker = Some(PollWorker { handle, signal });

        info!(
            interval_ms = self.inner.options.poll_interval.as_millis() as u64,
            "Poll cycle started"
        );
        Ok(())
    }

    /// Asks the poll loop to exit at its next iteration boundary without
    /// waiting for it.
    pub fn request_stop(&self) {
        if let Some(worker) = self.worker().as_ref() {
            worker.signal.request();
        }
    }

    /// Stops the poll loop and waits until it has exited.
    ///
    /// The current iteration, if any, is allowed to finish.
    pub async fn stop(&self) {
        let Some(worker) = self.worker().take() else {
            return;
        };

        worker.signal.request();
        if let Err(e) = worker.handle.await {
            warn!(error = %e, "Poll loop ended abnormally");
        }
        info!("Poll cycle stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker().as_ref().is_some_and(PollWorker::is_active)
    }

    async fn run(self, signal: Arc<StopSignal>) {
        let interval = self.inner.options.poll_interval;

        while !signal.is_requested() {
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "Poll cycle skipped");
            }

            if signal.is_requested() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = signal.notify.notified() => {}
            }
        }

        debug!("Poll loop exiting");
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Toggles playback. Returns immediately; the effect shows up in a later
    /// poll cycle.
    pub fn play_pause(&self) {
        self.dispatch(Command::PlayPause);
    }

    pub fn next(&self) {
        self.dispatch(Command::Next);
    }

    pub fn previous(&self) {
        self.dispatch(Command::Previous);
    }

    /// Maps a media key to its command. Keys without a command are logged
    /// and ignored.
    pub fn push_key(&self, key: MediaKeyCode) {
        match key.command() {
            Some(command) => self.dispatch(command),
            None => warn!(key = ?key, "Unsupported media key"),
        }
    }

    /// Same as [`push_key`](Self::push_key) for a raw key code.
    pub fn push_key_code(&self, code: u8) {
        match MediaKeyCode::try_from(code) {
            Ok(key) => self.push_key(key),
            Err(code) => warn!(code = %format!("{code:#04x}"), "Unsupported media key"),
        }
    }

    fn dispatch(&self, command: Command) {
        let transport = Arc::clone(&self.inner.transport);
        self.inner.runtime.spawn(async move {
            if let Err(e) = transport.send_command(command).await {
                debug!(command = %command, error = %e, "Command not delivered");
            }
        });
    }
}
