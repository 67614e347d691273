//! Shared helpers for the pmonowplaying integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use crossbeam_channel::Receiver;
use image::{ImageBuffer, ImageFormat, Rgba};
use pmonowplaying::{Session, SessionStore, StoreOptions};
use pmoplayerctl::{Command, Error, Field, PlayerTransport, Result};

#[derive(Default)]
struct FakeState {
    /// `Err` simulates a failed request for that field
    fields: HashMap<Field, std::result::Result<String, String>>,
    field_calls: HashMap<Field, usize>,
    assets: HashMap<String, Vec<u8>>,
    asset_fetches: HashMap<String, usize>,
    asset_delay: Duration,
    commands: Vec<Command>,
}

/// In-memory bridge with scripted answers
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<FakeState>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn set_field(&self, field: Field, value: &str) {
        self.state().fields.insert(field, Ok(value.to_string()));
    }

    pub fn fail_field(&self, field: Field) {
        self.state()
            .fields
            .insert(field, Err("connection refused".to_string()));
    }

    pub fn field_calls(&self, field: Field) -> usize {
        self.state().field_calls.get(&field).copied().unwrap_or(0)
    }

    pub fn set_asset(&self, url: &str, payload: Vec<u8>) {
        self.state().assets.insert(url.to_string(), payload);
    }

    pub fn set_asset_delay(&self, delay: Duration) {
        self.state().asset_delay = delay;
    }

    pub fn asset_fetches(&self, url: &str) -> usize {
        self.state().asset_fetches.get(url).copied().unwrap_or(0)
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state().commands.clone()
    }
}

#[async_trait]
impl PlayerTransport for FakeTransport {
    async fn fetch_field(&self, field: Field) -> Result<String> {
        let mut state = self.state();
        *state.field_calls.entry(field).or_default() += 1;
        match state.fields.get(&field) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(Error::other(message.clone())),
            None => Err(Error::Status {
                url: format!("http://fake/{}", field.path()),
                status: 404,
            }),
        }
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.state().commands.push(command);
        Ok(())
    }

    async fn fetch_asset(&self, url: &str) -> Result<Bytes> {
        let (delay, payload) = {
            let mut state = self.state();
            *state.asset_fetches.entry(url.to_string()).or_default() += 1;
            (state.asset_delay, state.assets.get(url).cloned())
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        payload.map(Bytes::from).ok_or(Error::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Store over `transport`, already initialized, with a short poll interval
pub fn initialized_store(transport: &Arc<FakeTransport>) -> SessionStore {
    let store = SessionStore::new(
        transport.clone(),
        StoreOptions {
            poll_interval: Duration::from_millis(20),
        },
    )
    .unwrap();
    store.initialize().unwrap();
    store
}

/// Everything currently queued on a notification channel
pub fn drain(receiver: &Receiver<Session>) -> Vec<Session> {
    receiver.try_iter().collect()
}

/// Waits until `condition` holds, failing the test after two seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// A small PNG image
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |x, _| Rgba([(x * 16) as u8, 128, 64, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}
