use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use super::events::SessionEvent;
use crate::browser::SiteBrowser;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::settings::Settings;

/// Outcome of the startup data load, reported by `/api/session`
#[derive(Debug, Clone, Serialize)]
pub struct LoadStatus {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub sites: usize,
    pub error: Option<String>,
}

// Application state for sharing the browser session and settings
#[derive(Clone)]
pub struct AppState {
    pub browser: Arc<Mutex<SiteBrowser>>,
    pub settings: Arc<Mutex<Settings>>,
    pub event_sender: broadcast::Sender<SessionEvent>,
    pub load_status: Arc<LoadStatus>,
}

impl AppState {
    pub fn new(browser: SiteBrowser, settings: Settings, load_status: LoadStatus) -> Self {
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        AppState {
            browser: Arc::new(Mutex::new(browser)),
            settings: Arc::new(Mutex::new(settings)),
            event_sender,
            load_status: Arc::new(load_status),
        }
    }

    /// Pushes an event to every open SSE stream; no subscribers is fine
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.event_sender.send(event);
    }
}
