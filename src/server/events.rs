use serde::{Deserialize, Serialize};

use crate::browser::{HighlightChange, View};

// SSE event types
pub const HIGHLIGHT_CHANGED: &str = "highlight_changed";
pub const RESULTS_HIDDEN: &str = "results_hidden";
pub const VIEW_CHANGED: &str = "view_changed";
pub const HEARTBEAT: &str = "heartbeat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_type: String,
    pub data: SessionData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionData {
    pub highlight: Option<HighlightChange>,
    pub view: Option<View>,
    pub message: Option<String>,
}

impl SessionEvent {
    pub fn highlight_changed(change: HighlightChange) -> Self {
        SessionEvent {
            event_type: HIGHLIGHT_CHANGED.to_string(),
            data: SessionData {
                view: Some(change.view),
                highlight: Some(change),
                ..Default::default()
            },
        }
    }

    pub fn results_hidden() -> Self {
        SessionEvent {
            event_type: RESULTS_HIDDEN.to_string(),
            data: SessionData::default(),
        }
    }

    pub fn view_changed(view: View) -> Self {
        SessionEvent {
            event_type: VIEW_CHANGED.to_string(),
            data: SessionData {
                view: Some(view),
                ..Default::default()
            },
        }
    }

    pub fn heartbeat() -> Self {
        SessionEvent {
            event_type: HEARTBEAT.to_string(),
            data: SessionData {
                message: Some("SSE connection alive".to_string()),
                ..Default::default()
            },
        }
    }
}
