use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{sse::Event as SseEvent, Html, IntoResponse, Json, Response, Sse},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::MutexGuard;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, error};

use crate::browser::{HighlightChange, SearchOutcome, SessionSnapshot, SiteBrowser, View};
use crate::continent::Continent;
use crate::marker::MarkerStyle;
use crate::settings::Settings;

use super::events::SessionEvent;
use super::state::{AppState, LoadStatus};

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

/// One marker as the page draws it
#[derive(Debug, Serialize)]
pub struct SiteMarker {
    pub index: usize,
    pub name: String,
    pub category: String,
    pub continent: Continent,
    pub lat: f64,
    pub lng: f64,
    pub style: MarkerStyle,
    pub highlighted: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub session: SessionSnapshot,
    pub load: LoadStatus,
}

fn lock_browser(state: &AppState) -> Result<MutexGuard<'_, SiteBrowser>, StatusCode> {
    state.browser.lock().map_err(|e| {
        error!("Session lock poisoned: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// HTTP API Handlers
pub async fn get_all_sites(
    State(state): State<AppState>,
) -> Result<Json<Vec<SiteMarker>>, StatusCode> {
    let browser = lock_browser(&state)?;

    let markers = browser
        .entries()
        .iter()
        .map(|entry| SiteMarker {
            index: entry.index,
            name: entry.feature.name.clone(),
            category: entry.feature.category.clone(),
            continent: entry.continent,
            lat: entry.feature.lat,
            lng: entry.feature.lng,
            style: entry.style.clone(),
            highlighted: entry.style.is_highlight(),
        })
        .collect();

    Ok(Json(markers))
}

/// Detail popup for a clicked marker
pub async fn get_site_popup(
    State(state): State<AppState>,
    AxumPath(index): AxumPath<usize>,
) -> Result<Html<String>, StatusCode> {
    let browser = lock_browser(&state)?;
    let entry = browser.entry(index).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(entry.popup_html()))
}

/// Search box input change
pub async fn search_sites(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, StatusCode> {
    let mut browser = lock_browser(&state)?;
    Ok(Json(browser.search(&params.q)))
}

/// Click on a result list item; the item carries its entry index
pub async fn select_site(
    State(state): State<AppState>,
    AxumPath(index): AxumPath<usize>,
) -> Result<Json<HighlightChange>, StatusCode> {
    let change = {
        let mut browser = lock_browser(&state)?;
        browser.select_entry(index).ok_or_else(|| {
            debug!(index, "Selection of unknown site");
            StatusCode::NOT_FOUND
        })?
    };

    state.publish(SessionEvent::highlight_changed(change.clone()));
    Ok(Json(change))
}

/// Click outside the search box and result list
pub async fn dismiss_results(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let was_visible = lock_browser(&state)?.dismiss_results();
    if was_visible {
        state.publish(SessionEvent::results_hidden());
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "was_visible": was_visible
    })))
}

pub async fn recenter(State(state): State<AppState>) -> Result<Json<View>, StatusCode> {
    let view = lock_browser(&state)?.recenter();
    state.publish(SessionEvent::view_changed(view));
    Ok(Json(view))
}

pub async fn get_session(State(state): State<AppState>) -> Result<Json<SessionStatus>, StatusCode> {
    let session = lock_browser(&state)?.snapshot();
    Ok(Json(SessionStatus {
        session,
        load: (*state.load_status).clone(),
    }))
}

// API endpoint to get current settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, StatusCode> {
    let settings = state.settings.lock().map_err(|e| {
        error!("Settings lock poisoned: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(settings.clone()))
}

// SSE endpoint for session updates
pub async fn session_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel(100);

    let mut event_receiver = state.event_sender.subscribe();

    // Forward session events to this client
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = event_receiver.recv() => match event {
                    Ok(session_event) => session_event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "SSE subscriber lagged");
                        continue;
                    }
                    Err(_) => break, // Channel closed
                },
                _ = tokio::time::sleep(Duration::from_secs(30)) => SessionEvent::heartbeat(),
            };

            let sse_event = SseEvent::default()
                .event(event.event_type.clone())
                .json_data(&event)
                .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

            if tx.send(Ok(sse_event)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive-message"),
    )
}

fn embedded_asset(path: &str, content_type: &'static str) -> Response {
    match Asset::get(path) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            content.data.into_owned(),
        )
            .into_response(),
        None => {
            error!("Embedded asset missing: {}", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html() -> Response {
    embedded_asset("index.html", "text/html; charset=utf-8")
}

pub async fn style_css() -> Response {
    embedded_asset("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded_asset("script.js", "application/javascript")
}
