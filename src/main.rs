use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod browser;
mod constants;
mod continent;
mod marker;
mod server;
mod settings;
mod sites;
mod utils;

use browser::SiteBrowser;
use server::{start_server, AppState, LoadStatus};
use settings::Settings;

/// Loads the data file into a fresh session. A failed load is logged and
/// yields an empty session so the page still comes up.
async fn build_session(settings: &Settings) -> (SiteBrowser, LoadStatus) {
    let path = settings.data_path();
    let home = settings.home_view();

    let (browser, error) = match sites::load_features(&path).await {
        Ok(features) => (SiteBrowser::new(features, home, settings.search_zoom), None),
        Err(e) => {
            error!("Error loading GeoJSON: {:#}", e);
            (SiteBrowser::empty(home, settings.search_zoom), Some(format!("{:#}", e)))
        }
    };

    let status = LoadStatus {
        source: path.display().to_string(),
        loaded_at: chrono::Utc::now(),
        sites: browser.len(),
        error,
    };
    (browser, status)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("archaeomap=info,tower_http=warn")),
        )
        .init();

    info!("ArchaeoMap v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Failed to load settings, using defaults: {:#}", e);
        Settings::default()
    });
    info!(data_file = %settings.data_file, port = settings.port, "Settings loaded");

    // First run: write the defaults so there is a file to edit
    let config_path = Settings::config_path();
    if !config_path.exists() {
        match Settings::default().save() {
            Ok(()) => info!("Wrote default settings to {}", config_path.display()),
            Err(e) => warn!("Could not write default settings: {:#}", e),
        }
    }

    let (browser, load_status) = build_session(&settings).await;
    if load_status.error.is_none() && browser.is_empty() {
        warn!("Data file has no sites");
    } else if load_status.error.is_none() {
        let mut per_continent = std::collections::BTreeMap::new();
        for entry in browser.entries() {
            *per_continent.entry(entry.continent.label()).or_insert(0usize) += 1;
        }
        info!(sites = browser.len(), ?per_continent, "Sites loaded");
    }

    let data_file = settings.data_path();
    let port = settings.port;
    let open_browser = settings.auto_open_browser;
    let app_state = AppState::new(browser, settings, load_status);

    start_server(app_state, data_file, port, open_browser).await
}
