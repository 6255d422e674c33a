use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::browser::View;
use crate::constants::{
    DEFAULT_DATA_FILE, DEFAULT_PORT, INITIAL_LAT, INITIAL_LNG, INITIAL_ZOOM, SEARCH_ZOOM,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data_file: String,
    pub port: u16,
    #[serde(default)]
    pub auto_open_browser: bool,
    pub initial_lat: f64,
    pub initial_lng: f64,
    pub initial_zoom: u8,
    pub search_zoom: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            port: DEFAULT_PORT,
            auto_open_browser: false,
            initial_lat: INITIAL_LAT,
            initial_lng: INITIAL_LNG,
            initial_zoom: INITIAL_ZOOM,
            search_zoom: SEARCH_ZOOM,
        }
    }
}

impl Settings {
    /// Loads `archaeomap.ini`, then applies environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::config_path())?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Reads a `key = value` file; missing file or unknown keys fall back to defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(data_file) = config_map.get("data_file") {
            settings.data_file = data_file.trim_matches('"').to_string();
        }
        parse_into(&config_map, "port", &mut settings.port);
        parse_into(&config_map, "auto_open_browser", &mut settings.auto_open_browser);
        parse_into(&config_map, "initial_lat", &mut settings.initial_lat);
        parse_into(&config_map, "initial_lng", &mut settings.initial_lng);
        parse_into(&config_map, "initial_zoom", &mut settings.initial_zoom);
        parse_into(&config_map, "search_zoom", &mut settings.search_zoom);

        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(data_file) = std::env::var("ARCHAEOMAP_DATA") {
            if !data_file.trim().is_empty() {
                self.data_file = data_file;
            }
        }
        if let Ok(port_str) = std::env::var("ARCHAEOMAP_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port_str, "Ignoring invalid ARCHAEOMAP_PORT"),
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# ArchaeoMap Configuration File\n");
        content.push_str(&format!("data_file = \"{}\"\n", self.data_file));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("initial_lat = {}\n", self.initial_lat));
        content.push_str(&format!("initial_lng = {}\n", self.initial_lng));
        content.push_str(&format!("initial_zoom = {}\n", self.initial_zoom));
        content.push_str(&format!("search_zoom = {}\n", self.search_zoom));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    /// Initial map view for the session
    pub fn home_view(&self) -> View {
        View {
            lat: self.initial_lat,
            lng: self.initial_lng,
            zoom: self.initial_zoom,
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_file)
    }

    pub fn config_path() -> PathBuf {
        crate::utils::get_config_path()
    }
}

// Unparseable values keep the default
fn parse_into<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str, slot: &mut T) {
    if let Some(raw) = map.get(key) {
        match raw.parse::<T>() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!(key, value = %raw, "Ignoring invalid config value"),
        }
    }
}
