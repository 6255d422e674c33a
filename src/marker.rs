use serde::{Deserialize, Serialize};

use crate::constants::{
    HIGHLIGHT_FILL, HIGHLIGHT_RADIUS, HIGHLIGHT_STROKE_COLOR, HIGHLIGHT_STROKE_WEIGHT,
    MARKER_RADIUS, MARKER_STROKE_COLOR, MARKER_STROKE_WEIGHT,
};
use crate::continent::Continent;
use crate::sites::Feature;
use crate::utils::{encode_uri_component, escape_html, is_web_link};

/// Circle marker appearance, handed to Leaflet's `circleMarker` as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: u32,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: u32,
    pub color: String,
}

impl MarkerStyle {
    /// Resting style: continent fill, thin dark border
    pub fn for_continent(continent: Continent) -> Self {
        MarkerStyle {
            radius: MARKER_RADIUS,
            fill_color: continent.color().to_string(),
            fill_opacity: 1.0,
            weight: MARKER_STROKE_WEIGHT,
            color: MARKER_STROKE_COLOR.to_string(),
        }
    }

    /// Selected-from-search style
    pub fn highlight() -> Self {
        MarkerStyle {
            radius: HIGHLIGHT_RADIUS,
            fill_color: HIGHLIGHT_FILL.to_string(),
            fill_opacity: 1.0,
            weight: HIGHLIGHT_STROKE_WEIGHT,
            color: HIGHLIGHT_STROKE_COLOR.to_string(),
        }
    }

    pub fn is_highlight(&self) -> bool {
        *self == MarkerStyle::highlight()
    }
}

/// Web search link used for a popup title
pub fn search_link(name: &str) -> String {
    format!("https://www.google.com/search?q={}", encode_uri_component(name))
}

/// Renders the detail popup shown when a marker is clicked
pub fn popup_html(feature: &Feature, continent: Continent) -> String {
    let bg_color = continent.color();
    let name = escape_html(&feature.name);

    let link_html = match feature.external_link.as_deref() {
        Some(link) if is_web_link(link) => format!(
            r#"<div class="popup-link"><a href="{}" target="_blank" rel="noopener">Learn more on Arkeyo</a></div>"#,
            escape_html(link.trim())
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="site-popup" style="background: {bg};">
    <a href="{href}" target="_blank" rel="noopener" class="popup-title-link"><h2 class="popup-title">{name}</h2></a>
    <div class="popup-category"><span class="popup-label">Category:</span> {category}</div>
    <div class="popup-description">{description}</div>
    <div class="popup-continent">{continent}</div>
    {link}
</div>"#,
        bg = bg_color,
        href = escape_html(&search_link(&feature.name)),
        name = name,
        category = escape_html(&feature.category),
        description = escape_html(&feature.description),
        continent = continent.label(),
        link = link_html,
    )
}
