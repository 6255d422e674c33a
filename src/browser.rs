//! Browser session for one map page.
//!
//! Owns every piece of mutable page state: the marker entries built at load
//! time, the search box text and result list, the map view and the single
//! highlighted marker. Handlers only touch it through these methods.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{INITIAL_LAT, INITIAL_LNG, INITIAL_ZOOM};
use crate::continent::{classify, Continent};
use crate::marker::{popup_html, MarkerStyle};
use crate::sites::Feature;

/// A rendered marker paired with the site it came from
#[derive(Debug, Clone, Serialize)]
pub struct MarkerEntry {
    pub index: usize,
    pub feature: Feature,
    pub continent: Continent,
    pub style: MarkerStyle,
}

impl MarkerEntry {
    fn new(index: usize, feature: Feature) -> Self {
        let continent = classify(feature.lat, feature.lng);
        MarkerEntry {
            index,
            feature,
            continent,
            style: MarkerStyle::for_continent(continent),
        }
    }

    pub fn popup_html(&self) -> String {
        popup_html(&self.feature, self.continent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl Default for View {
    fn default() -> Self {
        View {
            lat: INITIAL_LAT,
            lng: INITIAL_LNG,
            zoom: INITIAL_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Position in the result list, used to select it
    pub position: usize,
    /// Index of the marker entry
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub visible: bool,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestyledMarker {
    pub index: usize,
    pub style: MarkerStyle,
}

/// Everything the page has to redraw after a result is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightChange {
    pub restored: Option<RestyledMarker>,
    pub highlighted: RestyledMarker,
    pub view: View,
    pub search_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub total_sites: usize,
    pub view: View,
    pub highlighted: Option<usize>,
    pub search_text: String,
    pub results_visible: bool,
    pub result_count: usize,
}

pub struct SiteBrowser {
    entries: Vec<MarkerEntry>,
    highlighted: Option<usize>,
    last_results: Vec<usize>,
    results_visible: bool,
    search_text: String,
    view: View,
    home: View,
    search_zoom: u8,
}

impl SiteBrowser {
    /// Builds one marker entry per feature, in load order
    pub fn new(features: Vec<Feature>, home: View, search_zoom: u8) -> Self {
        let entries: Vec<MarkerEntry> = features
            .into_par_iter()
            .enumerate()
            .map(|(index, feature)| MarkerEntry::new(index, feature))
            .collect();

        SiteBrowser {
            entries,
            highlighted: None,
            last_results: Vec::new(),
            results_visible: false,
            search_text: String::new(),
            view: home,
            home,
            search_zoom,
        }
    }

    /// Session with nothing loaded, used when the data file is unusable
    pub fn empty(home: View, search_zoom: u8) -> Self {
        Self::new(Vec::new(), home, search_zoom)
    }

    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&MarkerEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn highlighted(&self) -> Option<&MarkerEntry> {
        self.highlighted.and_then(|i| self.entries.get(i))
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Runs a search-box input change.
    ///
    /// A blank query hides and empties the result list and leaves the rest of
    /// the session alone. Otherwise the list holds every entry whose name
    /// contains the query, case-insensitively, in load order.
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        self.search_text = query.to_string();
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            self.last_results.clear();
            self.results_visible = false;
            return SearchOutcome {
                query: needle,
                visible: false,
                results: Vec::new(),
            };
        }

        self.last_results = self
            .entries
            .iter()
            .filter(|entry| entry.feature.name.to_lowercase().contains(&needle))
            .map(|entry| entry.index)
            .collect();
        self.results_visible = !self.last_results.is_empty();
        debug!(query = %needle, matches = self.last_results.len(), "search");

        SearchOutcome {
            query: needle,
            visible: self.results_visible,
            results: self.current_results(),
        }
    }

    /// The list currently rendered under the search box
    pub fn current_results(&self) -> Vec<SearchResult> {
        self.last_results
            .iter()
            .enumerate()
            .map(|(position, &index)| SearchResult {
                position,
                index,
                name: self.entries[index].feature.name.clone(),
            })
            .collect()
    }

    /// Click on a result list item, identified by the entry it shows.
    /// Centers on the entry, closes the result list and moves the highlight
    /// to it, restoring the previously highlighted marker first.
    pub fn select_entry(&mut self, index: usize) -> Option<HighlightChange> {
        let target = self.entries.get(index)?;
        self.view = View {
            lat: target.feature.lat,
            lng: target.feature.lng,
            zoom: self.search_zoom,
        };
        self.search_text = target.feature.name.clone();
        self.results_visible = false;

        let restored = self.highlighted.take().map(|prev| self.restore(prev));

        let entry = &mut self.entries[index];
        entry.style = MarkerStyle::highlight();
        let highlighted = RestyledMarker {
            index,
            style: entry.style.clone(),
        };
        self.highlighted = Some(index);
        debug!(index, name = %self.search_text, "highlight moved");

        Some(HighlightChange {
            restored,
            highlighted,
            view: self.view,
            search_text: self.search_text.clone(),
        })
    }

    // Puts a marker back to its continent style
    fn restore(&mut self, index: usize) -> RestyledMarker {
        let entry = &mut self.entries[index];
        entry.style = MarkerStyle::for_continent(entry.continent);
        RestyledMarker {
            index,
            style: entry.style.clone(),
        }
    }

    /// Click outside the search box and result list. Returns whether the list
    /// was open.
    pub fn dismiss_results(&mut self) -> bool {
        std::mem::replace(&mut self.results_visible, false)
    }

    /// Back to the initial world view
    pub fn recenter(&mut self) -> View {
        self.view = self.home;
        self.view
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            total_sites: self.entries.len(),
            view: self.view(),
            highlighted: self.highlighted().map(|entry| entry.index),
            search_text: self.search_text().to_string(),
            results_visible: self.results_visible(),
            result_count: self.last_results.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEARCH_ZOOM;

    fn site(name: &str, lat: f64, lng: f64) -> Feature {
        Feature {
            lat,
            lng,
            name: name.to_string(),
            category: "Site".to_string(),
            description: String::new(),
            external_link: None,
        }
    }

    fn browser() -> SiteBrowser {
        SiteBrowser::new(
            vec![
                site("Great Pyramid of Giza", 29.9792, 31.1342),
                site("Stonehenge", 51.1789, -1.8262),
                site("Giza Sphinx", 29.9753, 31.1376),
                site("Machu Picchu", -13.1631, -72.5450),
                site("Angkor Wat", 13.4125, 103.8670),
            ],
            View::default(),
            SEARCH_ZOOM,
        )
    }

    // What a click on the n-th rendered result sends
    fn select_nth(b: &mut SiteBrowser, position: usize) -> Option<HighlightChange> {
        let index = b.current_results().get(position)?.index;
        b.select_entry(index)
    }

    fn highlighted_count(b: &SiteBrowser) -> usize {
        b.entries().iter().filter(|e| e.style.is_highlight()).count()
    }

    #[test]
    fn one_entry_per_feature_in_order() {
        let b = browser();
        assert_eq!(b.len(), 5);
        let names: Vec<_> = b.entries().iter().map(|e| e.feature.name.as_str()).collect();
        assert_eq!(
            names,
            ["Great Pyramid of Giza", "Stonehenge", "Giza Sphinx", "Machu Picchu", "Angkor Wat"]
        );
        for (i, entry) in b.entries().iter().enumerate() {
            assert_eq!(entry.index, i);
        }
    }

    #[test]
    fn entries_start_with_continent_style() {
        let b = browser();
        assert_eq!(b.entry(0).unwrap().continent, Continent::Africa);
        assert_eq!(b.entry(1).unwrap().style.fill_color, "#f0ded3");
        assert_eq!(b.entry(3).unwrap().continent, Continent::Americas);
        assert_eq!(highlighted_count(&b), 0);
        assert!(b.highlighted().is_none());
    }

    #[test]
    fn large_collection_keeps_order() {
        let features: Vec<_> = (0..5000)
            .map(|i| site(&format!("Site {i}"), (i % 90) as f64, (i % 180) as f64))
            .collect();
        let b = SiteBrowser::new(features, View::default(), SEARCH_ZOOM);
        assert_eq!(b.len(), 5000);
        assert!(b.entries().iter().enumerate().all(|(i, e)| e.feature.name == format!("Site {i}")));
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut b = browser();
        let outcome = b.search("  gIzA ");
        assert_eq!(outcome.query, "giza");
        assert!(outcome.visible);
        let indices: Vec<_> = outcome.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 2]);
        assert_eq!(outcome.results[1].position, 1);
        assert_eq!(outcome.results[1].name, "Giza Sphinx");
        assert!(b.results_visible());
    }

    #[test]
    fn blank_search_hides_results_only() {
        let mut b = browser();
        b.search("giza");
        select_nth(&mut b, 0).unwrap();
        b.search("stone");
        assert!(b.results_visible());

        let outcome = b.search("   ");
        assert!(!outcome.visible);
        assert!(outcome.results.is_empty());
        assert!(!b.results_visible());
        // highlight and view untouched
        assert_eq!(b.highlighted().unwrap().index, 0);
        assert_eq!(b.view().zoom, SEARCH_ZOOM);
    }

    #[test]
    fn no_matches_hides_list() {
        let mut b = browser();
        let outcome = b.search("atlantis");
        assert!(!outcome.visible);
        assert!(outcome.results.is_empty());
        assert!(select_nth(&mut b, 0).is_none());
    }

    #[test]
    fn selecting_centers_and_highlights() {
        let mut b = browser();
        b.search("giza");
        let change = select_nth(&mut b, 1).unwrap();
        assert!(change.restored.is_none());
        assert_eq!(change.highlighted.index, 2);
        assert_eq!(change.highlighted.style, MarkerStyle::highlight());
        assert_eq!(change.view.zoom, SEARCH_ZOOM);
        assert!((change.view.lat - 29.9753).abs() < f64::EPSILON);
        assert!((change.view.lng - 31.1376).abs() < f64::EPSILON);
        assert_eq!(change.search_text, "Giza Sphinx");
        assert_eq!(b.search_text(), "Giza Sphinx");
        assert!(!b.results_visible());
        assert_eq!(highlighted_count(&b), 1);
    }

    #[test]
    fn new_selection_restores_previous_marker() {
        let mut b = browser();
        b.search("giza");
        select_nth(&mut b, 0).unwrap();

        b.search("stone");
        let change = select_nth(&mut b, 0).unwrap();
        let restored = change.restored.unwrap();
        assert_eq!(restored.index, 0);
        assert_eq!(restored.style, MarkerStyle::for_continent(Continent::Africa));
        assert_eq!(b.entry(0).unwrap().style.fill_color, "#759194");
        assert_eq!(b.highlighted().unwrap().index, 1);
        assert_eq!(highlighted_count(&b), 1);
    }

    #[test]
    fn reselecting_same_marker_keeps_single_highlight() {
        let mut b = browser();
        b.search("angkor");
        select_nth(&mut b, 0).unwrap();
        b.search("angkor");
        let change = select_nth(&mut b, 0).unwrap();
        assert_eq!(change.restored.as_ref().map(|r| r.index), Some(4));
        assert_eq!(change.highlighted.index, 4);
        assert!(b.entry(4).unwrap().style.is_highlight());
        assert_eq!(highlighted_count(&b), 1);
    }

    #[test]
    fn out_of_range_selection_changes_nothing() {
        let mut b = browser();
        b.search("giza");
        assert!(select_nth(&mut b, 2).is_none());
        assert!(b.select_entry(99).is_none());
        assert!(b.results_visible());
        assert!(b.highlighted().is_none());
        assert_eq!(b.view(), View::default());
    }

    #[test]
    fn dismiss_keeps_highlight() {
        let mut b = browser();
        b.search("giza");
        select_nth(&mut b, 0).unwrap();
        b.search("s");
        assert!(b.dismiss_results());
        assert!(!b.results_visible());
        assert!(!b.dismiss_results());
        assert_eq!(b.highlighted().unwrap().index, 0);
        assert_eq!(highlighted_count(&b), 1);
    }

    #[test]
    fn recenter_restores_home_view() {
        let home = View { lat: 10.0, lng: 5.0, zoom: 4 };
        let mut b = SiteBrowser::new(vec![site("Petra", 30.3285, 35.4444)], home, 9);
        b.select_entry(0).unwrap();
        assert_eq!(b.view().zoom, 9);
        assert_eq!(b.recenter(), home);
        assert_eq!(b.highlighted().unwrap().index, 0);
    }

    #[test]
    fn empty_session_is_usable() {
        let mut b = SiteBrowser::empty(View::default(), SEARCH_ZOOM);
        assert!(b.is_empty());
        assert!(!b.search("giza").visible);
        assert!(b.select_entry(0).is_none());
        assert_eq!(b.snapshot().total_sites, 0);
    }
}
