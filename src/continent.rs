use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DEFAULT_FILL;

/// Coarse region label derived from a site's coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    Americas,
    Africa,
    Europe,
    Asia,
    Oceania,
    Antarctica,
    Other,
}

// Bounding boxes: (continent, min_lat, max_lat, min_lng, max_lng), inclusive.
// Boxes overlap, so the order here decides the winner.
const BOXES: &[(Continent, f64, f64, f64, f64)] = &[
    (Continent::Americas, -60.0, 90.0, -170.0, -30.0),
    (Continent::Africa, -35.0, 37.0, -20.0, 55.0),
    (Continent::Europe, 35.0, 80.0, -25.0, 60.0),
    (Continent::Asia, 5.0, 55.0, 60.0, 150.0),
    (Continent::Oceania, -50.0, 0.0, 110.0, 180.0),
];

const ANTARCTIC_LAT: f64 = -60.0;

const CONTINENT_COLORS: &[(Continent, &str)] = &[
    (Continent::Americas, "#67a86aff"),
    (Continent::Africa, "#759194"),
    (Continent::Europe, "#f0ded3"),
    (Continent::Asia, "#DE9C73"),
    (Continent::Oceania, "#e6ffff"),
    (Continent::Antarctica, "#f0f8ff"),
    (Continent::Other, "#f5f5f5"),
];

/// Classifies a coordinate pair. First matching box wins; anything that
/// matches no box (including NaN) is `Other`.
pub fn classify(lat: f64, lng: f64) -> Continent {
    for &(continent, min_lat, max_lat, min_lng, max_lng) in BOXES {
        if lat >= min_lat && lat <= max_lat && lng >= min_lng && lng <= max_lng {
            return continent;
        }
    }
    if lat < ANTARCTIC_LAT {
        return Continent::Antarctica;
    }
    Continent::Other
}

impl Continent {
    pub fn label(self) -> &'static str {
        match self {
            Continent::Americas => "Americas",
            Continent::Africa => "Africa",
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::Oceania => "Oceania",
            Continent::Antarctica => "Antarctica",
            Continent::Other => "Other",
        }
    }

    /// Marker and popup background color for this continent
    pub fn color(self) -> &'static str {
        CONTINENT_COLORS
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, color)| *color)
            .unwrap_or(DEFAULT_FILL)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_meridian_is_africa() {
        assert_eq!(classify(0.0, 0.0), Continent::Africa);
    }

    #[test]
    fn deep_south_is_antarctica() {
        assert_eq!(classify(-80.0, 0.0), Continent::Antarctica);
        assert_eq!(classify(-60.5, 100.0), Continent::Antarctica);
    }

    #[test]
    fn antarctic_threshold_is_exclusive() {
        // -60 itself is not "below -60" and lies in no box at lng 0
        assert_eq!(classify(-60.0, 0.0), Continent::Other);
        // ...but the Americas box includes -60
        assert_eq!(classify(-60.0, -70.0), Continent::Americas);
    }

    #[test]
    fn pacific_outside_oceania_box_is_other() {
        assert_eq!(classify(0.0, 170.0), Continent::Oceania);
        assert_eq!(classify(10.0, 170.0), Continent::Other);
        assert_eq!(classify(0.0, -175.0), Continent::Other);
    }

    #[test]
    fn box_edges_are_inclusive() {
        assert_eq!(classify(90.0, -170.0), Continent::Americas);
        assert_eq!(classify(-35.0, 55.0), Continent::Africa);
        assert_eq!(classify(80.0, 60.0), Continent::Europe);
        assert_eq!(classify(5.0, 150.0), Continent::Asia);
        assert_eq!(classify(-50.0, 180.0), Continent::Oceania);
    }

    #[test]
    fn just_outside_edges_falls_through() {
        assert_eq!(classify(80.01, 10.0), Continent::Other);
        assert_eq!(classify(4.99, 100.0), Continent::Other);
        assert_eq!(classify(-50.01, 150.0), Continent::Other);
    }

    #[test]
    fn overlap_resolved_by_order() {
        // Inside both the Africa and Europe boxes
        assert_eq!(classify(36.0, 10.0), Continent::Africa);
        // Europe box only
        assert_eq!(classify(48.85, 2.35), Continent::Europe);
        // Europe and Asia boxes share lng 60; Europe comes first
        assert_eq!(classify(50.0, 60.0), Continent::Europe);
    }

    #[test]
    fn well_known_sites() {
        assert_eq!(classify(29.9792, 31.1342), Continent::Africa); // Giza
        assert_eq!(classify(51.1789, -1.8262), Continent::Europe); // Stonehenge
        assert_eq!(classify(-13.1631, -72.5450), Continent::Americas); // Machu Picchu
        assert_eq!(classify(13.4125, 103.8670), Continent::Asia); // Angkor Wat
    }

    #[test]
    fn nan_is_other() {
        assert_eq!(classify(f64::NAN, 0.0), Continent::Other);
        assert_eq!(classify(0.0, f64::NAN), Continent::Other);
    }

    #[test]
    fn every_continent_has_a_color() {
        assert_eq!(Continent::Africa.color(), "#759194");
        assert_eq!(Continent::Other.color(), DEFAULT_FILL);
        assert_eq!(Continent::Americas.to_string(), "Americas");
    }
}
