// Port configuration
pub const DEFAULT_PORT: u16 = 3001;
pub const ALTERNATIVE_PORT: u16 = 3002;

// Data file looked up next to the working directory when nothing is configured
pub const DEFAULT_DATA_FILE: &str = "archaeology_sites_full.geojson";

// Initial view (whole world)
pub const INITIAL_LAT: f64 = 20.0;
pub const INITIAL_LNG: f64 = 0.0;
pub const INITIAL_ZOOM: u8 = 3;

// Close-up zoom used when a search result is selected
pub const SEARCH_ZOOM: u8 = 7;

// Default marker look: continent fill, thin dark border
pub const MARKER_RADIUS: u32 = 8;
pub const MARKER_STROKE_WEIGHT: u32 = 1;
pub const MARKER_STROKE_COLOR: &str = "#333";

// Highlighted marker look: bigger, dark pastel fill, pastel blue border
pub const HIGHLIGHT_RADIUS: u32 = 10;
pub const HIGHLIGHT_FILL: &str = "#2d3748";
pub const HIGHLIGHT_STROKE_WEIGHT: u32 = 2;
pub const HIGHLIGHT_STROKE_COLOR: &str = "#60a5fa";

// Fill used when a continent has no entry in the color table
pub const DEFAULT_FILL: &str = "#f5f5f5";

// Session events buffered for slow SSE subscribers
pub const EVENT_CHANNEL_CAPACITY: usize = 100;
