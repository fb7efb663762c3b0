/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month bucket format: "2025-01"
pub(crate) const MONTH_FORMAT: &str = "%Y-%m";

/// Milliseconds in one hour, the divisor for every hours figure
pub(crate) const MS_PER_HOUR: f64 = 3_600_000.0;

pub(crate) const DEFAULT_TOP_COUNTRIES: usize = 10;
pub(crate) const DEFAULT_TOP_ARTISTS: usize = 5;
pub(crate) const DEFAULT_TOP_ALBUMS: usize = 10;
pub(crate) const DEFAULT_TOP_PODCASTS: usize = 5;
