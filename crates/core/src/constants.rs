/// Maximum length of a goal category label.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Maximum length of a goal description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Lower bound of a stored progress value.
pub const MIN_PROGRESS: f64 = 0.0;

/// Upper bound of a stored progress value.
pub const MAX_PROGRESS: f64 = 100.0;

/// Analysis text stored when progress could not be synthesized.
pub const FALLBACK_ANALYSIS: &str = "Unable to analyze progress";

/// Marker returned by the days-remaining helper for past target dates.
pub const OVERDUE_MARKER: &str = "overdue";

/// Marker returned by the days-remaining helper for missing or unparsable dates.
pub const UNKNOWN_MARKER: &str = "unknown";
