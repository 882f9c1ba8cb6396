// vacstat - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "vacstat";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "vacstat";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Statistics
// =============================================================================

/// First year (inclusive) of the year series.
pub const DEFAULT_FIRST_YEAR: i32 = 2007;

/// Last year (inclusive) of the year series.
pub const DEFAULT_LAST_YEAR: i32 = 2022;

/// Earliest year accepted from config.toml.
pub const MIN_YEAR: i32 = 1990;

/// Latest year accepted from config.toml.
pub const MAX_YEAR: i32 = 2100;

/// Minimum fraction of all postings an area needs to appear in area series.
/// The boundary is closed: an area at exactly this share is kept.
pub const DEFAULT_MIN_AREA_SHARE: f64 = 0.01;

/// Number of areas kept in each ranked area series.
pub const DEFAULT_TOP_AREAS: usize = 10;

/// Hard upper bound on the configurable area count.
pub const MAX_TOP_AREAS: usize = 100;

/// Decimal places kept on area shares.
pub const SHARE_DECIMALS: i32 = 4;

// =============================================================================
// Listing
// =============================================================================

/// Display values longer than this many characters are cut and suffixed.
pub const DEFAULT_MAX_CELL_CHARS: usize = 100;

/// Upper bound on the configurable cell width.
pub const MAX_CELL_CHARS: usize = 10_000;

/// Suffix appended to truncated display values.
pub const TRUNCATION_SUFFIX: &str = "...";

/// Header of the row-number column in listings.
pub const ROW_NUMBER_HEADER: &str = "№";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration and output files
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Year statistics export file name.
pub const YEARS_EXPORT_FILE_NAME: &str = "years.csv";

/// Area statistics export file name.
pub const AREAS_EXPORT_FILE_NAME: &str = "areas.csv";

/// Full statistics export file name.
pub const STATS_EXPORT_FILE_NAME: &str = "stats.json";
