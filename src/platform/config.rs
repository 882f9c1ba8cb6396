// vacstat - platform/config.rs
//
// Platform configuration directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::stats::StatsSettings;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for vacstat configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/vacstat/ or %APPDATA%\vacstat\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so newer config files work with older binaries.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[stats]` section.
    pub stats: StatsSection,
    /// `[listing]` section.
    pub listing: ListingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[stats]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StatsSection {
    /// First year of the year series.
    pub first_year: Option<i32>,
    /// Last year of the year series.
    pub last_year: Option<i32>,
    /// Minimum share of postings for an area to be ranked.
    pub min_area_share: Option<f64>,
    /// Entries kept per area ranking.
    pub top_areas: Option<usize>,
}

/// `[listing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ListingSection {
    /// Display values are cut after this many characters.
    pub max_cell_chars: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Aggregation parameters.
    pub stats: StatsSettings,
    /// Listing cell width.
    pub max_cell_chars: usize,
    /// Logging level string (read before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats: StatsSettings::default(),
            max_cell_chars: constants::DEFAULT_MAX_CELL_CHARS,
            log_level: None,
        }
    }
}

/// Load config.toml from the platform config directory.
///
/// Never fails: a missing file yields defaults with no warnings, an
/// unreadable or unparseable one yields defaults with a warning.
pub fn load_config(paths: &PlatformPaths) -> (AppConfig, Vec<String>) {
    let config_path = paths.config_file();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => (
            AppConfig::default(),
            vec![format!("{e}. Using defaults.")],
        ),
    }
}

/// Load an explicitly named config file.
///
/// Read and parse failures are errors; out-of-range values are warnings.
pub fn load_config_file(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(validate(raw))
}

/// Check every raw value against the limits in `constants`.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();
    let year_range = constants::MIN_YEAR..=constants::MAX_YEAR;

    // -- Stats: year range --
    let mut first_year = config.stats.first_year;
    let mut last_year = config.stats.last_year;
    if let Some(year) = raw.stats.first_year {
        if year_range.contains(&year) {
            first_year = year;
        } else {
            warnings.push(format!(
                "[stats] first_year = {year} is out of range ({}-{}). Using default ({}).",
                constants::MIN_YEAR,
                constants::MAX_YEAR,
                constants::DEFAULT_FIRST_YEAR,
            ));
        }
    }
    if let Some(year) = raw.stats.last_year {
        if year_range.contains(&year) {
            last_year = year;
        } else {
            warnings.push(format!(
                "[stats] last_year = {year} is out of range ({}-{}). Using default ({}).",
                constants::MIN_YEAR,
                constants::MAX_YEAR,
                constants::DEFAULT_LAST_YEAR,
            ));
        }
    }
    if first_year <= last_year {
        config.stats.first_year = first_year;
        config.stats.last_year = last_year;
    } else {
        warnings.push(format!(
            "[stats] first_year ({first_year}) is after last_year ({last_year}). \
             Using defaults ({}-{}).",
            constants::DEFAULT_FIRST_YEAR,
            constants::DEFAULT_LAST_YEAR,
        ));
    }

    // -- Stats: min_area_share --
    if let Some(share) = raw.stats.min_area_share {
        if (0.0..=1.0).contains(&share) {
            config.stats.min_area_share = share;
        } else {
            warnings.push(format!(
                "[stats] min_area_share = {share} is out of range (0.0-1.0). Using default ({}).",
                constants::DEFAULT_MIN_AREA_SHARE,
            ));
        }
    }

    // -- Stats: top_areas --
    if let Some(top) = raw.stats.top_areas {
        if (1..=constants::MAX_TOP_AREAS).contains(&top) {
            config.stats.top_areas = top;
        } else {
            warnings.push(format!(
                "[stats] top_areas = {top} is out of range (1-{}). Using default ({}).",
                constants::MAX_TOP_AREAS,
                constants::DEFAULT_TOP_AREAS,
            ));
        }
    }

    // -- Listing: max_cell_chars --
    if let Some(chars) = raw.listing.max_cell_chars {
        if (1..=constants::MAX_CELL_CHARS).contains(&chars) {
            config.max_cell_chars = chars;
        } else {
            warnings.push(format!(
                "[listing] max_cell_chars = {chars} is out of range (1-{}). Using default ({}).",
                constants::MAX_CELL_CHARS,
                constants::DEFAULT_MAX_CELL_CHARS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}
