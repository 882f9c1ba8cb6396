// vacstat - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every subsystem owns one enum; all of them fold into `VacstatError`.
// None of these are retried: each one aborts the current operation.

use std::fmt;
use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

/// Top-level error type for all vacstat operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum VacstatError {
    /// A record value could not be interpreted.
    Model(ModelError),

    /// A filter, sort or column request was invalid.
    Filter(FilterError),

    /// Statistics aggregation failed.
    Stats(StatsError),

    /// Dataset loading failed.
    Dataset(DatasetError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for VacstatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(e) => write!(f, "Record error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Stats(e) => write!(f, "Statistics error: {e}"),
            Self::Dataset(e) => write!(f, "Dataset error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for VacstatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Stats(e) => Some(e),
            Self::Dataset(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

/// Errors raised while interpreting raw record values.
#[derive(Debug)]
pub enum ModelError {
    /// Currency code is absent from the rate table.
    UnknownCurrency { code: String },

    /// Experience or premium code is absent from its localisation table.
    UnrecognizedCategoryCode {
        category: &'static str,
        code: String,
    },

    /// A salary bound is not a number.
    InvalidAmount {
        field: &'static str,
        value: String,
        source: ParseFloatError,
    },

    /// A publication timestamp matches none of the accepted formats.
    InvalidDate { value: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCurrency { code } => {
                write!(f, "Unknown currency code '{code}'")
            }
            Self::UnrecognizedCategoryCode { category, code } => {
                write!(f, "Unrecognised {category} code '{code}'")
            }
            Self::InvalidAmount {
                field,
                value,
                source,
            } => write!(f, "Invalid amount '{value}' in '{field}': {source}"),
            Self::InvalidDate { value } => {
                write!(f, "Cannot parse publication date '{value}'")
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAmount { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ModelError> for VacstatError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter, sort and column requests.
#[derive(Debug)]
pub enum FilterError {
    /// Field name resolves to no known field.
    UnknownField { name: String },

    /// Numeric salary bound could not be parsed.
    InvalidRange {
        value: String,
        source: ParseIntError,
    },

    /// Filter expression lacks the `field: value` separator.
    InvalidExpression { expression: String },

    /// The field only exists on full-projection records.
    FieldUnavailable { field: &'static str },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { name } => write!(f, "Unknown field '{name}'"),
            Self::InvalidRange { value, source } => {
                write!(f, "Invalid salary bound '{value}': {source}")
            }
            Self::InvalidExpression { expression } => write!(
                f,
                "Filter '{expression}' is malformed. Expected 'field: value'"
            ),
            Self::FieldUnavailable { field } => write!(
                f,
                "Field '{field}' is not loaded for summary records"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRange { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for VacstatError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Stats errors
// ---------------------------------------------------------------------------

/// Errors related to statistics aggregation.
#[derive(Debug)]
pub enum StatsError {
    /// Aggregation was requested over zero records.
    EmptyDataset,

    /// A filter step inside the aggregation failed.
    Filter(FilterError),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "Cannot aggregate an empty dataset"),
            Self::Filter(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::EmptyDataset => None,
        }
    }
}

impl From<FilterError> for StatsError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

impl From<StatsError> for VacstatError {
    fn from(e: StatsError) -> Self {
        Self::Stats(e)
    }
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors related to loading a vacancy CSV file.
#[derive(Debug)]
pub enum DatasetError {
    /// I/O error opening or reading the file.
    Io { path: PathBuf, source: io::Error },

    /// CSV decoding error.
    Csv { path: PathBuf, source: csv::Error },

    /// The file has no header row.
    EmptyFile { path: PathBuf },

    /// The file has a header but no complete rows.
    NoData { path: PathBuf },

    /// A column required by the requested projection is absent.
    MissingColumn { path: PathBuf, column: &'static str },

    /// A complete row holds a value the record model rejects.
    Record {
        path: PathBuf,
        line: u64,
        source: ModelError,
    },

    /// The markup-stripping pattern failed to compile.
    InvalidPattern { source: regex::Error },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "'{}': CSV error: {source}", path.display())
            }
            Self::EmptyFile { path } => write!(f, "'{}' is empty", path.display()),
            Self::NoData { path } => {
                write!(f, "'{}' contains no complete rows", path.display())
            }
            Self::MissingColumn { path, column } => {
                write!(f, "'{}' has no '{column}' column", path.display())
            }
            Self::Record { path, line, source } => {
                write!(f, "'{}' line {line}: {source}", path.display())
            }
            Self::InvalidPattern { source } => {
                write!(f, "Sanitiser pattern failed to compile: {source}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Record { source, .. } => Some(source),
            Self::InvalidPattern { source } => Some(source),
            _ => None,
        }
    }
}

impl From<DatasetError> for VacstatError {
    fn from(e: DatasetError) -> Self {
        Self::Dataset(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for VacstatError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for VacstatError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for vacstat results.
pub type Result<T> = std::result::Result<T, VacstatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_stats_error_chains_filter_source() {
        let err: VacstatError = StatsError::from(FilterError::UnknownField {
            name: "Зарплата".to_string(),
        })
        .into();
        assert_eq!(
            err.to_string(),
            "Statistics error: Unknown field 'Зарплата'"
        );
        let inner = err.source().and_then(|s| s.source());
        assert!(inner.is_some(), "filter error should be reachable");
    }

    #[test]
    fn test_invalid_range_keeps_parse_error() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = FilterError::InvalidRange {
            value: "abc".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("'abc'"));
    }
}
