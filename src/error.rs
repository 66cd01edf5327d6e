//! Error types.

use thiserror::Error;

/// Result type alias for prayer time operations.
pub type Result<T> = std::result::Result<T, PrayTimeError>;

/// Failures at the boundary of the engine. Astronomical edge cases are not
/// errors: they surface as invalid entries in the computed table.
#[derive(Debug, Error)]
pub enum PrayTimeError {
    /// The calendar date does not exist or is out of range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Method name not found in the method table.
    #[error("unknown calculation method: {0}")]
    UnknownMethod(String),

    /// A named setting value that is not recognised.
    #[error("unknown value {value:?} for setting `{field}`")]
    UnknownSetting {
        field: &'static str,
        value: String,
    },

    /// A setting whose value is out of range.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// UTC offset that chrono cannot represent.
    #[error("invalid utc offset: {0} hours")]
    InvalidUtcOffset(f64),

    #[error("configuration parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
