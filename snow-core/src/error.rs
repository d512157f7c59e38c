use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating a [`crate::config::Config`].
///
/// The simulation passes themselves never fail; every error in this crate
/// comes from reading configuration before a simulator is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value that must be strictly positive was zero or negative.
    #[error("`{field}` must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    /// A value that must not be negative was negative.
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    /// A value was NaN or infinite.
    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },
    /// A value fell outside its closed range.
    #[error("`{field}` must be within {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
