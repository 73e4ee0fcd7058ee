use thiserror::Error;

/// Errors returned by dataset generation and clustering in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument or configuration value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A latitude/longitude pair outside the valid degree ranges.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude in degrees.
        latitude: f64,
        /// Offending longitude in degrees.
        longitude: f64,
    },

    /// The viewport would be split into more cells than a clustering pass allows.
    #[error("grid too large: {columns} x {rows} cells")]
    GridTooLarge {
        /// Number of cell columns.
        columns: usize,
        /// Number of cell rows.
        rows: usize,
    },

    /// A pin list or configuration document could not be parsed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
