//! Defines the crate level error type.

/// The errors that may occur while building sale records and reports.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A sale was entered with a price below zero.
    ///
    /// Prices are classified into price segments, which are only defined for
    /// non-negative prices, so negative prices are rejected rather than
    /// clamped.
    #[error("{0} is a negative price, which is not allowed")]
    NegativePrice(f64),

    /// A sale was entered with a price that is not a finite number, or whose
    /// total value is too large to represent.
    #[error("{0} is not a valid price")]
    InvalidPrice(f64),

    /// A sale was entered with a quantity of zero or less, or more than
    /// [i32::MAX] units.
    #[error("quantity must be between 1 and 2147483647, got {0}")]
    InvalidQuantity(i64),

    /// The delimited backup text could not be read or written.
    ///
    /// Individual malformed rows do not produce this error, they are skipped
    /// and reported in the import summary instead.
    #[error("could not process the backup CSV: {0}")]
    InvalidCsv(String),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested sale does not exist in the store.
    #[error("the requested sale could not be found")]
    NotFound,
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        tracing::error!("an unhandled CSV error occurred: {}", value);
        Error::InvalidCsv(value.to_string())
    }
}
