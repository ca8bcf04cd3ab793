//! Domain error types

use thiserror::Error;

/// Errors that can occur in the observation pipeline
#[derive(Error, Debug)]
pub enum ObserverError {
    /// The underlying sample source could not be constructed or opened
    /// (missing driver, hardware not connected).
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Gain search exhausted every candidate on a real source without finding
    /// a non-saturating setting.
    #[error("Excessive input level: {0}")]
    ExcessiveInputLevel(String),

    /// An observation was attempted before any successful calibration.
    #[error("Not calibrated: {0}")]
    NotCalibrated(String),

    /// Missing/empty labels or a non-positive duration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pipeline precondition violated (e.g. block length not a multiple of
    /// the spectrum resolution).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations
pub type ObserverResult<T> = Result<T, ObserverError>;
