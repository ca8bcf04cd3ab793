//! Signal processing stages of the acquisition pipeline
//!
//! `calibration` is pure math; `gain` and `spectrum` drive a `SampleSource`
//! but keep their numeric cores in private helpers.

pub mod calibration;
pub mod gain;
pub mod spectrum;

// Re-export commonly used items
pub use calibration::relative_db;
pub use gain::GainController;
pub use spectrum::SpectralAccumulator;
