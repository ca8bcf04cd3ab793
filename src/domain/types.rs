//! Core domain types

use chrono::{DateTime, Utc};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// One block of complex baseband samples (I/Q pairs) as read from a source.
/// Consumed immediately by the pipeline, never retained.
pub type SampleBlock = Vec<Complex64>;

/// Averaged power per frequency channel, always `SPECTRUM_BINS` entries,
/// ascending frequency offset from the center frequency.
pub type PowerSpectrum = Vec<f64>;

/// Frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(pub f64);

impl Frequency {
    pub fn hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn khz(khz: f64) -> Self {
        Self(khz * 1_000.0)
    }

    pub fn mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }

    pub fn as_mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }
}

/// Receiver gain setting in dB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gain(pub f64);

impl Gain {
    pub fn db(db: f64) -> Self {
        Self(db)
    }

    pub fn as_db(&self) -> f64 {
        self.0
    }
}

/// Everything one observation run produces, handed back to the caller for
/// persistence and plotting. The pipeline itself writes no files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Free-text observation number label (e.g. "001")
    pub observation_no: String,
    /// Free-text source name label (e.g. "MilkyWay")
    pub source_name: String,
    /// UTC time the observation completed
    pub observed_at: DateTime<Utc>,
    /// Bin-center frequencies in MHz, same length as the spectra
    pub frequency_mhz: Vec<f64>,
    /// Raw sky power spectrum
    pub raw_sky: PowerSpectrum,
    /// Raw load (calibration baseline) power spectrum
    pub raw_load: PowerSpectrum,
    /// Calibrated relative intensity in dB, finite at every bin
    pub relative_db: Vec<f64>,
    /// Gain the observation ran at
    pub gain: Gain,
    /// True when the samples came from a synthetic generator
    pub simulated: bool,
}

impl ObservationRecord {
    /// Compact timestamp label for filenames, e.g. "20260805T143000"
    pub fn timestamp_label(&self) -> String {
        self.observed_at.format("%Y%m%dT%H%M%S").to_string()
    }
}
