//! Observer configuration
//!
//! Acquisition constants for a hydrogen line setup: sample rate, center
//! frequency, the receiver gain candidates the auto-gain search walks, and
//! how long the calibration (load) integration runs.

use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Gain, ObserverError, ObserverResult};

/// Fixed spectrum resolution. Oversampled FFT output is folded down to this
/// many channels no matter the block size.
pub const SPECTRUM_BINS: usize = 256;

/// RTL-SDR tuner gain steps in dB, ascending. The search accepts the first
/// one that doesn't saturate the front end.
pub const DEFAULT_GAIN_CANDIDATES: &[f64] = &[
    2.0, 3.0, 6.0, 9.0, 11.0, 14.0, 16.0, 17.0, 19.0, 21.0, 22.0, 25.0, 27.0, 29.0, 32.0, 34.0,
    36.0, 37.0, 38.0, 40.0, 42.0, 43.0, 44.0, 45.0, 47.0, 50.0,
];

/// Acquisition settings for one observing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Sample rate in Hz. One accumulation iteration reads this many samples
    /// (one second of signal), so it must be a multiple of `SPECTRUM_BINS`.
    pub sample_rate: f64,
    /// Tuner center frequency
    pub center_freq: Frequency,
    /// Gain candidates for the auto-gain search, ascending dB
    pub gain_candidates: Vec<Gain>,
    /// Load (calibration) integration time in seconds
    pub prep_seconds: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            sample_rate: 2.048e6,
            center_freq: Frequency::mhz(1420.4), // 21cm hydrogen line
            gain_candidates: DEFAULT_GAIN_CANDIDATES.iter().map(|&g| Gain::db(g)).collect(),
            prep_seconds: 5,
        }
    }
}

impl ObserverConfig {
    /// Samples per acquisition iteration (one second of signal). Fractional
    /// sample rates are truncated here, once, so every stage agrees on the
    /// block length.
    pub fn block_len(&self) -> usize {
        self.sample_rate as usize
    }

    /// Check the pipeline preconditions that make bin folding exact.
    pub fn validate(&self) -> ObserverResult<()> {
        let block_len = self.block_len();
        if block_len == 0 {
            return Err(ObserverError::Config(format!(
                "Sample rate {} Hz yields an empty block",
                self.sample_rate
            )));
        }
        if block_len % SPECTRUM_BINS != 0 {
            return Err(ObserverError::Config(format!(
                "Block length {block_len} is not a multiple of {SPECTRUM_BINS} bins"
            )));
        }
        if self.gain_candidates.is_empty() {
            return Err(ObserverError::Config("Empty gain candidate list".to_string()));
        }
        if self.prep_seconds < 1 {
            return Err(ObserverError::Config(
                "Calibration integration must run at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Bin-center frequencies in MHz, ascending, one per spectrum bin.
    /// Spacing is `sample_rate / SPECTRUM_BINS`; the first center sits half a
    /// bin above the low band edge.
    pub fn frequency_axis_mhz(&self) -> Vec<f64> {
        let rate_mhz = self.sample_rate / 1e6;
        let spacing = rate_mhz / SPECTRUM_BINS as f64;
        let start = self.center_freq.as_mhz() - rate_mhz / 2.0 + spacing / 2.0;
        (0..SPECTRUM_BINS).map(|i| start + i as f64 * spacing).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ObserverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.block_len(), 2_048_000);
        assert_eq!(config.gain_candidates.len(), 26);
        assert_eq!(config.prep_seconds, 5);
    }

    #[test]
    fn validate_rejects_unfoldable_rate() {
        let config = ObserverConfig {
            sample_rate: 2_048_100.0, // not a multiple of 256
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ObserverError::Config(_))));
    }

    #[test]
    fn validate_rejects_empty_candidates() {
        let config = ObserverConfig {
            gain_candidates: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ObserverError::Config(_))));
    }

    #[test]
    fn frequency_axis_is_strictly_increasing_with_constant_spacing() {
        let config = ObserverConfig::default();
        let axis = config.frequency_axis_mhz();
        assert_eq!(axis.len(), SPECTRUM_BINS);

        let spacing = config.sample_rate / 1e6 / SPECTRUM_BINS as f64;
        for pair in axis.windows(2) {
            let step = pair[1] - pair[0];
            assert!(step > 0.0, "axis must be strictly increasing");
            assert!(
                (step - spacing).abs() < 1e-9,
                "spacing {step} differs from {spacing}"
            );
        }
    }

    #[test]
    fn frequency_axis_matches_known_values() {
        // 2.048 MHz span around 1420.4 MHz: first center at
        // 1420.4 - 1.024 + 0.004, 8 kHz per bin.
        let axis = ObserverConfig::default().frequency_axis_mhz();
        assert!((axis[0] - 1419.38).abs() < 1e-9);
        assert!((axis[1] - 1419.388).abs() < 1e-9);
        assert!((axis[255] - (1419.38 + 255.0 * 0.008)).abs() < 1e-9);
    }

    #[test]
    fn config_serializes_to_json() {
        let config = ObserverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"prep_seconds\":5"));
    }
}
