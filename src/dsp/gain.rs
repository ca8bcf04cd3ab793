//! Adaptive gain search
//!
//! Walks a fixed list of tuner gain candidates and picks the first one where
//! the receiver front end is not saturating. Saturation shows up as the
//! amplitude distribution of the raw I/Q samples piling into a few histogram
//! bins, so the metric is the peak of the normalized real+imaginary
//! histograms scaled by the bin count.

use num_complex::Complex64;

use crate::domain::{Gain, ObserverError, ObserverResult};
use crate::ports::SampleSource;

/// Histogram resolution for the saturation metric
const HIST_BINS: usize = 256;
/// Histogram range, the ADC's normalized output span
const HIST_LO: f64 = -1.0;
const HIST_HI: f64 = 1.0;
/// A candidate is accepted when the metric peak stays below this
const SATURATION_LIMIT: f64 = 7.0;
/// Synthetic sources settle on the current candidate after this many trial
/// rounds rather than ever failing the search
const SYNTHETIC_TRIAL_ROUNDS: usize = 3;

/// Gain search over an ascending candidate list
pub struct GainController {
    candidates: Vec<Gain>,
    block_len: usize,
}

impl GainController {
    /// `block_len` is the probe read size per candidate, nominally one second
    /// of samples.
    pub fn new(candidates: Vec<Gain>, block_len: usize) -> Self {
        Self {
            candidates,
            block_len,
        }
    }

    /// Find the lowest non-saturating gain and leave the source set to it.
    ///
    /// Real sources that saturate through the whole list fail with
    /// `ExcessiveInputLevel`. Synthetic sources never fail: after the trial
    /// rounds the search settles on whatever candidate it reached.
    pub fn search(&self, source: &mut dyn SampleSource) -> ObserverResult<Gain> {
        let Some(&first) = self.candidates.first() else {
            return Err(ObserverError::Config("Empty gain candidate list".to_string()));
        };

        let mut chosen = first;
        for (round, &candidate) in self.candidates.iter().enumerate() {
            source.set_gain(candidate)?;
            let block = source.read_samples(self.block_len)?;
            let peak = saturation_peak(&block);
            log::debug!(
                "Gain candidate {} dB: saturation peak {peak:.2}",
                candidate.as_db()
            );

            if source.is_synthetic() && round > SYNTHETIC_TRIAL_ROUNDS {
                chosen = candidate;
                break;
            }

            if peak < SATURATION_LIMIT {
                chosen = candidate;
                break;
            }

            if round == self.candidates.len() - 1 && !source.is_synthetic() {
                return Err(ObserverError::ExcessiveInputLevel(format!(
                    "Front end still saturating at maximum gain {} dB",
                    candidate.as_db()
                )));
            }
        }

        source.set_gain(chosen)?;
        Ok(chosen)
    }
}

/// Peak of the saturation metric; +inf when no sample falls inside the
/// histogram range (everything clipped past full scale).
fn saturation_peak(block: &[Complex64]) -> f64 {
    match saturation_metric(block) {
        Some(n0) => n0.iter().fold(0.0, |acc: f64, &v| acc.max(v)),
        None => f64::INFINITY,
    }
}

/// The `N0` metric: normalized histograms of the real and imaginary parts
/// over [-1, 1], summed and scaled by the bin count. A flat distribution
/// scores ~2 per bin; clipped input spikes far above the acceptance limit.
fn saturation_metric(block: &[Complex64]) -> Option<Vec<f64>> {
    let (re_counts, re_total) = histogram(block.iter().map(|s| s.re));
    let (im_counts, im_total) = histogram(block.iter().map(|s| s.im));
    if re_total == 0 || im_total == 0 {
        return None;
    }

    Some(
        re_counts
            .iter()
            .zip(im_counts.iter())
            .map(|(&r, &i)| {
                (r as f64 / re_total as f64 + i as f64 / im_total as f64) * HIST_BINS as f64
            })
            .collect(),
    )
}

/// Fixed-range histogram. Values outside [HIST_LO, HIST_HI] are ignored; the
/// top edge lands in the last bin.
fn histogram(values: impl Iterator<Item = f64>) -> ([u64; HIST_BINS], u64) {
    let width = (HIST_HI - HIST_LO) / HIST_BINS as f64;
    let mut counts = [0u64; HIST_BINS];
    let mut total = 0u64;

    for v in values {
        if !(HIST_LO..=HIST_HI).contains(&v) {
            continue;
        }
        let idx = (((v - HIST_LO) / width) as usize).min(HIST_BINS - 1);
        counts[idx] += 1;
        total += 1;
    }

    (counts, total)
}
