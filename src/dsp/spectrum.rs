//! Streaming FFT power-spectrum accumulation
//!
//! Each acquisition iteration reads one second of samples, transforms it to
//! a centered power spectrum, folds the oversampled resolution down to the
//! fixed channel count, and adds it into a running sum. The result is the
//! arithmetic mean over all iterations.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::domain::{ObserverError, ObserverResult, PowerSpectrum};
use crate::ports::SampleSource;

/// The accumulator yields to the caller every this many iterations
pub const PROGRESS_INTERVAL: usize = 5;

/// Power-spectrum accumulator with a cached FFT plan
pub struct SpectralAccumulator {
    fft: Arc<dyn Fft<f64>>,
    block_len: usize,
    fold: usize,
}

impl SpectralAccumulator {
    /// `block_len` is the samples read per iteration (nominally one second),
    /// `bins` the output resolution. The block must fold evenly into the
    /// bins; anything else is a configuration error, caught here.
    pub fn new(block_len: usize, bins: usize) -> ObserverResult<Self> {
        if bins == 0 || block_len == 0 || block_len % bins != 0 {
            return Err(ObserverError::Config(format!(
                "Block length {block_len} does not fold evenly into {bins} bins"
            )));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(block_len);

        Ok(Self {
            fft,
            block_len,
            fold: block_len / bins,
        })
    }

    /// Output resolution in bins
    pub fn bins(&self) -> usize {
        self.block_len / self.fold
    }

    /// Acquire and average power spectra over `seconds` iterations.
    ///
    /// `progress(completed, total)` is invoked at iteration boundaries every
    /// `PROGRESS_INTERVAL` iterations so a host event loop can stay
    /// responsive. It never runs mid-iteration; a partially summed spectrum
    /// is never observable.
    pub fn accumulate<F>(
        &self,
        source: &mut dyn SampleSource,
        seconds: usize,
        mut progress: F,
    ) -> ObserverResult<PowerSpectrum>
    where
        F: FnMut(usize, usize),
    {
        if seconds < 1 {
            return Err(ObserverError::InvalidInput(
                "Integration time must be at least 1 second".to_string(),
            ));
        }

        let mut sum = vec![0.0; self.bins()];
        let scale = 2.0 / self.block_len as f64;

        for iteration in 0..seconds {
            let mut block = source.read_samples(self.block_len)?;
            if block.len() != self.block_len {
                return Err(ObserverError::Config(format!(
                    "Source returned {} samples, expected {}",
                    block.len(),
                    self.block_len
                )));
            }

            self.fft.process(&mut block);
            // Move zero frequency to the middle so bin order matches the
            // ascending frequency axis
            block.rotate_left(self.block_len / 2);

            for (bin, chunk) in block.chunks_exact(self.fold).enumerate() {
                sum[bin] += chunk
                    .iter()
                    .map(|c| c.norm_sqr() * scale * scale)
                    .sum::<f64>();
            }

            if iteration % PROGRESS_INTERVAL == 0 {
                progress(iteration + 1, seconds);
            }
        }

        for bin in &mut sum {
            *bin /= seconds as f64;
        }
        Ok(sum)
    }
}
