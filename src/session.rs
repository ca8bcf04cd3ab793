//! Observation session orchestration
//!
//! Owns the state shared between calibration and observation: the stored
//! load spectrum and the gain the auto-gain search settled on. A session
//! belongs to one caller and runs everything on the caller's thread; calls
//! must be serialized by the owner.

use chrono::Utc;

use crate::domain::{
    Gain, ObservationRecord, ObserverConfig, ObserverError, ObserverResult, PowerSpectrum,
    SPECTRUM_BINS,
};
use crate::dsp::{relative_db, GainController, SpectralAccumulator};
use crate::ports::{SampleSource, SourceFactory};

/// Two-operation state machine: Idle until a calibration succeeds, then
/// Calibrated; observations require Calibrated and leave it unchanged.
pub struct ObservationSession {
    config: ObserverConfig,
    load_spectrum: Option<PowerSpectrum>,
    active_gain: Gain,
}

impl ObservationSession {
    pub fn new(config: ObserverConfig) -> ObserverResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            load_spectrum: None,
            active_gain: Gain::db(0.0),
        })
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn is_calibrated(&self) -> bool {
        self.load_spectrum.is_some()
    }

    pub fn load_spectrum(&self) -> Option<&PowerSpectrum> {
        self.load_spectrum.as_ref()
    }

    /// Gain frozen by the last successful calibration
    pub fn active_gain(&self) -> Gain {
        self.active_gain
    }

    /// Measure the load baseline: auto-gain search over the configured
    /// candidates, then `prep_seconds` of power accumulation.
    ///
    /// On success the session becomes Calibrated and the chosen gain is
    /// returned. On any failure the source is closed, the error surfaces,
    /// and the session state is left exactly as it was.
    pub fn run_calibration<F>(
        &mut self,
        factory: &mut dyn SourceFactory,
        progress: F,
    ) -> ObserverResult<Gain>
    where
        F: FnMut(usize, usize),
    {
        let mut source = factory.open(self.is_calibrated())?;
        let outcome = self.calibrate_on(source.as_mut(), progress);
        source.close();

        let (gain, load) = outcome?;
        log::info!("Calibration complete, gain {} dB", gain.as_db());
        self.load_spectrum = Some(load);
        self.active_gain = gain;
        Ok(gain)
    }

    fn calibrate_on<F>(
        &self,
        source: &mut dyn SampleSource,
        progress: F,
    ) -> ObserverResult<(Gain, PowerSpectrum)>
    where
        F: FnMut(usize, usize),
    {
        source.set_sample_rate(self.config.sample_rate)?;
        source.set_center_freq(self.config.center_freq)?;

        let controller = GainController::new(
            self.config.gain_candidates.clone(),
            self.config.block_len(),
        );
        let gain = controller.search(source)?;

        let accumulator = SpectralAccumulator::new(self.config.block_len(), SPECTRUM_BINS)?;
        let load = accumulator.accumulate(source, self.config.prep_seconds, progress)?;
        Ok((gain, load))
    }

    /// Acquire a sky spectrum at the calibrated gain and convert it to
    /// relative intensity against the stored load.
    ///
    /// Fails with `NotCalibrated` before any successful calibration and with
    /// `InvalidInput` on blank labels or a zero duration, in that order.
    /// Acquisition failures close the source and leave state unchanged.
    pub fn run_observation<F>(
        &mut self,
        factory: &mut dyn SourceFactory,
        observation_no: &str,
        source_name: &str,
        duration_seconds: usize,
        progress: F,
    ) -> ObserverResult<ObservationRecord>
    where
        F: FnMut(usize, usize),
    {
        let Some(load) = self.load_spectrum.as_ref() else {
            return Err(ObserverError::NotCalibrated(
                "Run a load calibration before observing".to_string(),
            ));
        };

        let observation_no = observation_no.trim();
        let source_name = source_name.trim();
        if observation_no.is_empty() || source_name.is_empty() {
            return Err(ObserverError::InvalidInput(
                "Observation number and source name are required".to_string(),
            ));
        }
        if duration_seconds < 1 {
            return Err(ObserverError::InvalidInput(
                "Duration must be a positive number of seconds".to_string(),
            ));
        }

        let mut source = factory.open(true)?;
        let outcome = self.observe_on(source.as_mut(), duration_seconds, progress);
        let simulated = source.is_synthetic();
        source.close();

        let raw_sky = outcome?;
        let db = relative_db(&raw_sky, load);
        log::info!(
            "Observation {observation_no} ({source_name}) complete: {duration_seconds} s at {} dB",
            self.active_gain.as_db()
        );

        Ok(ObservationRecord {
            observation_no: observation_no.to_string(),
            source_name: source_name.to_string(),
            observed_at: Utc::now(),
            frequency_mhz: self.config.frequency_axis_mhz(),
            raw_sky,
            raw_load: load.clone(),
            relative_db: db,
            gain: self.active_gain,
            simulated,
        })
    }

    fn observe_on<F>(
        &self,
        source: &mut dyn SampleSource,
        duration_seconds: usize,
        progress: F,
    ) -> ObserverResult<PowerSpectrum>
    where
        F: FnMut(usize, usize),
    {
        source.set_sample_rate(self.config.sample_rate)?;
        source.set_center_freq(self.config.center_freq)?;
        source.set_gain(self.active_gain)?;

        let accumulator = SpectralAccumulator::new(self.config.block_len(), SPECTRUM_BINS)?;
        accumulator.accumulate(source, duration_seconds, progress)
    }
}
