//! 21cm Hydrogen Line Observation Pipeline
//!
//! Acquires complex baseband samples from a software-defined radio, turns
//! them into calibrated power spectra, and hands structured results back to
//! the host application for persistence and plotting. The host UI, device
//! bindings, and file export all live outside this crate.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, config, and errors; no I/O dependencies
//! - `ports/` - Trait definitions for sample sources
//! - `dsp/` - Gain search, spectrum accumulation, calibration math
//! - `adapters/` - Synthetic sample source (simulation mode and tests)
//! - `session` - Observation session state machine
//!
//! ## Typical flow
//!
//! ```no_run
//! use hline::adapters::SyntheticSourceFactory;
//! use hline::domain::ObserverConfig;
//! use hline::session::ObservationSession;
//!
//! # fn main() -> hline::domain::ObserverResult<()> {
//! let mut factory = SyntheticSourceFactory::new();
//! let mut session = ObservationSession::new(ObserverConfig::default())?;
//!
//! session.run_calibration(&mut factory, |_, _| {})?;
//! let record = session.run_observation(&mut factory, "001", "MilkyWay", 30, |_, _| {})?;
//! println!("{} bins at gain {} dB", record.relative_db.len(), record.gain.as_db());
//! # Ok(())
//! # }
//! ```

// Core domain (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod ports;

// Adapters (sample generation)
pub mod adapters;

// Orchestration
pub mod session;
