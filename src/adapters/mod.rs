//! Adapters (implementations of ports)
//!
//! Hardware adapters belong to the host application; the crate ships only
//! the synthetic generator used for simulation mode and tests.

pub mod synthetic;

pub use synthetic::*;
