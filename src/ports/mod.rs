//! Port traits (interfaces)
//!
//! These traits define the boundary between the pipeline and whatever
//! produces baseband samples. Adapters implement them to connect to real
//! hardware or to a synthetic generator.

pub mod source;

pub use source::*;
