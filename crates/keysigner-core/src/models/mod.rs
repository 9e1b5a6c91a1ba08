//! Domain models for keysigner.

pub mod params;
pub mod signing;

pub use params::*;
pub use signing::*;
