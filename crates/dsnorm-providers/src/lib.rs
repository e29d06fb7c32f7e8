//! Provider normalizer units.
//!
//! Each module handles one naming or attribute convention and exposes a
//! `NAME` and a constructor. [`UnitRegistry`] maps names from configuration
//! to constructors and assembles the engine.

pub mod acdd;
pub mod amsr2;
pub mod common;
pub mod defaults;
pub mod registry;
pub mod sentinel1;
pub mod url;

pub use registry::{DEFAULT_UNITS, UnitFactory, UnitRegistry};
