//! Dispatch and merge engine for dataset metadata normalization.
//!
//! Provider conventions are handled by [`NormalizerUnit`]s. An [`Engine`]
//! combines them in one of two modes:
//!
//! - [`Chain`]: every unit contributes, first non-null value per field wins,
//!   `dataset_parameters` accumulates, a default unit fills the rest.
//! - [`Classifier`]: the first unit that applies produces the whole record.

pub mod chain;
pub mod classify;
pub mod defaults;
pub mod engine;
pub mod ordered;
pub mod policy;
pub mod unit;

pub use chain::{Chain, ChainBuilder};
pub use classify::{Classifier, ClassifierBuilder};
pub use defaults::{DefaultUnit, PassthroughUnit};
pub use engine::{ClassifyOptions, DispatchMode, Engine, EngineConfig};
pub use ordered::{OrderedUnits, UnitRef};
pub use policy::{ChainPolicy, MalformedPolicy};
pub use unit::{Getter, GetterTable, NormalizerUnit, Predicate, TableUnit, extract_field};
