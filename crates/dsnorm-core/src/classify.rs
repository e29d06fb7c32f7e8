//! Single-winner classification dispatch.

use std::fmt;

use dsnorm_model::{FieldName, NormalizationError, NormalizedRecord, RawMetadata, Result};
use tracing::debug;

use crate::ordered::{OrderedUnits, UnitRef};

/// Picks the first applicable unit and returns its record unchanged.
#[derive(Clone)]
pub struct Classifier {
    units: OrderedUnits,
}

impl Classifier {
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::default()
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitRef> {
        self.units.iter()
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units.names()
    }

    /// The unit that would handle `raw`.
    pub fn select(&self, raw: &RawMetadata) -> Option<&UnitRef> {
        self.units.first_match(raw)
    }

    pub fn normalize(&self, raw: &RawMetadata, fields: &[FieldName]) -> Result<NormalizedRecord> {
        let unit = self
            .select(raw)
            .ok_or_else(|| NormalizationError::NoApplicableNormalizer { raw: raw.excerpt() })?;
        debug!(unit = unit.name(), "unit selected");
        unit.normalize(raw, fields)
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("units", &self.units)
            .finish()
    }
}

#[derive(Default)]
pub struct ClassifierBuilder {
    units: Vec<UnitRef>,
    require_catch_all: bool,
}

impl ClassifierBuilder {
    pub fn unit(mut self, unit: UnitRef) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = UnitRef>) -> Self {
        self.units.extend(units);
        self
    }

    /// Refuse to build unless the last unit accepts every input.
    pub fn require_catch_all(mut self, required: bool) -> Self {
        self.require_catch_all = required;
        self
    }

    pub fn build(self) -> Result<Classifier> {
        let units = OrderedUnits::new(self.units)?;
        if self.require_catch_all && !units.last().is_some_and(|unit| unit.is_catch_all()) {
            return Err(NormalizationError::invalid_chain(
                "classification requires a catch-all unit in last position",
            ));
        }
        Ok(Classifier { units })
    }
}
