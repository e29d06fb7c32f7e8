//! Cumulative chain dispatch.
//!
//! Every unit is visited once, in order. A scalar field keeps the first
//! non-null value any unit produces; `dataset_parameters` collects every
//! unit's contribution. Whatever is still unresolved afterwards is handed to
//! the default unit, which must produce a value (possibly an explicit null)
//! or fail.

use std::fmt;

use dsnorm_model::{
    ExtractError, FieldName, FieldValue, NormalizationError, NormalizedRecord, RawMetadata, Result,
};
use tracing::{debug, trace, warn};

use crate::ordered::{OrderedUnits, UnitRef};
use crate::policy::{ChainPolicy, MalformedPolicy};
use crate::unit::extract_field;

/// Immutable chain of units terminated by a default unit.
#[derive(Clone)]
pub struct Chain {
    units: OrderedUnits,
    default: UnitRef,
    policy: ChainPolicy,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    pub fn policy(&self) -> &ChainPolicy {
        &self.policy
    }

    pub fn default_unit(&self) -> &UnitRef {
        &self.default
    }

    /// Units in visiting order, default unit last.
    pub fn units(&self) -> impl Iterator<Item = &UnitRef> {
        self.units.iter().chain(std::iter::once(&self.default))
    }

    /// Unit names in visiting order, default unit last.
    pub fn unit_names(&self) -> Vec<&str> {
        let mut names = self.units.names();
        names.push(self.default.name());
        names
    }

    /// Builds the record for `fields` from `raw`.
    pub fn normalize(&self, raw: &RawMetadata, fields: &[FieldName]) -> Result<NormalizedRecord> {
        let mut record = NormalizedRecord::with_fields(fields.iter().copied());
        let collect_parameters = fields.iter().any(FieldName::is_cumulative);

        for unit in self.units.iter() {
            if !unit.applies(raw) {
                trace!(unit = unit.name(), "unit does not apply");
                continue;
            }
            for field in record.unresolved() {
                if let Some(value) = self.visit(unit, field, raw)? {
                    record.try_set(field, value);
                    trace!(unit = unit.name(), %field, "field resolved");
                }
            }
            if collect_parameters
                && let Some(value) = self.visit(unit, FieldName::DatasetParameters, raw)?
            {
                record.push_parameter(value);
            }
        }

        for field in record.unresolved() {
            match self.fallback(field, raw) {
                Ok(Some(value)) => {
                    record.try_set(field, value);
                }
                Ok(None) => {
                    debug!(%field, unit = self.default.name(), "default unit resolved field to null");
                }
                Err(error @ NormalizationError::NormalizationFailure { .. }) => {
                    if self.policy.is_mandatory(field) {
                        return Err(error);
                    }
                    warn!(%field, %error, "optional field left unresolved");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(record)
    }

    /// Runs one getter, applying the malformed-input policy.
    fn visit(
        &self,
        unit: &UnitRef,
        field: FieldName,
        raw: &RawMetadata,
    ) -> Result<Option<FieldValue>> {
        match extract_field(unit.as_ref(), field, raw) {
            Ok(value) => Ok(value),
            Err(NormalizationError::FieldUnsupported { .. }) => {
                debug!(unit = unit.name(), %field, "field not supported");
                Ok(None)
            }
            Err(error @ NormalizationError::MalformedInput { .. }) => match self.policy.on_malformed {
                MalformedPolicy::SkipField => {
                    warn!(unit = unit.name(), %field, %error, "malformed input, falling through");
                    Ok(None)
                }
                MalformedPolicy::AbortRecord => Err(error),
            },
            Err(error) => Err(error),
        }
    }

    /// Asks the default unit for a field no other unit resolved.
    fn fallback(
        &self,
        field: FieldName,
        raw: &RawMetadata,
    ) -> Result<Option<FieldValue>> {
        let failure = |reason: String| NormalizationError::NormalizationFailure {
            field,
            reason,
            raw: raw.excerpt(),
        };
        let Some(getter) = self.default.getters().get(field) else {
            return Err(failure(format!(
                "no unit produced a value and '{}' has no fallback",
                self.default.name()
            )));
        };
        getter(raw).map_err(|error| match error {
            ExtractError::Unavailable { reason } => NormalizationError::Vocabulary { field, reason },
            other => failure(other.to_string()),
        })
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("units", &self.unit_names())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Collects the declared ordering of a chain.
#[derive(Default)]
pub struct ChainBuilder {
    units: Vec<UnitRef>,
    default: Option<UnitRef>,
    policy: ChainPolicy,
}

impl ChainBuilder {
    pub fn unit(mut self, unit: UnitRef) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = UnitRef>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn default_unit(mut self, unit: UnitRef) -> Self {
        self.default = Some(unit);
        self
    }

    pub fn policy(mut self, policy: ChainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the ordering: a default unit is required and names must be
    /// unique across the whole chain.
    pub fn build(self) -> Result<Chain> {
        let default = self
            .default
            .ok_or_else(|| NormalizationError::invalid_chain("chain has no default unit"))?;
        let mut all = self.units.clone();
        all.push(default.clone());
        OrderedUnits::new(all)?;
        Ok(Chain {
            units: OrderedUnits::new(self.units)?,
            default,
            policy: self.policy,
        })
    }
}
