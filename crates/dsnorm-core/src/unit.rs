//! Normalizer unit trait and getter tables.
//!
//! A normalizer unit understands one provider convention. It declares the
//! fields it can produce in an explicit [`GetterTable`]; a field absent from
//! the table is "not supported" by the unit.
//!
//! # Architecture
//!
//! - [`NormalizerUnit`] is the contract the engine dispatches on.
//! - [`GetterTable`] maps each supported [`FieldName`] to a getter closure.
//! - [`TableUnit`] is the general-purpose unit: a name, an applicability
//!   predicate and a getter table.
//! - [`extract_field`] is the single place where getter failures are turned
//!   into [`NormalizationError`]s.
//!
//! # Example
//!
//! ```
//! use dsnorm_core::{GetterTable, NormalizerUnit, TableUnit};
//! use dsnorm_model::{FieldName, FieldValue, RawMetadata};
//!
//! let unit = TableUnit::new(
//!     "titled",
//!     GetterTable::new().with(FieldName::EntryTitle, |raw: &RawMetadata| {
//!         Ok(raw.lookup_str(&["title"]).map(FieldValue::from))
//!     }),
//! )
//! .with_predicate(|raw: &RawMetadata| raw.contains_key("title"));
//! assert!(unit.getters().supports(FieldName::EntryTitle));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dsnorm_model::{
    ExtractError, FieldName, FieldValue, NormalizationError, NormalizedRecord, RawMetadata, Result,
};
use tracing::debug;

/// Reads one field from raw metadata.
///
/// `Ok(None)` means the unit recognized nothing to contribute for the field.
pub type Getter =
    Arc<dyn Fn(&RawMetadata) -> std::result::Result<Option<FieldValue>, ExtractError> + Send + Sync>;

/// Applicability predicate of a unit.
pub type Predicate = Arc<dyn Fn(&RawMetadata) -> bool + Send + Sync>;

/// Explicit field-to-getter mapping of a unit.
#[derive(Clone, Default)]
pub struct GetterTable {
    getters: BTreeMap<FieldName, Getter>,
}

impl GetterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a getter, replacing any previous one for the field.
    pub fn insert<F>(&mut self, field: FieldName, getter: F)
    where
        F: Fn(&RawMetadata) -> std::result::Result<Option<FieldValue>, ExtractError>
            + Send
            + Sync
            + 'static,
    {
        self.getters.insert(field, Arc::new(getter));
    }

    pub fn with<F>(mut self, field: FieldName, getter: F) -> Self
    where
        F: Fn(&RawMetadata) -> std::result::Result<Option<FieldValue>, ExtractError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(field, getter);
        self
    }

    pub fn get(&self, field: FieldName) -> Option<&Getter> {
        self.getters.get(&field)
    }

    pub fn supports(&self, field: FieldName) -> bool {
        self.getters.contains_key(&field)
    }

    /// Supported fields in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.getters.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }
}

impl fmt::Debug for GetterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.getters.keys()).finish()
    }
}

/// A provider-convention normalizer.
///
/// Units are constructed once and shared; they hold no per-call state.
pub trait NormalizerUnit: Send + Sync {
    /// Unique name of the unit within an engine.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        "Normalizer unit"
    }

    /// Returns true when the unit recognizes the raw metadata.
    fn applies(&self, raw: &RawMetadata) -> bool;

    /// Returns true when [`applies`](Self::applies) holds for every input.
    fn is_catch_all(&self) -> bool {
        false
    }

    fn getters(&self) -> &GetterTable;

    /// Produces a whole record on its own, used in classification mode.
    ///
    /// Unsupported fields stay null; any other failure is returned.
    fn normalize(&self, raw: &RawMetadata, fields: &[FieldName]) -> Result<NormalizedRecord> {
        let mut record = NormalizedRecord::with_fields(fields.iter().copied());
        for &field in fields {
            let value = match extract_field(self, field, raw) {
                Ok(value) => value,
                Err(NormalizationError::FieldUnsupported { .. }) => {
                    debug!(unit = self.name(), %field, "field not supported");
                    continue;
                }
                Err(error) => return Err(error),
            };
            match value {
                Some(value) if field.is_cumulative() => record.push_parameter(value),
                Some(value) => {
                    record.try_set(field, value);
                }
                None => {}
            }
        }
        Ok(record)
    }
}

/// Runs `unit`'s getter for `field`, converting failures uniformly.
///
/// - no getter: [`NormalizationError::FieldUnsupported`]
/// - vocabulary service down: [`NormalizationError::Vocabulary`]
/// - anything else: [`NormalizationError::MalformedInput`]
pub fn extract_field<U>(unit: &U, field: FieldName, raw: &RawMetadata) -> Result<Option<FieldValue>>
where
    U: NormalizerUnit + ?Sized,
{
    let Some(getter) = unit.getters().get(field) else {
        return Err(NormalizationError::FieldUnsupported {
            unit: unit.name().to_string(),
            field,
        });
    };
    getter(raw).map_err(|error| match error {
        ExtractError::Unavailable { reason } => NormalizationError::Vocabulary { field, reason },
        other => NormalizationError::MalformedInput {
            unit: unit.name().to_string(),
            field,
            reason: other.to_string(),
        },
    })
}

/// Unit assembled from a predicate and a getter table.
#[derive(Clone)]
pub struct TableUnit {
    name: String,
    description: String,
    predicate: Option<Predicate>,
    getters: GetterTable,
}

impl TableUnit {
    /// Unit that applies to every input until a predicate is set.
    pub fn new(name: impl Into<String>, getters: GetterTable) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            predicate: None,
            getters,
        }
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RawMetadata) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for TableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableUnit")
            .field("name", &self.name)
            .field("catch_all", &self.predicate.is_none())
            .field("getters", &self.getters)
            .finish()
    }
}

impl NormalizerUnit for TableUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        if self.description.is_empty() {
            "Table-driven normalizer unit"
        } else {
            &self.description
        }
    }

    fn applies(&self, raw: &RawMetadata) -> bool {
        self.predicate.as_ref().is_none_or(|predicate| predicate(raw))
    }

    fn is_catch_all(&self) -> bool {
        self.predicate.is_none()
    }

    fn getters(&self) -> &GetterTable {
        &self.getters
    }
}
