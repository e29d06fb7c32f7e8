//! Ordered, uniquely named unit list shared by both dispatch modes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use dsnorm_model::{NormalizationError, RawMetadata, Result};

use crate::unit::NormalizerUnit;

/// Shared handle to a unit.
pub type UnitRef = Arc<dyn NormalizerUnit>;

/// Fixed list of units in declaration order.
#[derive(Clone)]
pub struct OrderedUnits {
    units: Vec<UnitRef>,
}

impl OrderedUnits {
    /// Rejects lists in which two units share a name.
    pub fn new(units: Vec<UnitRef>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for unit in &units {
            if !seen.insert(unit.name()) {
                return Err(NormalizationError::invalid_chain(format!(
                    "duplicate unit name '{}'",
                    unit.name()
                )));
            }
        }
        Ok(Self { units })
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitRef> {
        self.units.iter()
    }

    /// First unit, in order, whose predicate accepts `raw`.
    pub fn first_match(&self, raw: &RawMetadata) -> Option<&UnitRef> {
        self.units.iter().find(|unit| unit.applies(raw))
    }

    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name()).collect()
    }

    pub fn last(&self) -> Option<&UnitRef> {
        self.units.last()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Debug for OrderedUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{GetterTable, TableUnit};
    use serde_json::json;

    fn unit(name: &str, key: &'static str) -> UnitRef {
        Arc::new(
            TableUnit::new(name, GetterTable::new())
                .with_predicate(move |raw: &RawMetadata| raw.contains_key(key)),
        )
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = OrderedUnits::new(vec![unit("a", "x"), unit("b", "y"), unit("a", "z")]).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::invalid_chain("duplicate unit name 'a'")
        );
    }

    #[test]
    fn first_match_follows_order() {
        let units = OrderedUnits::new(vec![unit("a", "x"), unit("b", "y"), unit("c", "y")]).unwrap();
        let raw = RawMetadata::from_value(json!({"y": 1})).unwrap();
        assert_eq!(units.first_match(&raw).map(|u| u.name()), Some("b"));
        let raw = RawMetadata::from_value(json!({"q": 1})).unwrap();
        assert!(units.first_match(&raw).is_none());
        assert_eq!(units.names(), vec!["a", "b", "c"]);
    }
}
