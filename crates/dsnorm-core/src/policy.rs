//! Chain policy options.

use std::collections::BTreeSet;

use dsnorm_model::FieldName;
use serde::{Deserialize, Serialize};

/// What a chain does when a unit recognizes the input but fails on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Leave the field unresolved and let later units try.
    #[default]
    SkipField,
    /// Fail the whole record.
    AbortRecord,
}

/// Merge policy of a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainPolicy {
    pub on_malformed: MalformedPolicy,
    /// Fields the default unit must be able to determine.
    /// `None` makes every field mandatory.
    pub mandatory: Option<BTreeSet<FieldName>>,
}

impl ChainPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn with_mandatory(mut self, fields: impl IntoIterator<Item = FieldName>) -> Self {
        self.mandatory = Some(fields.into_iter().collect());
        self
    }

    pub fn is_mandatory(&self, field: FieldName) -> bool {
        self.mandatory
            .as_ref()
            .is_none_or(|fields| fields.contains(&field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_mandatory_by_default() {
        let policy = ChainPolicy::default();
        assert_eq!(policy.on_malformed, MalformedPolicy::SkipField);
        assert!(FieldName::ALL.into_iter().all(|field| policy.is_mandatory(field)));
    }

    #[test]
    fn explicit_mandatory_list() {
        let policy = ChainPolicy::new().with_mandatory([FieldName::EntryId]);
        assert!(policy.is_mandatory(FieldName::EntryId));
        assert!(!policy.is_mandatory(FieldName::Summary));
    }

    #[test]
    fn deserializes_from_toml() {
        let policy: ChainPolicy =
            toml::from_str("on_malformed = \"abort_record\"\nmandatory = [\"entry_id\", \"platform\"]")
                .unwrap();
        assert_eq!(policy.on_malformed, MalformedPolicy::AbortRecord);
        assert!(policy.is_mandatory(FieldName::Platform));
        assert!(!policy.is_mandatory(FieldName::Instrument));
    }
}
