//! Engine configuration and the mode-independent entry point.

use dsnorm_model::{FieldName, NormalizedRecord, RawMetadata, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chain::Chain;
use crate::classify::Classifier;
use crate::ordered::UnitRef;
use crate::policy::ChainPolicy;

/// How units are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Visit every unit and merge per field.
    #[default]
    Chain,
    /// Let the first applicable unit produce the whole record.
    Classify,
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chain" => Ok(DispatchMode::Chain),
            "classify" | "classification" => Ok(DispatchMode::Classify),
            _ => Err(format!("Unknown dispatch mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifyOptions {
    /// Refuse to build unless the last unit is a catch-all.
    pub require_catch_all: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            require_catch_all: true,
        }
    }
}

/// Declarative engine setup, typically the `[engine]` table of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub mode: DispatchMode,
    /// Unit names in dispatch order, excluding the terminal unit.
    pub units: Vec<String>,
    /// Name of the terminal unit.
    pub default_unit: String,
    pub chain: ChainPolicy,
    pub classify: ClassifyOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Chain,
            units: Vec::new(),
            default_unit: crate::defaults::DefaultUnit::NAME.to_string(),
            chain: ChainPolicy::default(),
            classify: ClassifyOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units = units.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_unit(mut self, name: impl Into<String>) -> Self {
        self.default_unit = name.into();
        self
    }

    pub fn with_chain_policy(mut self, policy: ChainPolicy) -> Self {
        self.chain = policy;
        self
    }
}

/// Normalization engine in one of the two dispatch modes.
#[derive(Debug, Clone)]
pub enum Engine {
    Chain(Chain),
    Classify(Classifier),
}

impl Engine {
    /// Builds an engine from already constructed units.
    ///
    /// In classification mode the terminal unit closes the candidate list.
    pub fn from_units(config: &EngineConfig, units: Vec<UnitRef>, terminal: UnitRef) -> Result<Self> {
        let engine = match config.mode {
            DispatchMode::Chain => Engine::Chain(
                Chain::builder()
                    .units(units)
                    .default_unit(terminal)
                    .policy(config.chain.clone())
                    .build()?,
            ),
            DispatchMode::Classify => Engine::Classify(
                Classifier::builder()
                    .units(units)
                    .unit(terminal)
                    .require_catch_all(config.classify.require_catch_all)
                    .build()?,
            ),
        };
        info!(mode = ?engine.mode(), units = ?engine.unit_names(), "normalization engine ready");
        Ok(engine)
    }

    pub fn mode(&self) -> DispatchMode {
        match self {
            Engine::Chain(_) => DispatchMode::Chain,
            Engine::Classify(_) => DispatchMode::Classify,
        }
    }

    /// Units in dispatch order, terminal unit last.
    pub fn units(&self) -> Vec<&UnitRef> {
        match self {
            Engine::Chain(chain) => chain.units().collect(),
            Engine::Classify(classifier) => classifier.units().collect(),
        }
    }

    pub fn unit_names(&self) -> Vec<&str> {
        match self {
            Engine::Chain(chain) => chain.unit_names(),
            Engine::Classify(classifier) => classifier.unit_names(),
        }
    }

    pub fn normalize(&self, raw: &RawMetadata, fields: &[FieldName]) -> Result<NormalizedRecord> {
        match self {
            Engine::Chain(chain) => chain.normalize(raw, fields),
            Engine::Classify(classifier) => classifier.normalize(raw, fields),
        }
    }

    /// Normalizes every canonical field.
    pub fn normalize_all(&self, raw: &RawMetadata) -> Result<NormalizedRecord> {
        self.normalize(raw, &FieldName::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
mode = "classify"
units = ["sentinel1_safe", "acdd"]
default_unit = "passthrough"

[classify]
require_catch_all = false
"#,
        )
        .unwrap();
        assert_eq!(config.mode, DispatchMode::Classify);
        assert_eq!(config.units, vec!["sentinel1_safe", "acdd"]);
        assert!(!config.classify.require_catch_all);
        assert_eq!(config.chain, ChainPolicy::default());

        let empty: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(empty, EngineConfig::default());
        assert_eq!(empty.default_unit, "default");

        assert!(toml::from_str::<EngineConfig>("colour = 1").is_err());
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Chain".parse::<DispatchMode>(), Ok(DispatchMode::Chain));
        assert_eq!("classify".parse::<DispatchMode>(), Ok(DispatchMode::Classify));
        assert!("merge".parse::<DispatchMode>().is_err());
    }
}
