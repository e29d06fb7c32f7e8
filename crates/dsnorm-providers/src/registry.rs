//! Named unit constructors and engine assembly from configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use dsnorm_core::{DefaultUnit, Engine, EngineConfig, PassthroughUnit, UnitRef};
use dsnorm_model::{NormalizationError, Result};
use dsnorm_vocab::VocabularyResolver;
use tracing::debug;

use crate::{acdd, amsr2, defaults, sentinel1, url};

/// Builds a unit around the shared resolver.
pub type UnitFactory = fn(Arc<VocabularyResolver>) -> UnitRef;

/// Dispatch order used when the configuration names no units.
pub const DEFAULT_UNITS: &[&str] = &[sentinel1::NAME, amsr2::NAME, acdd::NAME, url::NAME];

/// Registry of unit constructors keyed by unit name.
#[derive(Clone)]
pub struct UnitRegistry {
    factories: BTreeMap<&'static str, (UnitFactory, &'static str)>,
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("units", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl UnitRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with every unit shipped in this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(sentinel1::NAME, "Sentinel-1 SAFE product names", |resolver| {
            Arc::new(sentinel1::unit(resolver))
        });
        registry.register(amsr2::NAME, "ASI AMSR2 sea ice concentration", |resolver| {
            Arc::new(amsr2::unit(resolver))
        });
        registry.register(acdd::NAME, "ACDD/CF global attributes", |resolver| {
            Arc::new(acdd::unit(resolver))
        });
        registry.register(url::NAME, "Entry id from the dataset URL", |_| Arc::new(url::unit()));
        registry.register(
            DefaultUnit::NAME,
            "Fallback values for unresolved fields",
            |resolver| Arc::new(defaults::unit(resolver)),
        );
        registry.register(
            PassthroughUnit::NAME,
            "Reads back normalized records",
            |_| Arc::new(PassthroughUnit::new()),
        );
        registry
    }

    /// Adds or replaces a constructor.
    pub fn register(&mut self, name: &'static str, description: &'static str, factory: UnitFactory) {
        self.factories.insert(name, (factory, description));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Registered names with their one-line descriptions.
    pub fn describe(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.factories
            .iter()
            .map(|(name, (_, description))| (*name, *description))
    }

    /// Constructs the unit registered under `name`.
    pub fn construct(&self, name: &str, resolver: &Arc<VocabularyResolver>) -> Result<UnitRef> {
        let (factory, _) = self.factories.get(name.trim()).ok_or_else(|| {
            NormalizationError::invalid_chain(format!(
                "unknown unit '{name}', expected one of: {}",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        Ok(factory(resolver.clone()))
    }

    /// Builds the engine described by `config`.
    ///
    /// An empty unit list selects [`DEFAULT_UNITS`].
    pub fn build_engine(&self, config: &EngineConfig, resolver: Arc<VocabularyResolver>) -> Result<Engine> {
        let names: Vec<&str> = if config.units.is_empty() {
            DEFAULT_UNITS.to_vec()
        } else {
            config.units.iter().map(String::as_str).collect()
        };
        debug!(units = ?names, terminal = %config.default_unit, "assembling units");
        let units = names
            .iter()
            .map(|name| self.construct(name, &resolver))
            .collect::<Result<Vec<_>>>()?;
        let terminal = self.construct(&config.default_unit, &resolver)?;
        Engine::from_units(config, units, terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_core::DispatchMode;
    use dsnorm_vocab::VocabularyCatalog;

    fn resolver() -> Arc<VocabularyResolver> {
        let catalog = VocabularyCatalog::builtin().unwrap();
        Arc::new(VocabularyResolver::new(Arc::new(catalog)))
    }

    #[test]
    fn builtin_names() {
        let names: Vec<_> = UnitRegistry::builtin().names().collect();
        assert_eq!(
            names,
            vec!["acdd", "amsr2_asi", "default", "passthrough", "sentinel1_safe", "url"]
        );
    }

    #[test]
    fn empty_unit_list_uses_the_builtin_order() {
        let engine = UnitRegistry::builtin()
            .build_engine(&EngineConfig::default(), resolver())
            .unwrap();
        assert_eq!(
            engine.unit_names(),
            vec!["sentinel1_safe", "amsr2_asi", "acdd", "url", "default"]
        );
    }

    #[test]
    fn unknown_units_are_rejected() {
        let config = EngineConfig::default().with_units(["acdd", "landsat"]);
        let err = UnitRegistry::builtin().build_engine(&config, resolver()).unwrap_err();
        assert!(err.to_string().contains("landsat"), "{err}");
    }

    #[test]
    fn classify_needs_a_catch_all_terminal() {
        let config = EngineConfig::default()
            .with_mode(DispatchMode::Classify)
            .with_default_unit("url");
        assert!(UnitRegistry::builtin().build_engine(&config, resolver()).is_err());
    }
}
