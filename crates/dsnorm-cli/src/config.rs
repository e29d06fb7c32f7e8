//! `dsnorm.toml` loading and resolver assembly.
//!
//! ```toml
//! [engine]
//! mode = "chain"
//! units = ["sentinel1_safe", "acdd", "url"]
//!
//! [engine.chain]
//! on_malformed = "abort_record"
//! mandatory = ["entry_id", "time_coverage_start"]
//!
//! [vocabulary]
//! builtin = true
//!
//! [[vocabulary.files]]
//! category = "platform"
//! path = "vocab/platforms.csv"
//! sha256 = "9f2c..."
//!
//! [[vocabulary.aliases]]
//! category = "instrument"
//! alias = "SAR2000"
//! canonical = "C-SAR"
//! ```
//!
//! Relative vocabulary paths are resolved against the directory of the
//! config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dsnorm_core::EngineConfig;
use dsnorm_model::VocabularyCategory;
use dsnorm_vocab::{AliasTable, VocabularyCatalog, VocabularyError, VocabularyResolver};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dsnorm.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: EngineConfig,
    pub vocabulary: VocabularyConfig,
    /// Directory relative vocabulary paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Load the vocabulary snapshot compiled into the binary.
    pub builtin: bool,
    pub files: Vec<VocabularyFile>,
    pub aliases: Vec<AliasEntry>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            files: Vec::new(),
            aliases: Vec::new(),
        }
    }
}

/// A GCMD-style CSV export added to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyFile {
    pub category: VocabularyCategory,
    pub path: PathBuf,
    /// Expected SHA-256 of the file, hex encoded.
    #[serde(default)]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliasEntry {
    pub category: VocabularyCategory,
    pub alias: String,
    pub canonical: String,
}

impl Config {
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content, path)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path`, or `dsnorm.toml` from the working directory, or defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load(fallback);
        }
        debug!("no configuration file, using defaults");
        Ok(Self::default())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Catalog with the builtin snapshot (when enabled) and every listed file.
    pub fn build_catalog(&self) -> Result<VocabularyCatalog> {
        let mut catalog = if self.vocabulary.builtin {
            VocabularyCatalog::builtin()?
        } else {
            VocabularyCatalog::new()
        };
        for file in &self.vocabulary.files {
            let path = self.resolve_path(&file.path);
            let bytes = fs::read(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            if let Some(expected) = &file.sha256 {
                verify_sha256(&path, &bytes, expected)?;
            }
            let loaded = catalog.load_csv(file.category, bytes.as_slice(), &path.display().to_string())?;
            info!(path = %path.display(), category = %file.category, terms = loaded, "loaded vocabulary file");
        }
        Ok(catalog)
    }

    /// Builtin aliases extended with the configured ones.
    pub fn alias_table(&self) -> AliasTable {
        let mut aliases = AliasTable::builtin();
        for entry in &self.vocabulary.aliases {
            aliases.insert(entry.category, &entry.alias, &entry.canonical);
        }
        aliases
    }

    pub fn build_resolver(&self) -> Result<Arc<VocabularyResolver>> {
        let catalog = self.build_catalog()?;
        Ok(Arc::new(
            VocabularyResolver::new(Arc::new(catalog)).with_aliases(self.alias_table()),
        ))
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn verify_sha256(path: &Path, bytes: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(bytes);
    let expected = expected.trim().to_lowercase();
    if actual != expected {
        return Err(ConfigError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    debug!(path = %path.display(), "checksum verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_core::{DispatchMode, MalformedPolicy};
    use dsnorm_model::FieldName;

    #[test]
    fn empty_config_is_the_default() {
        let config = Config::from_toml_str("", Path::new("dsnorm.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.vocabulary.builtin);
    }

    #[test]
    fn parses_engine_and_vocabulary_sections() {
        let config = Config::from_toml_str(
            r#"
[engine]
mode = "classify"
units = ["acdd"]
default_unit = "passthrough"

[engine.chain]
on_malformed = "abort_record"
mandatory = ["entry_id"]

[vocabulary]
builtin = false

[[vocabulary.files]]
category = "platform"
path = "platforms.csv"

[[vocabulary.aliases]]
category = "instrument"
alias = "SAR2000"
canonical = "C-SAR"
"#,
            Path::new("dsnorm.toml"),
        )
        .unwrap();
        assert_eq!(config.engine.mode, DispatchMode::Classify);
        assert_eq!(config.engine.chain.on_malformed, MalformedPolicy::AbortRecord);
        assert!(config.engine.chain.is_mandatory(FieldName::EntryId));
        assert!(!config.engine.chain.is_mandatory(FieldName::Summary));
        assert_eq!(config.vocabulary.files[0].category, VocabularyCategory::Platform);
        assert_eq!(
            config
                .alias_table()
                .translate(VocabularyCategory::Instrument, "sar2000"),
            Some("C-SAR")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[engine]\nmodes = \"chain\"\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(verify_sha256(Path::new("x"), b"abc", "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD").is_ok());
        assert!(matches!(
            verify_sha256(Path::new("x"), b"abd", "ba7816bf"),
            Err(ConfigError::ChecksumMismatch { .. })
        ));
    }
}
