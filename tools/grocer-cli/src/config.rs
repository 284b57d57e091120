//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["grocer.toml", ".grocer.toml", "grocer.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base catalog and overlay namespace.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where overrides are persisted.
    #[serde(default)]
    pub store: StoreConfig,

    /// Classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, picking the format from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of seed products.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Overlay namespace; each namespace has its own overrides.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_base_path() -> String {
    "data/products.json".to_string()
}

fn default_namespace() -> String {
    grocer_catalog::overlay::DEFAULT_NAMESPACE.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            namespace: default_namespace(),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per store key.
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

fn default_store_dir() -> String {
    ".grocer/store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

/// Classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Category used when no keyword matches and none was supplied.
    #[serde(default = "default_fallback")]
    pub default_fallback: String,
}

fn default_fallback() -> String {
    "grocery".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_fallback: default_fallback(),
        }
    }
}

/// Generate a default grocer.toml config file.
pub fn generate_default_config() -> String {
    r#"# Grocer catalog configuration

[catalog]
# Seed products, a JSON array. Never modified by the CLI.
base_path = "data/products.json"
# Overrides are kept per namespace.
namespace = "default"

[store]
# One JSON file per key.
dir = ".grocer/store"

[classifier]
# Category for names no keyword recognizes.
default_fallback = "grocery"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = CliConfig::parse("grocer.toml", &generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = CliConfig::parse(
            "grocer.toml",
            "[catalog]\nnamespace = \"staging\"\n",
        )
        .unwrap();
        assert_eq!(config.catalog.namespace, "staging");
        assert_eq!(config.catalog.base_path, "data/products.json");
        assert_eq!(config.store.dir, ".grocer/store");
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            "grocer.json",
            r#"{"classifier": {"default_fallback": "spices-herbs"}}"#,
        )
        .unwrap();
        assert_eq!(config.classifier.default_fallback, "spices-herbs");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocer.toml");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.store.dir = "/var/lib/grocer".to_string();
        config.save(path).unwrap();

        assert_eq!(CliConfig::load(path).unwrap(), config);
    }
}
