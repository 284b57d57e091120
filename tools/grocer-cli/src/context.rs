//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use grocer_catalog::prelude::*;
use grocer_store::FileStore;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the config was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => {
                            tracing::warn!(path = %config_path.display(), error = %e, "skipping unreadable config")
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Classifier configured with the default fallback category.
    pub fn classifier(&self) -> Result<Classifier> {
        let fallback = &self.config.classifier.default_fallback;
        let category: CategoryTag = fallback
            .parse()
            .with_context(|| format!("classifier.default_fallback '{}' is not a category", fallback))?;
        Ok(Classifier::new().with_default_category(category))
    }

    /// Load the base catalog. A missing file yields an empty catalog.
    pub fn base_catalog(&self, classifier: &Classifier) -> Result<BaseCatalog> {
        let path = self.resolve_path(&self.config.catalog.base_path);
        if !path.exists() {
            self.output.warn(&format!(
                "Base catalog not found at {}, starting from an empty catalog",
                path.display()
            ));
            return Ok(BaseCatalog::default());
        }
        Ok(BaseCatalog::from_json_file(&path, classifier)?)
    }

    /// Open the catalog store described by the config.
    pub fn open_catalog(&self) -> Result<CatalogStore<FileStore>> {
        let classifier = self.classifier()?;
        let base = self.base_catalog(&classifier)?;

        let dir = self.resolve_path(&self.config.store.dir);
        let backend = FileStore::open(&dir)
            .with_context(|| format!("Failed to open store at {}", dir.display()))?;

        Ok(
            CatalogStore::with_namespace(base, backend, &self.config.catalog.namespace)
                .with_classifier(classifier),
        )
    }
}
