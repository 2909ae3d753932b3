//! Registry configuration, read from a TOML file such as `lexis.toml`:
//!
//! ```toml
//! [adapters]
//! vocabularies = "vocabulary"
//! resource_classes = "resource_class"
//! properties = "property"
//!
//! [search]
//! per_page = 25
//! max_per_page = 200
//! ```

use crate::{ApiError, ApiResult, Plugin, TermAdapter, VocabularyAdapter};
use lexis_model::TermKind;
use lexis_query::PageSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Built-in adapter implementations a config entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    Vocabulary,
    ResourceClass,
    Property,
}

impl AdapterKind {
    /// Instantiates the adapter as a registrable plugin.
    pub fn create(&self) -> Arc<dyn Plugin> {
        match self {
            AdapterKind::Vocabulary => Arc::new(VocabularyAdapter::new()),
            AdapterKind::ResourceClass => Arc::new(TermAdapter::new(TermKind::ResourceClass)),
            AdapterKind::Property => Arc::new(TermAdapter::new(TermKind::Property)),
        }
    }
}

/// Adapter registrations and search defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Resource name → adapter implementation.
    #[serde(default = "default_adapters")]
    pub adapters: BTreeMap<String, AdapterKind>,
    #[serde(default)]
    pub search: PageSettings,
}

fn default_adapters() -> BTreeMap<String, AdapterKind> {
    BTreeMap::from([
        ("vocabularies".to_string(), AdapterKind::Vocabulary),
        ("resource_classes".to_string(), AdapterKind::ResourceClass),
        ("properties".to_string(), AdapterKind::Property),
    ])
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            adapters: default_adapters(),
            search: PageSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `path`.
    ///
    /// A missing or unparsable file is a fatal configuration error.
    pub fn load_from(path: &Path) -> ApiResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), adapters = config.adapters.len(), "Loaded API config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> ApiResult<Self> {
        toml::from_str(contents).map_err(|e| ApiError::Config(format!("invalid config: {e}")))
    }
}
