//! The adapter registry.
//!
//! Built once at startup through [`AdapterManagerBuilder`]; afterwards it is
//! read-only and can be shared across threads behind an `Arc` without locking.

use crate::{ApiConfig, ApiError, ApiResult, EntityAdapter, Plugin};
use lexis_query::PageSettings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Resource name → adapter.
pub struct AdapterManager {
    adapters: HashMap<String, Arc<dyn EntityAdapter>>,
    page_settings: PageSettings,
}

impl AdapterManager {
    pub fn builder() -> AdapterManagerBuilder {
        AdapterManagerBuilder::default()
    }

    /// Builds the registry described by `config`.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = Self::builder().page_settings(config.search);
        for (resource, kind) in &config.adapters {
            builder.register_as(resource, kind.create())?;
        }
        builder.build()
    }

    /// Accepts `candidate` only if it provides the adapter capability set.
    pub fn validate_plugin(candidate: Arc<dyn Plugin>) -> ApiResult<Arc<dyn EntityAdapter>> {
        let name = candidate.plugin_name().to_string();
        candidate.into_adapter().ok_or_else(|| {
            ApiError::InvalidAdapter(format!("'{name}' does not implement the entity adapter interface"))
        })
    }

    pub fn get(&self, resource: &str) -> ApiResult<Arc<dyn EntityAdapter>> {
        self.adapters
            .get(resource)
            .cloned()
            .ok_or_else(|| ApiError::AdapterNotFound(resource.to_string()))
    }

    pub fn has(&self, resource: &str) -> bool {
        self.adapters.contains_key(resource)
    }

    /// Registered resource names, sorted.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn page_settings(&self) -> &PageSettings {
        &self.page_settings
    }
}

impl std::fmt::Debug for AdapterManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterManager")
            .field("resources", &self.resource_names())
            .field("page_settings", &self.page_settings)
            .finish()
    }
}

#[derive(Default)]
pub struct AdapterManagerBuilder {
    adapters: HashMap<String, Arc<dyn EntityAdapter>>,
    page_settings: PageSettings,
}

impl std::fmt::Debug for AdapterManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut resources: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        resources.sort_unstable();
        f.debug_struct("AdapterManagerBuilder")
            .field("resources", &resources)
            .field("page_settings", &self.page_settings)
            .finish()
    }
}

impl AdapterManagerBuilder {
    pub fn page_settings(mut self, settings: PageSettings) -> Self {
        self.page_settings = settings;
        self
    }

    /// Registers a plugin under its own resource name.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> ApiResult<&mut Self> {
        let adapter = AdapterManager::validate_plugin(plugin)?;
        let resource = adapter.resource_name();
        self.insert(resource, adapter)
    }

    /// Registers a plugin under `resource`, which must match the adapter's
    /// own resource name.
    pub fn register_as(&mut self, resource: &str, plugin: Arc<dyn Plugin>) -> ApiResult<&mut Self> {
        let adapter = AdapterManager::validate_plugin(plugin)?;
        if adapter.resource_name() != resource {
            return Err(ApiError::Config(format!(
                "adapter for '{}' registered under '{resource}'",
                adapter.resource_name()
            )));
        }
        self.insert(resource, adapter)
    }

    fn insert(&mut self, resource: &str, adapter: Arc<dyn EntityAdapter>) -> ApiResult<&mut Self> {
        if self.adapters.contains_key(resource) {
            return Err(ApiError::Config(format!("adapter '{resource}' registered twice")));
        }
        debug!(resource, entity = %adapter.entity_kind(), "Adapter registered");
        self.adapters.insert(resource.to_string(), adapter);
        Ok(self)
    }

    pub fn build(self) -> ApiResult<AdapterManager> {
        if self.adapters.is_empty() {
            return Err(ApiError::Config("no adapters configured".into()));
        }
        info!(adapters = self.adapters.len(), "Adapter registry ready");
        Ok(AdapterManager {
            adapters: self.adapters,
            page_settings: self.page_settings,
        })
    }
}
