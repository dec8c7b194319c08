//! Provider registry for lookup by name.
//!
//! Model strings may carry a provider prefix such as
//! `vertex:gemini-2.0-flash-exp`; without one the registry falls back to the
//! first configured backend.

use crate::provider::{BoxedProvider, ProviderError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for looking up providers by name or alias.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, BoxedProvider>>,
    order: RwLock<Vec<String>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its name and aliases.
    pub fn register(&self, provider: BoxedProvider) {
        let mut providers = self.providers.write();
        let name = provider.name().to_string();

        if !providers.contains_key(&name) {
            self.order.write().push(name.clone());
        }
        providers.insert(name, Arc::clone(&provider));

        for alias in provider.aliases() {
            providers.insert((*alias).to_string(), Arc::clone(&provider));
        }
    }

    /// Get a provider by name or alias.
    pub fn get(&self, name: &str) -> Option<BoxedProvider> {
        self.providers.read().get(name).cloned()
    }

    /// Check if a provider exists.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.read().contains_key(name)
    }

    /// Primary names of registered providers, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.order.read().clone()
    }

    /// The first registered provider.
    pub fn default_provider(&self) -> Option<BoxedProvider> {
        let first = self.order.read().first().cloned()?;
        self.get(&first)
    }

    /// Split a model string into a provider and a bare model name.
    ///
    /// `google:gemini-2.0-flash-exp` picks the named provider. A string
    /// without a known prefix goes to the default provider unchanged, so
    /// resource paths like `projects/p/locations/l/...` pass through.
    pub fn resolve(&self, model: &str) -> Result<(BoxedProvider, String), ProviderError> {
        if let Some((prefix, name)) = model.split_once(':') {
            return match self.get(prefix) {
                Some(provider) => Ok((provider, name.to_string())),
                None => Err(ProviderError::UnknownProvider(prefix.to_string())),
            };
        }

        self.default_provider()
            .map(|provider| (provider, model.to_string()))
            .ok_or_else(|| ProviderError::MissingConfig("no live provider configured".into()))
    }
}
