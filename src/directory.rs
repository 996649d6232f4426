//! The provider directory: every registered provider and the capability
//! set each one claims.
//!
//! Discovery is static: each provider registers its declared capability
//! table at directory build time, and the directory is read-only for the
//! remainder of the process. Provider settings are not touched here;
//! configuration resolves lazily at first invocation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::capability::CapabilityKey;
use crate::error::ResolveError;
use crate::provider::Provider;

#[derive(Debug, Default)]
pub struct ProviderDirectory {
    providers: BTreeMap<String, Arc<Provider>>,
}

impl ProviderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a set of providers in one go.
    pub fn build(providers: impl IntoIterator<Item = Provider>) -> Self {
        let mut directory = Self::new();
        for provider in providers {
            directory.register(provider);
        }
        directory
    }

    pub fn register(&mut self, provider: Provider) -> &mut Self {
        tracing::debug!(
            provider = %provider.name(),
            capabilities = provider.capabilities().len(),
            "registered provider"
        );
        self.providers
            .insert(provider.name().to_string(), Arc::new(provider));
        self
    }

    pub fn get(&self, name: &str) -> Result<&Arc<Provider>, ResolveError> {
        self.providers
            .get(name)
            .ok_or_else(|| ResolveError::UnknownProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted.
    pub fn list_providers(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Every capability key claimed by at least one provider,
    /// deduplicated across providers.
    pub fn list_capabilities(&self) -> BTreeSet<CapabilityKey> {
        self.providers
            .values()
            .flat_map(|provider| provider.capabilities().iter().cloned())
            .collect()
    }

    /// The capability set one provider claims.
    pub fn capabilities_of(&self, name: &str) -> Result<&BTreeSet<CapabilityKey>, ResolveError> {
        Ok(self.get(name)?.capabilities())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub(crate) fn providers(&self) -> impl Iterator<Item = &Arc<Provider>> {
        self.providers.values()
    }
}
