//! Providers and their registration tables.
//!
//! A provider is a named entity owning a settings bundle and a table
//! mapping derived operation names to bindings. Registration is explicit
//! and static: a provider module declares its capability set when it is
//! built, and the table never changes afterwards — the resolver only ever
//! looks bindings up, it never reflects on anything.

mod settings;

pub use settings::{ProviderSettings, SettingsSource};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::CapabilityKey;
use crate::error::InvokeError;
use crate::schema::SchemaRef;
use crate::types::{Args, OperationOutcome};

/// Per-invocation context handed to an operation: the provider it runs
/// under and that provider's resolved settings.
pub struct CallContext<'a> {
    pub provider: &'a str,
    pub settings: &'a ProviderSettings,
}

impl CallContext<'_> {
    /// Fetch a required setting, failing with a configuration error.
    pub fn require_setting(&self, key: &str) -> Result<&str, InvokeError> {
        self.settings
            .get(key)
            .ok_or_else(|| InvokeError::ProviderConfiguration {
                provider: self.provider.to_string(),
                message: format!("missing setting `{key}`"),
            })
    }

    /// Fetch a required credential, wrapped so it stays out of logs.
    pub fn secret_setting(&self, key: &str) -> Result<SecretString, InvokeError> {
        let value = self.require_setting(key)?;
        Ok(SecretString::from(value.to_owned()))
    }
}

/// A callable capability implementation. Owned by exactly one provider,
/// immutable after registration.
///
/// `name()` must equal the derived operation name of the capability the
/// operation is registered under; the resolver enforces this. `returns()`
/// declares the standardized schema of the envelope the operation
/// produces — `None` for no-return phases (acknowledging actions and
/// `launch_job`).
#[async_trait]
pub trait Operation: Send + Sync {
    fn name(&self) -> &str;

    fn returns(&self) -> Option<SchemaRef>;

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError>;
}

/// An entry in a provider's registration table.
#[derive(Clone)]
pub enum Binding {
    /// An invocable operation.
    Operation(Arc<dyn Operation>),
    /// A non-invocable registration parked under an operation name.
    /// Resolving it is an `OperationNotCallable` consistency fault.
    Metadata(Value),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(op) => f.debug_tuple("Operation").field(&op.name()).finish(),
            Self::Metadata(value) => f.debug_tuple("Metadata").field(value).finish(),
        }
    }
}

/// Per-capability provider metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityInfo {
    pub version: String,
}

impl Default for CapabilityInfo {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
        }
    }
}

/// A registered provider: name, capability claims, operation bindings,
/// and a lazily resolved settings bundle.
pub struct Provider {
    name: String,
    declared: BTreeSet<CapabilityKey>,
    bindings: HashMap<String, Binding>,
    info: BTreeMap<CapabilityKey, CapabilityInfo>,
    source: SettingsSource,
    resolved: OnceLock<Result<ProviderSettings, InvokeError>>,
}

impl Provider {
    pub fn builder(name: impl Into<String>) -> ProviderBuilder {
        ProviderBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The capability keys this provider claims to implement.
    pub fn capabilities(&self) -> &BTreeSet<CapabilityKey> {
        &self.declared
    }

    pub fn info(&self, key: &CapabilityKey) -> Option<&CapabilityInfo> {
        self.info.get(key)
    }

    pub(crate) fn binding(&self, operation_name: &str) -> Option<&Binding> {
        self.bindings.get(operation_name)
    }

    /// Resolve the provider's settings. Lazy and once-only: the first
    /// call performs the resolution and the outcome — success or
    /// failure — is cached for the process lifetime.
    pub fn settings(&self) -> Result<&ProviderSettings, InvokeError> {
        self.resolved
            .get_or_init(|| self.source.resolve(&self.name))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("capabilities", &self.declared.len())
            .field("source", &self.source)
            .finish()
    }
}

/// Builds a [`Provider`]'s registration table.
pub struct ProviderBuilder {
    name: String,
    declared: BTreeSet<CapabilityKey>,
    bindings: HashMap<String, Binding>,
    info: BTreeMap<CapabilityKey, CapabilityInfo>,
    source: SettingsSource,
}

impl ProviderBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: BTreeSet::new(),
            bindings: HashMap::new(),
            info: BTreeMap::new(),
            source: SettingsSource::default(),
        }
    }

    pub fn settings(mut self, settings: ProviderSettings) -> Self {
        self.source = SettingsSource::Static(settings);
        self
    }

    pub fn settings_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.source = SettingsSource::File(path.into());
        self
    }

    pub fn settings_with(
        mut self,
        resolve: impl Fn() -> Result<ProviderSettings, String> + Send + Sync + 'static,
    ) -> Self {
        self.source = SettingsSource::Custom(Arc::new(resolve));
        self
    }

    /// Claim a capability and bind its operation under the derived name.
    pub fn operation(self, key: CapabilityKey, op: Arc<dyn Operation>) -> Self {
        self.operation_with_info(key, CapabilityInfo::default(), op)
    }

    pub fn operation_with_info(
        mut self,
        key: CapabilityKey,
        info: CapabilityInfo,
        op: Arc<dyn Operation>,
    ) -> Self {
        self.bindings
            .insert(key.operation_name(), Binding::Operation(op));
        self.info.insert(key.clone(), info);
        self.declared.insert(key);
        self
    }

    /// Claim a capability without binding an implementation. The claim
    /// shows up in the directory; resolution and validation then flag the
    /// missing operation.
    pub fn declare(mut self, key: CapabilityKey) -> Self {
        self.declared.insert(key);
        self
    }

    /// Claim a capability with an explicit raw binding. Mostly useful to
    /// exercise the `OperationNotCallable` consistency fault.
    pub fn binding(mut self, key: CapabilityKey, binding: Binding) -> Self {
        self.bindings.insert(key.operation_name(), binding);
        self.declared.insert(key);
        self
    }

    pub fn build(self) -> Provider {
        Provider {
            name: self.name,
            declared: self.declared,
            bindings: self.bindings,
            info: self.info,
            source: self.source,
            resolved: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn settings_resolution_outcome_is_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counted = attempts.clone();
        let provider = Provider::builder("acme")
            .settings_with(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                Err("vault unreachable".to_string())
            })
            .build();

        assert!(provider.settings().is_err());
        assert!(provider.settings().is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn declared_capabilities_include_unbound_claims() {
        let key = CapabilityKey::new("text", "summarize");
        let provider = Provider::builder("acme").declare(key.clone()).build();
        assert!(provider.capabilities().contains(&key));
        assert!(provider.binding(&key.operation_name()).is_none());
    }
}
