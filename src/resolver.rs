//! The capability resolver: binds `(provider, capability)` to a concrete
//! callable operation.
//!
//! Lookup happens by the derived operation name
//! (`feature__subfeature[__phase]`); the resolver rejects anything found
//! under that name which is not an invocable operation, or whose own name
//! disagrees with the contract. The `launch_job` / `get_job_result`
//! phases of a two-phase capability are distinct keys and resolve
//! independently.

use std::sync::Arc;

use crate::capability::CapabilityKey;
use crate::catalog::SchemaCatalog;
use crate::directory::ProviderDirectory;
use crate::error::{InvokeError, ResolveError};
use crate::provider::{Binding, CallContext, Operation, Provider};
use crate::schema::SchemaRef;
use crate::types::{Args, OperationOutcome};

/// Resolves capability requests against the provider directory and the
/// schema catalog. Cheap to clone; both collaborators are shared.
#[derive(Debug, Clone)]
pub struct Resolver {
    directory: Arc<ProviderDirectory>,
    catalog: Arc<SchemaCatalog>,
}

impl Resolver {
    pub fn new(
        directory: impl Into<Arc<ProviderDirectory>>,
        catalog: impl Into<Arc<SchemaCatalog>>,
    ) -> Self {
        Self {
            directory: directory.into(),
            catalog: catalog.into(),
        }
    }

    pub fn directory(&self) -> &ProviderDirectory {
        &self.directory
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Resolve a capability on a named provider.
    ///
    /// Error ladder: `UnknownProvider` when the provider is unregistered,
    /// `UnknownCapability` when the key is undeclared in the catalog,
    /// `ProviderDoesNotSupportCapability` when the provider has no
    /// binding, `OperationNotCallable` when the binding is inconsistent.
    pub fn resolve(
        &self,
        key: &CapabilityKey,
        provider: &str,
    ) -> Result<BoundOperation, ResolveError> {
        let provider = self.directory.get(provider)?;
        if !self.catalog.contains(key) {
            return Err(ResolveError::UnknownCapability(key.clone()));
        }
        self.bind(provider, key)
    }

    /// Resolve a capability across all providers.
    ///
    /// Returns every provider offering the capability; an empty result is
    /// a valid, non-error outcome — "no provider supports this" is the
    /// caller's policy decision. Providers with inconsistent bindings are
    /// skipped with a warning; the validator reports them.
    pub fn resolve_all(&self, key: &CapabilityKey) -> Vec<BoundOperation> {
        let mut bound = Vec::new();
        for provider in self.directory.providers() {
            match self.bind(provider, key) {
                Ok(operation) => bound.push(operation),
                Err(ResolveError::ProviderDoesNotSupportCapability { .. }) => {}
                Err(error) => {
                    tracing::warn!(
                        provider = %provider.name(),
                        capability = %key,
                        %error,
                        "skipping provider with inconsistent registration"
                    );
                }
            }
        }
        tracing::debug!(capability = %key, providers = bound.len(), "resolved capability");
        bound
    }

    fn bind(
        &self,
        provider: &Arc<Provider>,
        key: &CapabilityKey,
    ) -> Result<BoundOperation, ResolveError> {
        let name = key.operation_name();
        match provider.binding(&name) {
            None => Err(ResolveError::ProviderDoesNotSupportCapability {
                provider: provider.name().to_string(),
                capability: key.clone(),
            }),
            Some(Binding::Metadata(_)) => Err(ResolveError::OperationNotCallable {
                provider: provider.name().to_string(),
                name,
            }),
            Some(Binding::Operation(op)) => {
                if op.name() != name {
                    return Err(ResolveError::OperationNotCallable {
                        provider: provider.name().to_string(),
                        name,
                    });
                }
                Ok(BoundOperation {
                    provider: provider.clone(),
                    key: key.clone(),
                    op: op.clone(),
                })
            }
        }
    }
}

/// A capability bound to one provider's operation, ready to invoke.
#[derive(Clone)]
pub struct BoundOperation {
    provider: Arc<Provider>,
    key: CapabilityKey,
    op: Arc<dyn Operation>,
}

impl BoundOperation {
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn key(&self) -> &CapabilityKey {
        &self.key
    }

    /// The operation's own name; equal to `key().operation_name()` by the
    /// naming contract.
    pub fn name(&self) -> &str {
        self.op.name()
    }

    /// The standardized schema the operation declares it returns.
    pub fn returns(&self) -> Option<SchemaRef> {
        self.op.returns()
    }

    /// Invoke the operation. Forces the provider's lazy settings
    /// resolution first; a configuration failure surfaces here, at first
    /// use, not at directory build time.
    pub async fn invoke(&self, args: &Args) -> Result<OperationOutcome, InvokeError> {
        let settings = self.provider.settings()?;
        let ctx = CallContext {
            provider: self.provider.name(),
            settings,
        };
        tracing::debug!(
            provider = %self.provider.name(),
            operation = %self.op.name(),
            "invoking operation"
        );
        self.op.call(&ctx, args).await
    }
}

impl std::fmt::Debug for BoundOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundOperation")
            .field("provider", &self.provider.name())
            .field("operation", &self.op.name())
            .finish()
    }
}
