//! Core error types.

use std::fmt;

use thiserror::Error;

use crate::capability::{CapabilityKey, Phase};
use crate::jobs::JobId;
use crate::schema::SchemaRef;

/// Resolution-time errors: the requested binding does not exist or is
/// inconsistent. Returned immediately, never wrapped, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Requested provider is not in the provider directory.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The capability triple is not declared in the schema catalog.
    #[error("unknown capability: {0}")]
    UnknownCapability(CapabilityKey),

    /// Provider exists but registered no operation for the capability.
    #[error("provider `{provider}` does not support capability `{capability}`")]
    ProviderDoesNotSupportCapability {
        provider: String,
        capability: CapabilityKey,
    },

    /// A binding exists under the derived operation name but is not an
    /// invocable operation (or its name disagrees with the naming
    /// contract). A registration bug, fatal to that capability.
    #[error("`{name}` on provider `{provider}` is registered but not callable")]
    OperationNotCallable { provider: String, name: String },
}

/// Normalized vendor-call failure: the single failure shape every
/// operation maps its vendor errors into. The core never inspects
/// vendor-specific error bodies beyond the message captured here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider `{provider}` call failed: {message}")]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
    /// Vendor HTTP status, when the failure came from an HTTP response.
    pub status: Option<u16>,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Invocation-time errors: the binding exists but calling it failed.
/// `Clone` so terminal job failures can be replayed deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// The provider's settings failed to resolve. Surfaced lazily at the
    /// first use of the provider, not at directory build time.
    #[error("provider configuration error for `{provider}`: {message}")]
    ProviderConfiguration { provider: String, message: String },

    /// The vendor call itself failed.
    #[error(transparent)]
    Provider(#[from] ProviderFailure),

    /// The caller did not supply the operation's declared arguments.
    #[error("invalid arguments for `{operation}`: {message}")]
    InvalidArguments { operation: String, message: String },
}

/// Which fixture document a catalog lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    SampleInput,
    ExampleOutput,
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleInput => f.write_str("sample input"),
            Self::ExampleOutput => f.write_str("example output"),
        }
    }
}

/// Schema catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown capability: {0}")]
    UnknownCapability(CapabilityKey),

    #[error("missing {kind} fixture for {capability}")]
    MissingFixture {
        capability: CapabilityKey,
        kind: FixtureKind,
    },

    #[error("malformed {kind} fixture for {capability}: {message}")]
    MalformedFixture {
        capability: CapabilityKey,
        kind: FixtureKind,
        message: String,
    },
}

/// Failures parsing a dual-payload envelope out of a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope must be a JSON object")]
    NotAnObject,

    #[error("missing `{0}` key")]
    MissingKey(&'static str),

    #[error("standardized response does not match schema `{schema}`: {message}")]
    Standardized { schema: SchemaRef, message: String },
}

/// Errors from the async job adapter. Resolution and invocation errors
/// propagate unchanged inside their own variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// The handle was never issued by this adapter (or was forgotten).
    #[error("unknown job handle: {0}")]
    UnknownHandle(JobId),

    /// An operation bound under a job phase returned a non-job outcome.
    /// A registration bug, not a vendor condition.
    #[error("operation `{operation}` did not behave as a `{phase}` job phase")]
    NotAJobOperation { operation: String, phase: Phase },
}

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry initialization error: {0}")]
    Init(String),
}
