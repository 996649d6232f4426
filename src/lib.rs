//! medley
//!
//! A unified multi-vendor AI API registry: one contract over many
//! third-party AI provider APIs (text analysis, image analysis, audio
//! processing), so a caller can invoke "sentiment analysis" or "logo
//! detection" without knowing which vendor backs it.
//!
//! The crate's core is the capability registry and dispatch layer:
//! - [`catalog::SchemaCatalog`] declares the universe of supported
//!   features/subfeatures/phases, their argument signatures, and the
//!   standardized output schema each one produces.
//! - [`directory::ProviderDirectory`] enumerates registered providers and
//!   the capability set each one claims.
//! - [`resolver::Resolver`] binds a `(provider, feature, subfeature, phase)`
//!   tuple to a concrete, callable [`provider::Operation`].
//! - [`validator::SchemaValidator`] is the offline regression guard: it
//!   checks every claimed capability against the catalog (implementation,
//!   declared schema, fixtures) and reports violations.
//! - [`jobs::JobAdapter`] turns the two-phase `launch_job` /
//!   `get_job_result` vendor pattern into stable, idempotently pollable
//!   job handles.
//!
//! Per-vendor request construction lives outside this crate; operations
//! registered by collaborator crates normalize their vendor calls through
//! [`http::VendorClient`] and always return the dual-payload
//! [`types::ResponseEnvelope`].
#![deny(unsafe_code)]

pub mod capability;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod http;
pub mod jobs;
pub mod provider;
pub mod resolver;
pub mod schema;
pub mod telemetry;
pub mod test_support;
pub mod types;
pub mod validator;

pub use capability::{CapabilityBase, CapabilityKey, FixturePolicy, Phase};
pub use catalog::{ArgKind, ArgSpec, CapabilitySignature, SchemaCatalog};
pub use directory::ProviderDirectory;
pub use error::{
    CatalogError, EnvelopeError, FixtureKind, InvokeError, JobError, ProviderFailure, ResolveError,
};
pub use http::VendorClient;
pub use jobs::{JobAdapter, JobHandle, JobId, JobStatus, PollOutcome};
pub use provider::{
    Binding, CallContext, CapabilityInfo, Operation, Provider, ProviderBuilder, ProviderSettings,
    SettingsSource,
};
pub use resolver::{BoundOperation, Resolver};
pub use schema::{SchemaRef, StandardizedPayload};
pub use types::{Args, OperationOutcome, ResponseEnvelope};
pub use validator::{SchemaValidator, Violation};
