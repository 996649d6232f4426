//! The schema validator: the offline regression guard.
//!
//! For every capability a provider claims, the validator checks that the
//! operation resolves, that its declared return schema matches the
//! catalog, and that the non-exempt fixture documents exist and parse.
//! Findings are aggregated and reported, never thrown mid-request; they
//! gate releases, not runtime calls.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::capability::CapabilityKey;
use crate::error::{CatalogError, ResolveError};
use crate::resolver::Resolver;
use crate::schema::SchemaRef;
use crate::types::ResponseEnvelope;

/// One validation finding against a provider's claimed capability.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// The operation did not resolve.
    MissingImplementation {
        capability: CapabilityKey,
        reason: ResolveError,
    },
    /// The operation's declared return schema disagrees with the catalog.
    SchemaMismatch {
        capability: CapabilityKey,
        expected: Option<SchemaRef>,
        declared: Option<SchemaRef>,
    },
    /// The example output document is absent.
    FixtureMissing { capability: CapabilityKey },
    /// A fixture document exists but does not parse as required.
    FixtureMalformed {
        capability: CapabilityKey,
        message: String,
    },
    /// The sample input document is absent.
    SampleMissing { capability: CapabilityKey },
}

impl Violation {
    pub fn capability(&self) -> &CapabilityKey {
        match self {
            Self::MissingImplementation { capability, .. }
            | Self::SchemaMismatch { capability, .. }
            | Self::FixtureMissing { capability }
            | Self::FixtureMalformed { capability, .. }
            | Self::SampleMissing { capability } => capability,
        }
    }
}

fn schema_name(schema: Option<SchemaRef>) -> &'static str {
    schema.map_or("(no return)", |schema| schema.name())
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImplementation { capability, reason } => {
                write!(f, "{capability}: no resolvable implementation ({reason})")
            }
            Self::SchemaMismatch {
                capability,
                expected,
                declared,
            } => write!(
                f,
                "{capability}: declared schema {} but catalog expects {}",
                schema_name(*declared),
                schema_name(*expected)
            ),
            Self::FixtureMissing { capability } => {
                write!(f, "{capability}: example output fixture is missing")
            }
            Self::FixtureMalformed {
                capability,
                message,
            } => write!(f, "{capability}: malformed fixture ({message})"),
            Self::SampleMissing { capability } => {
                write!(f, "{capability}: sample input fixture is missing")
            }
        }
    }
}

/// Validates providers' registrations against the schema catalog.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    resolver: Resolver,
}

impl SchemaValidator {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Validate every capability the provider claims. The only hard error
    /// is an unknown provider; everything else is a finding in the list.
    /// An empty list means the provider upholds the shared-schema
    /// guarantee.
    pub fn validate_provider(&self, provider: &str) -> Result<Vec<Violation>, ResolveError> {
        let claimed = self.resolver.directory().capabilities_of(provider)?.clone();
        let mut violations = Vec::new();

        for key in &claimed {
            self.validate_capability(provider, key, &mut violations);
        }

        for violation in &violations {
            tracing::warn!(provider = %provider, %violation, "schema validation violation");
        }
        Ok(violations)
    }

    /// Validate every registered provider.
    pub fn validate_all(&self) -> BTreeMap<String, Vec<Violation>> {
        let mut report = BTreeMap::new();
        for provider in self.resolver.directory().list_providers() {
            // The provider names come from the directory itself, so the
            // lookup cannot fail underneath us.
            if let Ok(violations) = self.validate_provider(provider) {
                report.insert(provider.to_string(), violations);
            }
        }
        report
    }

    fn validate_capability(
        &self,
        provider: &str,
        key: &CapabilityKey,
        violations: &mut Vec<Violation>,
    ) {
        let bound = match self.resolver.resolve(key, provider) {
            Ok(bound) => bound,
            Err(reason) => {
                violations.push(Violation::MissingImplementation {
                    capability: key.clone(),
                    reason,
                });
                return;
            }
        };

        // Resolution succeeded, so the catalog declares the key.
        let Ok(entry) = self.resolver.catalog().entry(key) else {
            return;
        };

        let expected = entry.returns();
        if bound.returns() != expected {
            violations.push(Violation::SchemaMismatch {
                capability: key.clone(),
                expected,
                declared: bound.returns(),
            });
        }

        let policy = entry.fixture_policy();
        if policy.requires_output {
            match self.resolver.catalog().example_output_for(key) {
                Ok(document) => {
                    if let Some(violation) = check_output_document(key, expected, document) {
                        violations.push(violation);
                    }
                }
                Err(CatalogError::MissingFixture { .. }) => {
                    violations.push(Violation::FixtureMissing {
                        capability: key.clone(),
                    });
                }
                Err(error) => violations.push(Violation::FixtureMalformed {
                    capability: key.clone(),
                    message: error.to_string(),
                }),
            }
        }

        if policy.requires_sample {
            match self.resolver.catalog().sample_input_for(key) {
                Ok(sample) => {
                    for spec in entry.signature().args {
                        if spec.required && !sample.contains_key(spec.name) {
                            violations.push(Violation::FixtureMalformed {
                                capability: key.clone(),
                                message: format!(
                                    "sample input is missing required argument `{}`",
                                    spec.name
                                ),
                            });
                        }
                    }
                }
                Err(CatalogError::MissingFixture { .. }) => {
                    violations.push(Violation::SampleMissing {
                        capability: key.clone(),
                    });
                }
                Err(error) => violations.push(Violation::FixtureMalformed {
                    capability: key.clone(),
                    message: error.to_string(),
                }),
            }
        }
    }
}

/// Check an example output document against the envelope contract.
fn check_output_document(
    key: &CapabilityKey,
    expected: Option<SchemaRef>,
    document: Value,
) -> Option<Violation> {
    match expected {
        Some(schema) => match ResponseEnvelope::from_value(schema, document) {
            Ok(_) => None,
            Err(error) => Some(Violation::FixtureMalformed {
                capability: key.clone(),
                message: error.to_string(),
            }),
        },
        // No declared schema: the document still has to carry both
        // envelope keys.
        None => {
            let Value::Object(map) = document else {
                return Some(Violation::FixtureMalformed {
                    capability: key.clone(),
                    message: "example output must be a JSON object".to_string(),
                });
            };
            for required in ["original_response", "standardized_response"] {
                if !map.contains_key(required) {
                    return Some(Violation::FixtureMalformed {
                        capability: key.clone(),
                        message: format!("example output is missing `{required}`"),
                    });
                }
            }
            None
        }
    }
}
