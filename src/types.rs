//! Shared dispatch types: the dual-payload response envelope, operation
//! outcomes, and argument helpers.

use serde::Serialize;
use serde_json::Value;

use crate::error::{EnvelopeError, InvokeError};
use crate::schema::{SchemaRef, StandardizedPayload};

/// Argument map passed to an operation, keyed by the capability's
/// declared argument names.
pub type Args = serde_json::Map<String, Value>;

/// The sole success shape of every value-returning operation: the raw
/// vendor payload preserved verbatim for audit, paired with the
/// standardized payload conforming to the capability's schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub original_response: Value,
    pub standardized_response: StandardizedPayload,
}

impl ResponseEnvelope {
    pub fn new(original_response: Value, standardized_response: StandardizedPayload) -> Self {
        Self {
            original_response,
            standardized_response,
        }
    }

    /// The schema of the standardized half.
    pub fn schema(&self) -> SchemaRef {
        self.standardized_response.schema()
    }

    /// Parse an envelope out of a JSON document, schema-directed. Both
    /// keys must be present and the standardized half must deserialize
    /// as the given schema.
    pub fn from_value(schema: SchemaRef, value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut map) = value else {
            return Err(EnvelopeError::NotAnObject);
        };
        let original_response = map
            .remove("original_response")
            .ok_or(EnvelopeError::MissingKey("original_response"))?;
        let standardized = map
            .remove("standardized_response")
            .ok_or(EnvelopeError::MissingKey("standardized_response"))?;
        let standardized_response = StandardizedPayload::from_value(schema, standardized)
            .map_err(|source| EnvelopeError::Standardized {
                schema,
                message: source.to_string(),
            })?;
        Ok(Self {
            original_response,
            standardized_response,
        })
    }
}

/// Dispatch-level result of invoking an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// A value-returning capability produced its envelope. Also the
    /// terminal outcome of a `get_job_result` phase.
    Response(ResponseEnvelope),

    /// A `launch_job` phase submitted the vendor job; the token is the
    /// vendor's own job identifier.
    JobLaunched { provider_job_id: String },

    /// A `get_job_result` phase found the vendor still working. Not an
    /// error; the caller re-polls.
    JobPending,

    /// A no-return action phase (create/delete/upload-style) completed.
    Acknowledged,
}

impl OperationOutcome {
    pub fn into_response(self) -> Option<ResponseEnvelope> {
        match self {
            Self::Response(envelope) => Some(envelope),
            _ => None,
        }
    }
}

/// Fetch a required argument, failing with `InvalidArguments`.
pub fn require_arg<'a>(
    operation: &str,
    args: &'a Args,
    name: &str,
) -> Result<&'a Value, InvokeError> {
    args.get(name).ok_or_else(|| InvokeError::InvalidArguments {
        operation: operation.to_string(),
        message: format!("missing required argument `{name}`"),
    })
}

/// Fetch a required string argument.
pub fn require_str<'a>(
    operation: &str,
    args: &'a Args,
    name: &str,
) -> Result<&'a str, InvokeError> {
    require_arg(operation, args, name)?
        .as_str()
        .ok_or_else(|| InvokeError::InvalidArguments {
            operation: operation.to_string(),
            message: format!("argument `{name}` must be a string"),
        })
}

/// Fetch a required unsigned integer argument.
pub fn require_u64(operation: &str, args: &Args, name: &str) -> Result<u64, InvokeError> {
    require_arg(operation, args, name)?
        .as_u64()
        .ok_or_else(|| InvokeError::InvalidArguments {
            operation: operation.to_string(),
            message: format!("argument `{name}` must be a non-negative integer"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_parses_with_both_keys() {
        let value = json!({
            "original_response": { "result": "raw" },
            "standardized_response": { "result": "clean" },
        });
        let envelope = ResponseEnvelope::from_value(SchemaRef::Summarize, value).unwrap();
        assert_eq!(envelope.schema(), SchemaRef::Summarize);
        assert_eq!(envelope.original_response, json!({ "result": "raw" }));
    }

    #[test]
    fn envelope_rejects_missing_keys() {
        let value = json!({ "original_response": {} });
        assert_eq!(
            ResponseEnvelope::from_value(SchemaRef::Summarize, value),
            Err(EnvelopeError::MissingKey("standardized_response"))
        );
    }

    #[test]
    fn envelope_rejects_non_objects() {
        assert_eq!(
            ResponseEnvelope::from_value(SchemaRef::Summarize, json!([1, 2])),
            Err(EnvelopeError::NotAnObject)
        );
    }

    #[test]
    fn require_helpers_report_the_operation() {
        let args = Args::new();
        let err = require_str("text__summarize", &args, "text").unwrap_err();
        assert!(matches!(
            err,
            InvokeError::InvalidArguments { ref operation, .. } if operation == "text__summarize"
        ));
    }
}
