//! Standardized response schemas.
//!
//! Every capability maps to exactly one standardized schema shared by all
//! providers implementing it: two providers' outputs for the same
//! capability are shape-compatible even though their raw vendor payloads
//! differ arbitrarily. Schemas are tagged structural types — an operation
//! returns one concrete payload variant, never an untyped mapping.

pub mod audio;
pub mod image;
pub mod text;

pub use audio::*;
pub use image::*;
pub use text::*;

use std::fmt;

use serde::Serialize;

/// Name of a standardized schema, as declared by the schema catalog and
/// by each operation's return contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRef {
    SentimentAnalysis,
    Summarize,
    KeywordExtraction,
    Anonymization,
    LogoDetection,
    SpeechToText,
}

impl SchemaRef {
    /// The struct name of the schema, for reports and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SentimentAnalysis => "SentimentAnalysisResult",
            Self::Summarize => "SummarizeResult",
            Self::KeywordExtraction => "KeywordExtractionResult",
            Self::Anonymization => "AnonymizationResult",
            Self::LogoDetection => "LogoDetectionResult",
            Self::SpeechToText => "SpeechToTextResult",
        }
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A standardized payload: exactly one typed schema value, tagged by the
/// variant. Serializes transparently as the inner value so envelopes keep
/// the flat `standardized_response` wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StandardizedPayload {
    SentimentAnalysis(SentimentAnalysisResult),
    Summarize(SummarizeResult),
    KeywordExtraction(KeywordExtractionResult),
    Anonymization(AnonymizationResult),
    LogoDetection(LogoDetectionResult),
    SpeechToText(SpeechToTextResult),
}

impl StandardizedPayload {
    /// The schema this payload instantiates.
    pub fn schema(&self) -> SchemaRef {
        match self {
            Self::SentimentAnalysis(_) => SchemaRef::SentimentAnalysis,
            Self::Summarize(_) => SchemaRef::Summarize,
            Self::KeywordExtraction(_) => SchemaRef::KeywordExtraction,
            Self::Anonymization(_) => SchemaRef::Anonymization,
            Self::LogoDetection(_) => SchemaRef::LogoDetection,
            Self::SpeechToText(_) => SchemaRef::SpeechToText,
        }
    }

    /// Deserialize a payload as a specific schema. Deserialization is
    /// always schema-directed; payloads are never guessed from shape.
    pub fn from_value(
        schema: SchemaRef,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match schema {
            SchemaRef::SentimentAnalysis => {
                Self::SentimentAnalysis(serde_json::from_value(value)?)
            }
            SchemaRef::Summarize => Self::Summarize(serde_json::from_value(value)?),
            SchemaRef::KeywordExtraction => {
                Self::KeywordExtraction(serde_json::from_value(value)?)
            }
            SchemaRef::Anonymization => Self::Anonymization(serde_json::from_value(value)?),
            SchemaRef::LogoDetection => Self::LogoDetection(serde_json::from_value(value)?),
            SchemaRef::SpeechToText => Self::SpeechToText(serde_json::from_value(value)?),
        })
    }
}
