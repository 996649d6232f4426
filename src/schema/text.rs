//! Standardized schemas for text capabilities.

use serde::{Deserialize, Serialize};

/// Sentiment label attached to an opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentItem {
    pub sentiment: Sentiment,
    /// Magnitude of the opinion, in `[0, 1]`.
    pub sentiment_rate: f64,
}

/// Shared output shape of `text/sentiment_analysis`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentAnalysisResult {
    pub items: Vec<SentimentItem>,
}

/// Shared output shape of `text/summarize`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummarizeResult {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordItem {
    pub keyword: String,
    /// Relative weight of the keyword, in `[0, 1]`.
    pub importance: f64,
}

/// Shared output shape of `text/keyword_extraction`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordExtractionResult {
    pub items: Vec<KeywordItem>,
}

/// Shared output shape of `text/anonymization`: the input text with
/// personally identifying spans replaced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub result: String,
}
