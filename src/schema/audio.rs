//! Standardized schemas for audio capabilities.

use serde::{Deserialize, Serialize};

/// Shared output shape of `audio/speech_to_text_async` results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeechToTextResult {
    pub text: String,
    pub confidence: Option<f64>,
}
