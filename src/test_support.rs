//! Canned in-memory providers for tests, examples, and harnesses.
//!
//! These providers implement the shipped capability universe without any
//! network traffic: deterministic outputs, scriptable job phases, and a
//! deliberately broken registration for validator scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::capability::{CapabilityBase, CapabilityKey};
use crate::directory::ProviderDirectory;
use crate::error::{InvokeError, ProviderFailure};
use crate::provider::{Binding, CallContext, Operation, Provider, ProviderSettings};
use crate::schema::{
    KeywordExtractionResult, KeywordItem, LogoBoundingPoly, LogoDetectionResult, LogoItem,
    LogoVertex, SchemaRef, Sentiment, SentimentAnalysisResult, SentimentItem, SpeechToTextResult,
    StandardizedPayload, SummarizeResult,
};
use crate::types::{Args, OperationOutcome, ResponseEnvelope, require_str, require_u64};

/// Scripted behavior for the canned `get_job_result` operation.
#[derive(Clone)]
pub struct TranscriptionScript {
    /// Counts actual vendor-side calls; lets tests assert that terminal
    /// polls never reach the vendor again.
    pub calls: Arc<AtomicUsize>,
    /// How many polls report `pending` before the job turns terminal.
    pub pending_polls: usize,
    /// When set, the job fails terminally with this vendor message.
    pub fail_with: Option<String>,
    /// Simulated vendor latency inside the call.
    pub delay: Option<Duration>,
}

impl Default for TranscriptionScript {
    fn default() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            pending_polls: 0,
            fail_with: None,
            delay: None,
        }
    }
}

struct SentimentOp;

#[async_trait]
impl Operation for SentimentOp {
    fn name(&self) -> &str {
        "text__sentiment_analysis"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::SentimentAnalysis)
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        let text = require_str(self.name(), args, "text")?;

        let negative = text.contains("not") || text.contains("bad");
        let rate: f64 = if negative { -0.9 } else { 0.9 };
        let original = json!({ "opinions": [{ "value": rate }] });
        let standardized = SentimentAnalysisResult {
            items: vec![SentimentItem {
                sentiment: if negative {
                    Sentiment::Negative
                } else {
                    Sentiment::Positive
                },
                sentiment_rate: rate.abs(),
            }],
        };
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            original,
            StandardizedPayload::SentimentAnalysis(standardized),
        )))
    }
}

struct SummarizeOp;

#[async_trait]
impl Operation for SummarizeOp {
    fn name(&self) -> &str {
        "text__summarize"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::Summarize)
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        let text = require_str(self.name(), args, "text")?;
        let wanted = require_u64(self.name(), args, "output_sentences")? as usize;

        let sentences: Vec<&str> = text
            .split('.')
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .collect();
        let result = sentences
            .iter()
            .take(wanted.max(1))
            .map(|sentence| format!("{sentence}."))
            .collect::<Vec<_>>()
            .join(" ");

        let original = json!({ "sentences": sentences });
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            original,
            StandardizedPayload::Summarize(SummarizeResult { result }),
        )))
    }
}

struct KeywordOp;

#[async_trait]
impl Operation for KeywordOp {
    fn name(&self) -> &str {
        "text__keyword_extraction"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::KeywordExtraction)
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        let text = require_str(self.name(), args, "text")?;

        let mut seen = std::collections::BTreeSet::new();
        let mut items = Vec::new();
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.len() > 5 && seen.insert(word.clone()) {
                items.push(KeywordItem {
                    importance: (word.len() as f64 / 10.0).min(1.0),
                    keyword: word,
                });
            }
        }

        let original = json!({ "keywords": items.iter().map(|i| i.keyword.clone()).collect::<Vec<_>>() });
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            original,
            StandardizedPayload::KeywordExtraction(KeywordExtractionResult { items }),
        )))
    }
}

struct LogoOp;

#[async_trait]
impl Operation for LogoOp {
    fn name(&self) -> &str {
        "image__logo_detection"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::LogoDetection)
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        require_str(self.name(), args, "file_url")?;

        let (left, top, right, bottom) = (12.0, 34.0, 120.0, 96.0);
        let item = LogoItem {
            description: None,
            score: None,
            bounding_poly: LogoBoundingPoly {
                vertices: vec![
                    LogoVertex { x: left, y: top },
                    LogoVertex { x: right, y: top },
                    LogoVertex { x: right, y: bottom },
                    LogoVertex { x: left, y: bottom },
                ],
            },
        };
        let original = json!({ "bboxes": [[left, top, right, bottom]] });
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            original,
            StandardizedPayload::LogoDetection(LogoDetectionResult { items: vec![item] }),
        )))
    }
}

struct CreateProjectOp;

#[async_trait]
impl Operation for CreateProjectOp {
    fn name(&self) -> &str {
        "image__search__create_project"
    }

    fn returns(&self) -> Option<SchemaRef> {
        None
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        _args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        Ok(OperationOutcome::Acknowledged)
    }
}

struct UploadImageOp;

#[async_trait]
impl Operation for UploadImageOp {
    fn name(&self) -> &str {
        "image__search__upload_image"
    }

    fn returns(&self) -> Option<SchemaRef> {
        None
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        require_str(self.name(), args, "project_id")?;
        require_str(self.name(), args, "image_name")?;
        require_str(self.name(), args, "file_url")?;
        Ok(OperationOutcome::Acknowledged)
    }
}

struct DeleteImageOp;

#[async_trait]
impl Operation for DeleteImageOp {
    fn name(&self) -> &str {
        "image__search__delete_image"
    }

    fn returns(&self) -> Option<SchemaRef> {
        None
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        require_str(self.name(), args, "project_id")?;
        require_str(self.name(), args, "image_name")?;
        Ok(OperationOutcome::Acknowledged)
    }
}

struct SttLaunchOp;

#[async_trait]
impl Operation for SttLaunchOp {
    fn name(&self) -> &str {
        "audio__speech_to_text_async__launch_job"
    }

    fn returns(&self) -> Option<SchemaRef> {
        None
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        ctx.require_setting("api_key")?;
        require_str(self.name(), args, "file_url")?;
        require_str(self.name(), args, "language")?;
        Ok(OperationOutcome::JobLaunched {
            provider_job_id: "vendor-job-001".to_string(),
        })
    }
}

struct SttResultOp {
    script: TranscriptionScript,
}

#[async_trait]
impl Operation for SttResultOp {
    fn name(&self) -> &str {
        "audio__speech_to_text_async__get_job_result"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::SpeechToText)
    }

    async fn call(
        &self,
        ctx: &CallContext<'_>,
        args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        if let Some(delay) = self.script.delay {
            tokio::time::sleep(delay).await;
        }
        let nth = self.script.calls.fetch_add(1, Ordering::SeqCst) + 1;
        require_str(self.name(), args, "provider_job_id")?;

        if let Some(message) = &self.script.fail_with {
            return Err(ProviderFailure::new(ctx.provider, message.clone()).into());
        }
        if nth <= self.script.pending_polls {
            return Ok(OperationOutcome::JobPending);
        }

        let original = json!({ "status": "done", "transcript": "the quick brown fox" });
        let standardized = SpeechToTextResult {
            text: "the quick brown fox".to_string(),
            confidence: Some(0.94),
        };
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            original,
            StandardizedPayload::SpeechToText(standardized),
        )))
    }
}

/// An operation whose declared schema disagrees with the catalog, for
/// `SchemaMismatch` scenarios.
struct MislabeledKeywordOp;

#[async_trait]
impl Operation for MislabeledKeywordOp {
    fn name(&self) -> &str {
        "text__keyword_extraction"
    }

    fn returns(&self) -> Option<SchemaRef> {
        Some(SchemaRef::Summarize)
    }

    async fn call(
        &self,
        _ctx: &CallContext<'_>,
        _args: &Args,
    ) -> Result<OperationOutcome, InvokeError> {
        Ok(OperationOutcome::Response(ResponseEnvelope::new(
            Value::Null,
            StandardizedPayload::Summarize(SummarizeResult::default()),
        )))
    }
}

fn acme_settings() -> ProviderSettings {
    ProviderSettings::from_iter([
        ("api_key", "acme-test-key"),
        ("base_url", "https://api.acme.test/v2/"),
    ])
}

/// Full-universe provider: every shipped capability, canned responses.
pub fn acme() -> Provider {
    acme_with(&TranscriptionScript::default())
}

/// Like [`acme`], with scriptable transcription job behavior.
pub fn acme_with(script: &TranscriptionScript) -> Provider {
    let stt = CapabilityBase::new("audio", "speech_to_text_async");
    Provider::builder("acme")
        .settings(acme_settings())
        .operation(
            CapabilityKey::new("text", "sentiment_analysis"),
            Arc::new(SentimentOp),
        )
        .operation(CapabilityKey::new("text", "summarize"), Arc::new(SummarizeOp))
        .operation(
            CapabilityKey::new("text", "keyword_extraction"),
            Arc::new(KeywordOp),
        )
        .operation(
            CapabilityKey::new("image", "logo_detection"),
            Arc::new(LogoOp),
        )
        .operation(
            CapabilityKey::action("image", "search", "create_project"),
            Arc::new(CreateProjectOp),
        )
        .operation(
            CapabilityKey::action("image", "search", "upload_image"),
            Arc::new(UploadImageOp),
        )
        .operation(
            CapabilityKey::action("image", "search", "delete_image"),
            Arc::new(DeleteImageOp),
        )
        .operation(stt.launch_key(), Arc::new(SttLaunchOp))
        .operation(
            stt.result_key(),
            Arc::new(SttResultOp {
                script: script.clone(),
            }),
        )
        .build()
}

/// Narrow provider: sentiment analysis only.
pub fn globex() -> Provider {
    Provider::builder("globex")
        .settings(ProviderSettings::from_iter([("api_key", "globex-test-key")]))
        .operation(
            CapabilityKey::new("text", "sentiment_analysis"),
            Arc::new(SentimentOp),
        )
        .build()
}

/// Deliberately broken registrations: an unbound claim, a non-callable
/// binding, and a schema-mismatched operation.
pub fn broken() -> Provider {
    Provider::builder("brokenco")
        .settings(ProviderSettings::from_iter([("api_key", "broken-test-key")]))
        .declare(CapabilityKey::new("text", "summarize"))
        .binding(
            CapabilityKey::new("text", "sentiment_analysis"),
            Binding::Metadata(json!({ "version": "v1" })),
        )
        .operation(
            CapabilityKey::new("text", "keyword_extraction"),
            Arc::new(MislabeledKeywordOp),
        )
        .build()
}

/// A provider whose settings cannot resolve; invocation surfaces a
/// configuration error.
pub fn misconfigured() -> Provider {
    Provider::builder("misconfigured")
        .settings_file("/nonexistent/medley-settings.json")
        .operation(
            CapabilityKey::new("text", "sentiment_analysis"),
            Arc::new(SentimentOp),
        )
        .build()
}

/// The default test directory: `acme` plus `globex`.
pub fn directory() -> ProviderDirectory {
    ProviderDirectory::build([acme(), globex()])
}
