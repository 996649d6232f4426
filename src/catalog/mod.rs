//! The schema catalog: the declared universe of capabilities.
//!
//! For every `(feature, subfeature, phase)` the catalog knows the
//! standardized output schema, the self-descriptive argument signature,
//! and the fixture policy. The table is built once at first use and is
//! read-only afterwards, so concurrent lookups need no locking.

mod fixtures;

pub use fixtures::FixtureStore;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;

use crate::capability::{CapabilityKey, FixturePolicy, Phase};
use crate::error::CatalogError;
use crate::schema::SchemaRef;
use crate::types::Args;

/// Coarse argument type, for signature self-description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Free-form text content.
    Text,
    /// A BCP-47-style language tag such as `en` or `fr-FR`.
    LanguageTag,
    /// A URL or path addressing a caller-provided document (image, audio).
    Document,
    /// A vendor job token from a prior `launch_job`.
    JobToken,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

impl ArgSpec {
    pub const fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Declared argument list of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySignature {
    pub args: &'static [ArgSpec],
}

/// One declared capability: schema, signature, fixture policy.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    key: CapabilityKey,
    returns: Option<SchemaRef>,
    signature: CapabilitySignature,
    fixtures: FixturePolicy,
}

impl CatalogEntry {
    fn new(key: CapabilityKey, returns: Option<SchemaRef>, args: &'static [ArgSpec]) -> Self {
        let fixtures = FixturePolicy::for_phase(key.phase());
        Self {
            key,
            returns,
            signature: CapabilitySignature { args },
            fixtures,
        }
    }

    pub fn key(&self) -> &CapabilityKey {
        &self.key
    }

    /// The standardized schema of the capability's envelope; `None` for
    /// declared no-return phases.
    pub fn returns(&self) -> Option<SchemaRef> {
        self.returns
    }

    pub fn signature(&self) -> &CapabilitySignature {
        &self.signature
    }

    pub fn fixture_policy(&self) -> FixturePolicy {
        self.fixtures
    }
}

const LANGUAGE_TEXT_ARGS: &[ArgSpec] = &[
    ArgSpec::required("language", ArgKind::LanguageTag),
    ArgSpec::required("text", ArgKind::Text),
];

const SUMMARIZE_ARGS: &[ArgSpec] = &[
    ArgSpec::required("language", ArgKind::LanguageTag),
    ArgSpec::required("text", ArgKind::Text),
    ArgSpec::required("output_sentences", ArgKind::Integer),
    ArgSpec::optional("model", ArgKind::Text),
];

const LOGO_DETECTION_ARGS: &[ArgSpec] = &[ArgSpec::required("file_url", ArgKind::Document)];

const CREATE_PROJECT_ARGS: &[ArgSpec] = &[];

const UPLOAD_IMAGE_ARGS: &[ArgSpec] = &[
    ArgSpec::required("project_id", ArgKind::Text),
    ArgSpec::required("image_name", ArgKind::Text),
    ArgSpec::required("file_url", ArgKind::Document),
];

const DELETE_IMAGE_ARGS: &[ArgSpec] = &[
    ArgSpec::required("project_id", ArgKind::Text),
    ArgSpec::required("image_name", ArgKind::Text),
];

const STT_LAUNCH_ARGS: &[ArgSpec] = &[
    ArgSpec::required("file_url", ArgKind::Document),
    ArgSpec::required("language", ArgKind::LanguageTag),
];

const STT_RESULT_ARGS: &[ArgSpec] = &[ArgSpec::required("provider_job_id", ArgKind::JobToken)];

fn build_entries() -> BTreeMap<CapabilityKey, CatalogEntry> {
    let definitions = [
        CatalogEntry::new(
            CapabilityKey::new("text", "sentiment_analysis"),
            Some(SchemaRef::SentimentAnalysis),
            LANGUAGE_TEXT_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::new("text", "summarize"),
            Some(SchemaRef::Summarize),
            SUMMARIZE_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::new("text", "keyword_extraction"),
            Some(SchemaRef::KeywordExtraction),
            LANGUAGE_TEXT_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::new("text", "anonymization"),
            Some(SchemaRef::Anonymization),
            LANGUAGE_TEXT_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::new("image", "logo_detection"),
            Some(SchemaRef::LogoDetection),
            LOGO_DETECTION_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::action("image", "search", "create_project"),
            None,
            CREATE_PROJECT_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::action("image", "search", "upload_image"),
            None,
            UPLOAD_IMAGE_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::action("image", "search", "delete_image"),
            None,
            DELETE_IMAGE_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::with_phase("audio", "speech_to_text_async", Phase::LaunchJob),
            None,
            STT_LAUNCH_ARGS,
        ),
        CatalogEntry::new(
            CapabilityKey::with_phase("audio", "speech_to_text_async", Phase::GetJobResult),
            Some(SchemaRef::SpeechToText),
            STT_RESULT_ARGS,
        ),
    ];

    definitions
        .into_iter()
        .map(|entry| (entry.key.clone(), entry))
        .collect()
}

fn entries() -> &'static BTreeMap<CapabilityKey, CatalogEntry> {
    static ENTRIES: OnceLock<BTreeMap<CapabilityKey, CatalogEntry>> = OnceLock::new();
    ENTRIES.get_or_init(build_entries)
}

/// The schema catalog: static capability table plus a fixture store.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    fixtures: FixtureStore,
}

impl SchemaCatalog {
    /// A catalog over a custom fixture tree.
    pub fn new(fixture_root: impl Into<PathBuf>) -> Self {
        Self {
            fixtures: FixtureStore::new(fixture_root),
        }
    }

    /// A catalog over the fixture tree shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"))
    }

    pub fn fixture_root(&self) -> &Path {
        self.fixtures.root()
    }

    /// Whether the capability triple is declared anywhere in the system.
    pub fn contains(&self, key: &CapabilityKey) -> bool {
        entries().contains_key(key)
    }

    /// Every declared capability key, in order.
    pub fn capabilities(&self) -> impl Iterator<Item = &'static CapabilityKey> {
        entries().keys()
    }

    pub fn entry(&self, key: &CapabilityKey) -> Result<&'static CatalogEntry, CatalogError> {
        entries()
            .get(key)
            .ok_or_else(|| CatalogError::UnknownCapability(key.clone()))
    }

    /// The standardized schema for a capability; `None` marks a declared
    /// no-return phase.
    pub fn schema_for(&self, key: &CapabilityKey) -> Result<Option<SchemaRef>, CatalogError> {
        Ok(self.entry(key)?.returns())
    }

    pub fn signature_for(
        &self,
        key: &CapabilityKey,
    ) -> Result<&'static CapabilitySignature, CatalogError> {
        Ok(self.entry(key)?.signature())
    }

    pub fn fixture_policy(&self, key: &CapabilityKey) -> Result<FixturePolicy, CatalogError> {
        Ok(self.entry(key)?.fixture_policy())
    }

    /// Sample argument document for a known capability. Fails with
    /// `MissingFixture` when absent; exemption policy is the caller's
    /// concern.
    pub fn sample_input_for(&self, key: &CapabilityKey) -> Result<Args, CatalogError> {
        self.entry(key)?;
        self.fixtures.sample_input(key)
    }

    /// Example output document for a known capability, unparsed.
    pub fn example_output_for(&self, key: &CapabilityKey) -> Result<Value, CatalogError> {
        self.entry(key)?;
        self.fixtures.example_output(key)
    }
}
