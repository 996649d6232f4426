//! Fixture store: sample inputs and example outputs on disk, addressed
//! by capability key.
//!
//! Layout: `<root>/<feature>/<subfeature>[/<phase>]/sample_input.json`
//! and `example_output.json`. The documents are owned by collaborators
//! and read-only to the core.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::capability::CapabilityKey;
use crate::error::{CatalogError, FixtureKind};
use crate::types::Args;

const SAMPLE_INPUT_FILE: &str = "sample_input.json";
const EXAMPLE_OUTPUT_FILE: &str = "example_output.json";

#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, key: &CapabilityKey) -> PathBuf {
        let mut dir = self.root.join(key.feature()).join(key.subfeature());
        if !key.phase().is_none() {
            dir.push(key.phase().as_str());
        }
        dir
    }

    fn read(&self, key: &CapabilityKey, kind: FixtureKind, file: &str) -> Result<Value, CatalogError> {
        let path = self.dir_for(key).join(file);
        let raw = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CatalogError::MissingFixture {
                    capability: key.clone(),
                    kind,
                }
            } else {
                CatalogError::MalformedFixture {
                    capability: key.clone(),
                    kind,
                    message: format!("cannot read `{}`: {source}", path.display()),
                }
            }
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::MalformedFixture {
            capability: key.clone(),
            kind,
            message: format!("`{}` is not valid JSON: {source}", path.display()),
        })
    }

    /// The sample argument document for a capability, as an argument map.
    pub fn sample_input(&self, key: &CapabilityKey) -> Result<Args, CatalogError> {
        match self.read(key, FixtureKind::SampleInput, SAMPLE_INPUT_FILE)? {
            Value::Object(map) => Ok(map),
            _ => Err(CatalogError::MalformedFixture {
                capability: key.clone(),
                kind: FixtureKind::SampleInput,
                message: "sample input must be a JSON object".to_string(),
            }),
        }
    }

    /// The example output document for a capability, unparsed; callers
    /// check it against the envelope shape.
    pub fn example_output(&self, key: &CapabilityKey) -> Result<Value, CatalogError> {
        self.read(key, FixtureKind::ExampleOutput, EXAMPLE_OUTPUT_FILE)
    }
}
