//! Capability keys and the operation naming contract.
//!
//! A capability is identified by `(feature, subfeature, phase)`. The phase
//! is present only for multi-step capabilities (the `launch_job` /
//! `get_job_result` pair) or multi-action ones (project-style actions such
//! as `create_project`). The derived operation name
//! `feature__subfeature[__phase]` is load-bearing: providers register
//! operations under it and the resolver looks them up by it.

use std::fmt;

/// Execution phase of a capability.
///
/// `LaunchJob` and `GetJobResult` are semantically special (the resolver
/// and the job adapter branch on them); any other phased capability is an
/// `Action` carrying its phase name as data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Single-step capability, no phase component in the operation name.
    None,
    /// Submits a long-running vendor job and returns a job token.
    LaunchJob,
    /// Polls a previously launched vendor job.
    GetJobResult,
    /// A named action phase, e.g. `create_project` or `upload_image`.
    Action(String),
}

impl Phase {
    /// Parse a phase from its wire string; the empty string means no phase.
    pub fn parse(s: &str) -> Self {
        match s {
            "" => Self::None,
            "launch_job" => Self::LaunchJob,
            "get_job_result" => Self::GetJobResult,
            other => Self::Action(other.to_string()),
        }
    }

    /// Wire representation; the empty string for [`Phase::None`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::LaunchJob => "launch_job",
            Self::GetJobResult => "get_job_result",
            Self::Action(name) => name,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier of one logical operation across all providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityKey {
    feature: String,
    subfeature: String,
    phase: Phase,
}

impl CapabilityKey {
    /// A phase-less capability such as `text/sentiment_analysis`.
    pub fn new(feature: impl Into<String>, subfeature: impl Into<String>) -> Self {
        Self::with_phase(feature, subfeature, Phase::None)
    }

    /// An action-phased capability such as `image/search/create_project`.
    pub fn action(
        feature: impl Into<String>,
        subfeature: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::with_phase(feature, subfeature, Phase::Action(action.into()))
    }

    pub fn with_phase(
        feature: impl Into<String>,
        subfeature: impl Into<String>,
        phase: Phase,
    ) -> Self {
        Self {
            feature: feature.into(),
            subfeature: subfeature.into(),
            phase,
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn subfeature(&self) -> &str {
        &self.subfeature
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The `(feature, subfeature)` pair shared by the phases of a
    /// multi-step capability.
    pub fn base(&self) -> CapabilityBase {
        CapabilityBase::new(self.feature.clone(), self.subfeature.clone())
    }

    /// Derived operation name: `feature__subfeature`, suffixed with
    /// `__phase` when a phase is present.
    pub fn operation_name(&self) -> String {
        match &self.phase {
            Phase::None => format!("{}__{}", self.feature, self.subfeature),
            phase => format!("{}__{}__{}", self.feature, self.subfeature, phase),
        }
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.feature, self.subfeature)?;
        if !self.phase.is_none() {
            write!(f, "/{}", self.phase)?;
        }
        Ok(())
    }
}

/// The `(feature, subfeature)` pair identifying a two-phase capability
/// independently of its phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct CapabilityBase {
    feature: String,
    subfeature: String,
}

impl CapabilityBase {
    pub fn new(feature: impl Into<String>, subfeature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            subfeature: subfeature.into(),
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn subfeature(&self) -> &str {
        &self.subfeature
    }

    /// The `launch_job` half of the pair.
    pub fn launch_key(&self) -> CapabilityKey {
        CapabilityKey::with_phase(self.feature.clone(), self.subfeature.clone(), Phase::LaunchJob)
    }

    /// The `get_job_result` half of the pair.
    pub fn result_key(&self) -> CapabilityKey {
        CapabilityKey::with_phase(
            self.feature.clone(),
            self.subfeature.clone(),
            Phase::GetJobResult,
        )
    }
}

impl fmt::Display for CapabilityBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.feature, self.subfeature)
    }
}

/// Which fixture documents a capability is expected to ship.
///
/// Action phases that only acknowledge (create/delete/upload-style) have
/// no example output; `create_project`-style phases take no arguments and
/// so have no sample input either. `get_job_result` is driven by a runtime
/// job token rather than a sample document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixturePolicy {
    pub requires_sample: bool,
    pub requires_output: bool,
}

impl FixturePolicy {
    pub fn for_phase(phase: &Phase) -> Self {
        match phase {
            Phase::None => Self {
                requires_sample: true,
                requires_output: true,
            },
            Phase::LaunchJob => Self {
                requires_sample: true,
                requires_output: false,
            },
            Phase::GetJobResult => Self {
                requires_sample: false,
                requires_output: true,
            },
            Phase::Action(action) => {
                let acknowledges = action.contains("create")
                    || action.contains("delete")
                    || action.contains("upload");
                Self {
                    requires_sample: action != "create_project",
                    requires_output: !acknowledges,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_name_without_phase() {
        let key = CapabilityKey::new("text", "sentiment_analysis");
        assert_eq!(key.operation_name(), "text__sentiment_analysis");
    }

    #[test]
    fn operation_name_with_phases() {
        let base = CapabilityBase::new("audio", "speech_to_text_async");
        assert_eq!(
            base.launch_key().operation_name(),
            "audio__speech_to_text_async__launch_job"
        );
        assert_eq!(
            base.result_key().operation_name(),
            "audio__speech_to_text_async__get_job_result"
        );
        assert_eq!(
            CapabilityKey::action("image", "search", "create_project").operation_name(),
            "image__search__create_project"
        );
    }

    #[test]
    fn phase_round_trips_through_wire_strings() {
        for raw in ["", "launch_job", "get_job_result", "upload_image"] {
            assert_eq!(Phase::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn job_phases_are_distinct_keys() {
        let base = CapabilityBase::new("audio", "speech_to_text_async");
        assert_ne!(base.launch_key(), base.result_key());
        assert_eq!(base.launch_key().base(), base.result_key().base());
    }

    #[test]
    fn fixture_policy_exemptions() {
        let create = FixturePolicy::for_phase(&Phase::Action("create_project".into()));
        assert!(!create.requires_sample);
        assert!(!create.requires_output);

        let upload = FixturePolicy::for_phase(&Phase::Action("upload_image".into()));
        assert!(upload.requires_sample);
        assert!(!upload.requires_output);

        let plain = FixturePolicy::for_phase(&Phase::None);
        assert!(plain.requires_sample);
        assert!(plain.requires_output);

        let launch = FixturePolicy::for_phase(&Phase::LaunchJob);
        assert!(launch.requires_sample);
        assert!(!launch.requires_output);

        let result = FixturePolicy::for_phase(&Phase::GetJobResult);
        assert!(!result.requires_sample);
        assert!(result.requires_output);
    }

    #[test]
    fn display_uses_slash_notation() {
        assert_eq!(
            CapabilityKey::new("text", "summarize").to_string(),
            "text/summarize"
        );
        assert_eq!(
            CapabilityKey::action("image", "search", "delete_image").to_string(),
            "image/search/delete_image"
        );
    }
}
