//! The async job adapter: the two-phase `launch_job` / `get_job_result`
//! vendor pattern behind stable, idempotently pollable handles.
//!
//! `launch` resolves and invokes the `launch_job` operation and wraps the
//! vendor's job token into a pending handle. `poll` is non-blocking at
//! this level: each call returns immediately with `Pending` or the
//! terminal outcome. Once terminal, the outcome is cached per handle and
//! replayed on every subsequent poll — the vendor is never called again.
//! Concurrent polls of the same handle serialize on a per-handle mutex so
//! at most one vendor call is in flight; distinct handles do not contend.
//!
//! There is no cancellation primitive: a caller abandoning a job simply
//! stops polling, and handle lifetime stays caller-managed (see
//! [`JobAdapter::forget`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::capability::{CapabilityBase, Phase};
use crate::error::{InvokeError, JobError};
use crate::resolver::Resolver;
use crate::types::{Args, OperationOutcome, ResponseEnvelope};

/// Adapter-issued job identifier, stable across polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle state of a job handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// A launched job: adapter identifier plus the pair that created it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobHandle {
    pub id: JobId,
    pub provider: String,
    pub capability: CapabilityBase,
    pub created_at: DateTime<Utc>,
}

/// Result of one poll: the vendor is either still working or done.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Pending,
    Succeeded(ResponseEnvelope),
}

impl PollOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn into_response(self) -> Option<ResponseEnvelope> {
        match self {
            Self::Succeeded(envelope) => Some(envelope),
            Self::Pending => None,
        }
    }
}

enum SlotState {
    Pending,
    Done(Result<ResponseEnvelope, InvokeError>),
}

struct JobSlot {
    handle: JobHandle,
    /// The vendor's own job identifier, passed back on every poll.
    token: String,
    state: Mutex<SlotState>,
}

/// Uniform wrapper over providers' two-call job pattern.
pub struct JobAdapter {
    resolver: Resolver,
    slots: RwLock<HashMap<JobId, Arc<JobSlot>>>,
}

impl JobAdapter {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Launch a two-phase job: resolve the `launch_job` operation, invoke
    /// it, and wrap the vendor token into a pending handle.
    pub async fn launch(
        &self,
        provider: &str,
        capability: &CapabilityBase,
        args: &Args,
    ) -> Result<JobHandle, JobError> {
        let bound = self.resolver.resolve(&capability.launch_key(), provider)?;
        match bound.invoke(args).await? {
            OperationOutcome::JobLaunched { provider_job_id } => {
                let handle = JobHandle {
                    id: JobId::new(),
                    provider: provider.to_string(),
                    capability: capability.clone(),
                    created_at: Utc::now(),
                };
                let slot = Arc::new(JobSlot {
                    handle: handle.clone(),
                    token: provider_job_id,
                    state: Mutex::new(SlotState::Pending),
                });
                self.write_slots().insert(handle.id, slot);
                tracing::info!(
                    job = %handle.id,
                    provider = %provider,
                    capability = %capability,
                    "launched job"
                );
                Ok(handle)
            }
            _ => Err(JobError::NotAJobOperation {
                operation: bound.name().to_string(),
                phase: Phase::LaunchJob,
            }),
        }
    }

    /// Poll a job. Returns `Pending` while the vendor is working; once
    /// terminal, replays the cached outcome without calling the vendor.
    pub async fn poll(&self, id: JobId) -> Result<PollOutcome, JobError> {
        let slot = self.slot(id)?;
        let mut state = slot.state.lock().await;

        if let SlotState::Done(outcome) = &*state {
            return match outcome {
                Ok(envelope) => Ok(PollOutcome::Succeeded(envelope.clone())),
                Err(error) => Err(JobError::Invoke(error.clone())),
            };
        }

        let bound = self
            .resolver
            .resolve(&slot.handle.capability.result_key(), &slot.handle.provider)?;
        let mut args = Args::new();
        args.insert(
            "provider_job_id".to_string(),
            Value::String(slot.token.clone()),
        );

        match bound.invoke(&args).await {
            Ok(OperationOutcome::JobPending) => Ok(PollOutcome::Pending),
            Ok(OperationOutcome::Response(envelope)) => {
                *state = SlotState::Done(Ok(envelope.clone()));
                tracing::info!(job = %id, provider = %slot.handle.provider, "job succeeded");
                Ok(PollOutcome::Succeeded(envelope))
            }
            Ok(_) => Err(JobError::NotAJobOperation {
                operation: bound.name().to_string(),
                phase: Phase::GetJobResult,
            }),
            Err(error) => {
                *state = SlotState::Done(Err(error.clone()));
                tracing::info!(job = %id, provider = %slot.handle.provider, %error, "job failed");
                Err(JobError::Invoke(error))
            }
        }
    }

    /// Current status of a handle.
    pub async fn status(&self, id: JobId) -> Result<JobStatus, JobError> {
        let slot = self.slot(id)?;
        let state = slot.state.lock().await;
        Ok(match &*state {
            SlotState::Pending => JobStatus::Pending,
            SlotState::Done(Ok(_)) => JobStatus::Succeeded,
            SlotState::Done(Err(_)) => JobStatus::Failed,
        })
    }

    pub fn handle(&self, id: JobId) -> Option<JobHandle> {
        self.read_slots().get(&id).map(|slot| slot.handle.clone())
    }

    /// Drop a handle's state. Returns whether the handle was known.
    pub fn forget(&self, id: JobId) -> bool {
        self.write_slots().remove(&id).is_some()
    }

    fn slot(&self, id: JobId) -> Result<Arc<JobSlot>, JobError> {
        self.read_slots()
            .get(&id)
            .cloned()
            .ok_or(JobError::UnknownHandle(id))
    }

    fn read_slots(&self) -> std::sync::RwLockReadGuard<'_, HashMap<JobId, Arc<JobSlot>>> {
        // Slot map poisoning would mean a panic while holding the lock;
        // the map itself is always in a consistent state.
        self.slots.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slots(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<JobId, Arc<JobSlot>>> {
        self.slots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for JobAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobAdapter")
            .field("jobs", &self.read_slots().len())
            .finish()
    }
}
