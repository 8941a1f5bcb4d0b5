//! Mutation coordinator: executes writes and reconciles the cache.
//!
//! No optimistic updates. A successful write invalidates every cache key
//! it affects so the next read repopulates from the server, which keeps
//! server-assigned ids and ordering authoritative. Failures are surfaced
//! to the caller and never retried here.

mod intent;
mod reducer;
mod state;

pub use intent::MutationIntent;
pub use reducer::MutationReducer;
pub use state::{MutationState, Operation};

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::Api;
use crate::error::ClientError;
use crate::models::{EntityId, Profile, ProjectDraft, ProjectInput, Service};
use crate::mvi::Reducer;
use crate::queries::{Cache, CacheKey};

/// A write against the portfolio API.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    UpdateProfile(Profile),
    CreateProject(ProjectInput),
    UpdateProject { id: EntityId, input: ProjectInput },
    DeleteProject(EntityId),
    /// Services have no per-item ids; the whole list is sent.
    ReplaceServices(Vec<Service>),
    DeleteMessage(EntityId),
}

impl Mutation {
    /// Create or update, depending on whether the draft has an id.
    pub fn save_project(draft: &ProjectDraft) -> Self {
        let input = draft.to_input();
        match &draft.id {
            Some(id) => Mutation::UpdateProject {
                id: id.clone(),
                input,
            },
            None => Mutation::CreateProject(input),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Mutation::CreateProject(_) => Operation::Create,
            Mutation::UpdateProfile(_)
            | Mutation::UpdateProject { .. }
            | Mutation::ReplaceServices(_) => Operation::Update,
            Mutation::DeleteProject(_) | Mutation::DeleteMessage(_) => Operation::Delete,
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            Mutation::UpdateProfile(_) => "profile",
            Mutation::CreateProject(_)
            | Mutation::UpdateProject { .. }
            | Mutation::DeleteProject(_) => "project",
            Mutation::ReplaceServices(_) => "services",
            Mutation::DeleteMessage(_) => "message",
        }
    }

    /// Keys whose cached value is stale once this write succeeds.
    ///
    /// Item writes invalidate the whole collection. Writes that change a
    /// count also invalidate the dashboard stats.
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            Mutation::UpdateProfile(_) => vec![CacheKey::Profile],
            Mutation::CreateProject(_)
            | Mutation::UpdateProject { .. }
            | Mutation::DeleteProject(_) => vec![CacheKey::Projects, CacheKey::DashboardStats],
            Mutation::ReplaceServices(_) => vec![CacheKey::Services, CacheKey::DashboardStats],
            Mutation::DeleteMessage(_) => vec![CacheKey::Messages, CacheKey::DashboardStats],
        }
    }
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReceipt {
    pub operation: Operation,
    pub invalidated: Vec<CacheKey>,
}

/// Runs writes for one view and tracks their lifecycle.
#[derive(Clone)]
pub struct MutationCoordinator {
    api: Api,
    cache: Cache,
    state: Arc<Mutex<MutationState>>,
}

impl MutationCoordinator {
    pub fn new(api: Api, cache: Cache) -> Self {
        Self {
            api,
            cache,
            state: Arc::new(Mutex::new(MutationState::Idle)),
        }
    }

    pub fn state(&self) -> MutationState {
        self.state.lock().clone()
    }

    /// Clear a finished outcome so the view returns to idle.
    pub fn acknowledge(&self) {
        self.dispatch(MutationIntent::Acknowledge);
    }

    pub async fn mutate(&self, mutation: Mutation) -> Result<MutationReceipt, ClientError> {
        let operation = mutation.operation();
        self.dispatch(MutationIntent::Started { operation });
        tracing::debug!(
            operation = operation.as_str(),
            entity = mutation.entity(),
            "Mutation started"
        );

        match self.execute(&mutation).await {
            Ok(()) => {
                let invalidated = mutation.affected_keys();
                self.cache.invalidate_many(&invalidated);
                self.dispatch(MutationIntent::Completed { operation });
                tracing::info!(
                    operation = operation.as_str(),
                    entity = mutation.entity(),
                    "Mutation succeeded"
                );
                Ok(MutationReceipt {
                    operation,
                    invalidated,
                })
            }
            Err(err) => {
                tracing::warn!(
                    operation = operation.as_str(),
                    entity = mutation.entity(),
                    error_type = err.error_type(),
                    error = %err,
                    "Mutation failed"
                );
                self.dispatch(MutationIntent::Rejected {
                    operation,
                    error: err.clone(),
                });
                Err(err)
            }
        }
    }

    async fn execute(&self, mutation: &Mutation) -> Result<(), ClientError> {
        match mutation {
            Mutation::UpdateProfile(profile) => self.api.update_profile(profile).await,
            Mutation::CreateProject(input) => self.api.create_project(input).await,
            Mutation::UpdateProject { id, input } => self.api.update_project(id, input).await,
            Mutation::DeleteProject(id) => self.api.delete_project(id).await,
            Mutation::ReplaceServices(services) => self.api.replace_services(services).await,
            Mutation::DeleteMessage(id) => self.api.delete_message(id).await,
        }
    }

    fn dispatch(&self, intent: MutationIntent) {
        let mut state = self.state.lock();
        let current = std::mem::take(&mut *state);
        *state = MutationReducer::reduce(current, intent);
    }
}
