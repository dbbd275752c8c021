use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pubset::ReferenceSearch;

use crate::error::WorkflowError;
use crate::request::PublishRequest;

/// Replication direction, passed at call time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplicationAction {
    Activate,
    Deactivate,
}

impl ReplicationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicationAction::Activate => "activate",
            ReplicationAction::Deactivate => "deactivate",
        }
    }
}

/// Options handed to the replicator per path.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicationOptions {
    /// Version label to replicate instead of the current state.
    pub revision: Option<String>,
}

/// Replication transport owned by the host.
pub trait Replicator: Send + Sync {
    fn replicate(
        &self,
        action: ReplicationAction,
        path: &str,
        options: &ReplicationOptions,
    ) -> Result<(), WorkflowError>;
}

/// Per-path replication permission check owned by the host. Hosts map
/// failures inside the check to a denial.
pub trait ReplicationAccess: Send + Sync {
    fn can_replicate(&self, path: &str) -> bool;
}

/// Escalation event raised for a path the requesting user may not replicate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeferredReplication {
    pub path: String,
    pub action: ReplicationAction,
    pub user_id: String,
}

/// Event bus seam for deferred replication requests.
pub trait WorkflowEventSink: Send + Sync {
    fn deferred_replication(&self, event: &DeferredReplication);
}

/// Named groups of related paths that are published together with a payload.
pub trait CollectionResolver: Send + Sync {
    fn collections_for(&self, path: &str) -> Vec<String>;
}

/// `CollectionResolver` for hosts without resource collections.
pub struct NoCollections;

impl CollectionResolver for NoCollections {
    fn collections_for(&self, _path: &str) -> Vec<String> {
        Vec::new()
    }
}

/// What one `run` did: which paths were handed to the replicator and which
/// were deferred to the escalation event bus.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishOutcome {
    pub replicated: Vec<String>,
    pub deferred: Vec<String>,
}

/// One concrete replication operation over the publish set of a payload path.
///
/// The action is a call-time value, so the same process serves activation and
/// deactivation workflows.
pub struct PublishProcess<S: ReferenceSearch> {
    search: S,
    replicator: Arc<dyn Replicator>,
    access: Arc<dyn ReplicationAccess>,
    events: Arc<dyn WorkflowEventSink>,
    collections: Arc<dyn CollectionResolver>,
}

impl<S: ReferenceSearch> PublishProcess<S> {
    pub fn new(
        search: S,
        replicator: Arc<dyn Replicator>,
        access: Arc<dyn ReplicationAccess>,
        events: Arc<dyn WorkflowEventSink>,
    ) -> Self {
        Self {
            search,
            replicator,
            access,
            events,
            collections: Arc::new(NoCollections),
        }
    }

    pub fn with_collections(mut self, collections: Arc<dyn CollectionResolver>) -> Self {
        self.collections = collections;
        self
    }

    /// Replicates the payload path together with everything it depends on.
    ///
    /// Candidates are the publish set of the payload, the payload itself and
    /// its resource-collection members, deduplicated in that order. Allowed
    /// paths go to the replicator with their mapped version label; denied
    /// paths raise a deferred replication event instead. Transport failures
    /// abort the run.
    pub fn run(
        &self,
        request: &PublishRequest,
        action: ReplicationAction,
    ) -> Result<PublishOutcome, WorkflowError> {
        if request.path.is_empty() {
            warn!("cannot replicate: request carries no payload path");
            return Ok(PublishOutcome::default());
        }

        let mut candidates = self.search.search(std::slice::from_ref(&request.path));
        candidates.push(request.path.clone());
        candidates.extend(self.collections.collections_for(&request.path));

        let mut seen = BTreeSet::new();
        candidates.retain(|path| seen.insert(path.clone()));

        let mut outcome = PublishOutcome::default();
        for path in candidates {
            if self.access.can_replicate(&path) {
                let options = ReplicationOptions {
                    revision: request.version_label(&path).map(str::to_string),
                };
                self.replicator.replicate(action, &path, &options)?;
                outcome.replicated.push(path);
            } else {
                debug!(
                    user = %request.requested_by,
                    path = %path,
                    action = action.as_str(),
                    "user is not allowed to replicate this path, issuing deferred request"
                );
                self.events.deferred_replication(&DeferredReplication {
                    path: path.clone(),
                    action,
                    user_id: request.requested_by.clone(),
                });
                outcome.deferred.push(path);
            }
        }

        Ok(outcome)
    }
}
