pub mod error;
pub mod process;
pub mod request;

pub use error::WorkflowError;
pub use process::{
    CollectionResolver, DeferredReplication, NoCollections, PublishOutcome, PublishProcess,
    ReplicationAccess, ReplicationAction, ReplicationOptions, Replicator, WorkflowEventSink,
};
pub use request::PublishRequest;
