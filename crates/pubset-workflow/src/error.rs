use thiserror::Error;

/// Errors surfaced by the replication driver.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("replication error: {0}")]
    Replication(String),
    #[error("metadata error: {0}")]
    Metadata(String),
}
