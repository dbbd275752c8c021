use thiserror::Error;

/// High-level error type shared across publish-set components.
///
/// Missing resources are never errors; they resolve to `None` and contribute
/// nothing. Providers fail with `Provider`, which the search isolates.
#[derive(Debug, Error)]
pub enum PubsetError {
    #[error("provider error: {0}")]
    Provider(String),
}
