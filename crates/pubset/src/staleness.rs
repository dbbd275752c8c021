use std::collections::BTreeSet;

use tracing::debug;

use crate::reference::Reference;
use crate::repository::ContentRepository;

/// Filters the ordered reference set down to publish candidates.
///
/// A reference survives when its resource was never published or was modified
/// after its last publish. Equal timestamps are not stale. A reference whose
/// resource no longer resolves or carries no status is treated as unpublished
/// and survives. Output order follows the input set, ascending by path.
pub fn filter_candidates<R: ContentRepository>(
    repository: &R,
    references: &BTreeSet<Reference>,
) -> Vec<String> {
    let mut candidates = Vec::new();

    for reference in references {
        let mut published = false;
        let mut outdated = false;
        let mut last_published_ms = 0;

        if let Some(resource) = repository.resolve(reference.path()) {
            if let Some(status) = repository.publish_status(&resource) {
                published = status.is_published();
                if published {
                    last_published_ms = status.last_published_ms;
                    outdated = last_published_ms < reference.last_modified_ms();
                }
            }

            debug!(
                path = reference.path(),
                published,
                outdated,
                last_published_ms,
                last_modified_ms = reference.last_modified_ms(),
                "considering reference"
            );
        }

        if !published || outdated {
            candidates.push(reference.path().to_string());
        }
    }

    candidates
}
