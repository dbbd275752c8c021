use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::expansion;
use crate::reference::{ProviderRegistry, Reference};
use crate::repository::ContentRepository;
use crate::staleness;

/// Child resource holding the authored content of a page.
pub const CONTENT_CHILD: &str = "content";

/// Computes the publish set for a group of seed paths.
pub trait ReferenceSearch: Send + Sync {
    /// Returns the deduplicated, lexicographically ordered paths that still
    /// need publishing so the seeds render completely on the delivery side.
    fn search(&self, paths: &[String]) -> Vec<String>;
}

impl<S> ReferenceSearch for Arc<S>
where
    S: ReferenceSearch,
{
    fn search(&self, paths: &[String]) -> Vec<String> {
        (**self).search(paths)
    }
}

/// `ReferenceSearch` over a content repository and a provider registry.
pub struct RepositoryReferenceSearch<R: ContentRepository> {
    repository: R,
    providers: ProviderRegistry,
}

impl<R: ContentRepository> RepositoryReferenceSearch<R> {
    pub fn new(repository: R, providers: ProviderRegistry) -> Self {
        Self {
            repository,
            providers,
        }
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }
}

impl<R: ContentRepository> ReferenceSearch for RepositoryReferenceSearch<R> {
    fn search(&self, paths: &[String]) -> Vec<String> {
        if paths.is_empty() {
            return Vec::new();
        }

        // Extend the seeds by structural template paths, then drop repeats
        // while keeping the first occurrence.
        let mut working: Vec<String> = paths.to_vec();
        working.extend(expansion::expand(&self.repository, paths));

        let mut seen = BTreeSet::new();
        working.retain(|path| seen.insert(path.clone()));

        let mut references: BTreeSet<Reference> = BTreeSet::new();
        for path in &working {
            if path.is_empty() {
                continue;
            }

            // Page content lives on the content child; fall back to the path
            // itself for resources without one.
            let resource = self
                .repository
                .resolve(&format!("{path}/{CONTENT_CHILD}"))
                .or_else(|| self.repository.resolve(path));
            let Some(resource) = resource else {
                continue;
            };

            for provider in self.providers.snapshot() {
                match provider.find_references(&resource) {
                    Ok(found) => references.extend(found),
                    Err(err) => warn!(
                        path = resource.path(),
                        error = %err,
                        "reference provider failed, continuing with the remaining providers"
                    ),
                }
            }
        }

        staleness::filter_candidates(&self.repository, &references)
    }
}
