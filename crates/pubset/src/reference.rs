use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::PubsetError;
use crate::repository::Resource;

/// A discovered dependency of a content item: the dependent resource path and
/// when it was last modified.
///
/// Identity is the path alone. Equality and ordering ignore the timestamp, so
/// an ordered set holds at most one reference per path and keeps the first
/// inserted entry when providers disagree on the timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reference {
    path: String,
    last_modified_ms: i64,
}

impl Reference {
    pub fn new(path: impl Into<String>, last_modified_ms: i64) -> Self {
        Self {
            path: path.into(),
            last_modified_ms,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn last_modified_ms(&self) -> i64 {
        self.last_modified_ms
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Reference {}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pluggable source of outbound references for a resource.
///
/// Providers are host integrations (assets, tags, included fragments) and may
/// fail; a failing provider is isolated by the search rather than aborting it.
pub trait ReferenceProvider: Send + Sync {
    fn find_references(&self, resource: &Resource) -> Result<Vec<Reference>, PubsetError>;
}

/// Shared add/remove registry of reference providers.
///
/// Registration may happen while a search is running. Searches iterate a
/// snapshot taken under the lock, never the live collection.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Arc<RwLock<Vec<Arc<dyn ReferenceProvider>>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, provider: Arc<dyn ReferenceProvider>) {
        self.providers.write().push(provider);
    }

    /// Removes a previously registered provider, matched by pointer identity.
    pub fn deregister(&self, provider: &Arc<dyn ReferenceProvider>) {
        self.providers
            .write()
            .retain(|registered| !Arc::ptr_eq(registered, provider));
    }

    /// Stable copy of the currently registered providers.
    pub fn snapshot(&self) -> Vec<Arc<dyn ReferenceProvider>> {
        self.providers.read().clone()
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    struct NoReferences;

    impl ReferenceProvider for NoReferences {
        fn find_references(&self, _resource: &Resource) -> Result<Vec<Reference>, PubsetError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn ordering_follows_the_path() {
        let b = Reference::new("/content/b", 5);
        let a = Reference::new("/content/a", 500);
        assert!(a < b);
    }

    #[test]
    fn equality_ignores_the_timestamp() {
        let first = Reference::new("/content/a", 100);
        let second = Reference::new("/content/a", 900);
        assert_eq!(first, second);
    }

    #[test]
    fn ordered_set_keeps_the_first_timestamp_per_path() {
        let mut set = BTreeSet::new();
        set.insert(Reference::new("/content/a", 100));
        set.insert(Reference::new("/content/a", 900));

        assert_eq!(set.len(), 1);
        let kept = set.iter().next().expect("one entry");
        assert_eq!(kept.last_modified_ms(), 100);
    }

    #[test]
    fn deregister_removes_by_identity() {
        let registry = ProviderRegistry::new();
        let first: Arc<dyn ReferenceProvider> = Arc::new(NoReferences);
        let second: Arc<dyn ReferenceProvider> = Arc::new(NoReferences);

        registry.register(first.clone());
        registry.register(second.clone());
        assert_eq!(registry.len(), 2);

        registry.deregister(&first);
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.snapshot()[0], &second));
    }

    #[test]
    fn snapshot_is_isolated_from_later_registration() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(NoReferences));

        let snapshot = registry.snapshot();
        registry.register(Arc::new(NoReferences));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
