use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Handle to a resolved content node.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Resource {
    path: String,
}

impl Resource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Page view of a resource: optionally bound to the template it is based on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Page {
    pub template_path: Option<String>,
}

/// Template view of a resource.
///
/// Templates with structure support share their structure through a dedicated
/// child resource and must be published along with the pages built on them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub path: String,
    pub structure_support: bool,
}

/// Last known replication state of a resource, as recorded by the host.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PublishStatus {
    pub delivered: bool,
    pub activated: bool,
    pub last_published_ms: i64,
}

impl PublishStatus {
    pub fn is_published(&self) -> bool {
        self.delivered || self.activated
    }
}

/// Read-only seam to the host content store.
///
/// Resolution is soft: a path that does not name a resource yields `None` and
/// is never an error. The typed lookups replace the host's adaptation
/// mechanism with explicit optional views.
pub trait ContentRepository: Send + Sync {
    fn resolve(&self, path: &str) -> Option<Resource>;
    fn try_as_page(&self, resource: &Resource) -> Option<Page>;
    fn try_as_template(&self, resource: &Resource) -> Option<Template>;
    fn publish_status(&self, resource: &Resource) -> Option<PublishStatus>;
}

impl<R> ContentRepository for Arc<R>
where
    R: ContentRepository,
{
    fn resolve(&self, path: &str) -> Option<Resource> {
        (**self).resolve(path)
    }

    fn try_as_page(&self, resource: &Resource) -> Option<Page> {
        (**self).try_as_page(resource)
    }

    fn try_as_template(&self, resource: &Resource) -> Option<Template> {
        (**self).try_as_template(resource)
    }

    fn publish_status(&self, resource: &Resource) -> Option<PublishStatus> {
        (**self).publish_status(resource)
    }
}

/// In-memory `ContentRepository` used by tests and by hosts that mirror a
/// content tree into memory.
#[derive(Default)]
pub struct InMemoryRepository {
    resources: BTreeSet<String>,
    pages: BTreeMap<String, Page>,
    templates: BTreeMap<String, Template>,
    statuses: BTreeMap<String, PublishStatus>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plain resource.
    pub fn add_resource(&mut self, path: impl Into<String>) {
        self.resources.insert(path.into());
    }

    /// Registers a page, optionally bound to a template path.
    pub fn add_page(&mut self, path: impl Into<String>, template_path: Option<&str>) {
        let path = path.into();
        self.pages.insert(
            path.clone(),
            Page {
                template_path: template_path.map(str::to_string),
            },
        );
        self.resources.insert(path);
    }

    /// Registers a template. A structure child, when the template carries one,
    /// is registered separately as a resource under the template path.
    pub fn add_template(&mut self, path: impl Into<String>, structure_support: bool) {
        let path = path.into();
        self.templates.insert(
            path.clone(),
            Template {
                path: path.clone(),
                structure_support,
            },
        );
        self.resources.insert(path);
    }

    pub fn set_status(&mut self, path: impl Into<String>, status: PublishStatus) {
        self.statuses.insert(path.into(), status);
    }
}

impl ContentRepository for InMemoryRepository {
    fn resolve(&self, path: &str) -> Option<Resource> {
        self.resources.contains(path).then(|| Resource::new(path))
    }

    fn try_as_page(&self, resource: &Resource) -> Option<Page> {
        self.pages.get(resource.path()).cloned()
    }

    fn try_as_template(&self, resource: &Resource) -> Option<Template> {
        self.templates.get(resource.path()).cloned()
    }

    fn publish_status(&self, resource: &Resource) -> Option<PublishStatus> {
        self.statuses.get(resource.path()).copied()
    }
}
