use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pubset::CONTENT_CHILD;

use crate::error::WorkflowError;

/// One replication request handed over by the workflow engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    /// Payload path of the work item.
    pub path: String,
    /// User the workflow runs for; carried into deferred escalation events.
    pub requested_by: String,
    /// Version labels per path, taken from the work item metadata.
    pub versions: BTreeMap<String, String>,
}

impl PublishRequest {
    pub fn new(path: impl Into<String>, requested_by: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requested_by: requested_by.into(),
            versions: BTreeMap::new(),
        }
    }

    /// Parses the version map from its raw metadata form, a JSON object of
    /// path to version label.
    pub fn with_versions_json(mut self, raw: &str) -> Result<Self, WorkflowError> {
        self.versions = serde_json::from_str(raw)
            .map_err(|err| WorkflowError::Metadata(format!("invalid versions map: {err}")))?;
        Ok(self)
    }

    /// Version label for a path. Labels are usually recorded against the
    /// content child, so a bare path falls back to that entry.
    pub fn version_label(&self, path: &str) -> Option<&str> {
        if path.is_empty() {
            return None;
        }
        if let Some(label) = self.versions.get(path) {
            return Some(label.as_str());
        }

        let suffix = format!("/{CONTENT_CHILD}");
        if path.ends_with(&suffix) {
            return None;
        }
        self.versions
            .get(&format!("{path}{suffix}"))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_parse_from_metadata_json() {
        let request = PublishRequest::new("/content/site/news", "author")
            .with_versions_json(r#"{"/content/site/news/content": "1.2"}"#)
            .expect("valid versions map");

        assert_eq!(
            request.versions.get("/content/site/news/content"),
            Some(&"1.2".to_string())
        );
    }

    #[test]
    fn invalid_versions_json_is_a_metadata_error() {
        let err = PublishRequest::new("/content/site/news", "author")
            .with_versions_json("not-json")
            .expect_err("expected metadata error");

        assert!(matches!(err, WorkflowError::Metadata(_)));
    }

    #[test]
    fn version_label_prefers_the_exact_path() {
        let request = PublishRequest::new("/content/a", "author")
            .with_versions_json(r#"{"/content/a": "2.0", "/content/a/content": "1.0"}"#)
            .expect("valid versions map");

        assert_eq!(request.version_label("/content/a"), Some("2.0"));
    }

    #[test]
    fn version_label_falls_back_to_the_content_child() {
        let request = PublishRequest::new("/content/a", "author")
            .with_versions_json(r#"{"/content/a/content": "1.0"}"#)
            .expect("valid versions map");

        assert_eq!(request.version_label("/content/a"), Some("1.0"));
    }

    #[test]
    fn content_child_path_does_not_fall_back_onto_itself() {
        let request = PublishRequest::new("/content/a", "author");

        assert_eq!(request.version_label("/content/a/content"), None);
        assert_eq!(request.version_label(""), None);
    }
}
