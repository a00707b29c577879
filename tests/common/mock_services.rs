//! Mock services for testing
//!
//! Fake and mock cluster gateways plus an in-memory entry lister, so the
//! apply use case can be exercised without kubectl.

use async_trait::async_trait;
use gk::common::result::GkResult;
use gk::common::GkError;
use gk::domain::entities::{Entry, Manifest};
use gk::domain::value_objects::NamespaceName;
use gk::infrastructure::filesystem::EntryLister;
use gk::infrastructure::kubernetes::{ClusterGateway, GatewayError};
use mockall::mock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Gateway that records every call and fails on demand
#[derive(Clone, Default)]
pub struct RecordingGateway {
    /// Call history for verification
    call_history: Arc<Mutex<Vec<String>>>,
    /// Namespace -> error message for failing ensure calls
    ensure_failures: Arc<Mutex<HashMap<String, String>>>,
    /// Relative manifest path -> error message for failing apply calls
    apply_failures: Arc<Mutex<HashMap<String, String>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ensure_namespace` fail for the namespace
    pub fn fail_ensure(self, namespace: &str, message: &str) -> Self {
        self.ensure_failures
            .lock()
            .unwrap()
            .insert(namespace.to_string(), message.to_string());
        self
    }

    /// Make `apply_manifest` fail for the manifest
    pub fn fail_apply(self, relative_path: &str, message: &str) -> Self {
        self.apply_failures
            .lock()
            .unwrap()
            .insert(relative_path.to_string(), message.to_string());
        self
    }

    /// Every call so far, e.g. `ensure team-a` or `apply team-a team-a/deploy.yaml`
    pub fn calls(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    /// Calls touching the namespace
    pub fn calls_for(&self, namespace: &str) -> Vec<String> {
        let ensure = format!("ensure {}", namespace);
        let apply = format!("apply {} ", namespace);
        self.calls()
            .into_iter()
            .filter(|c| *c == ensure || c.starts_with(&apply))
            .collect()
    }

    pub fn clear(&self) {
        self.call_history.lock().unwrap().clear();
    }
}

#[async_trait]
impl ClusterGateway for RecordingGateway {
    async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), GatewayError> {
        self.call_history
            .lock()
            .unwrap()
            .push(format!("ensure {}", namespace));

        match self.ensure_failures.lock().unwrap().get(namespace.as_str()) {
            Some(message) => Err(GatewayError::rejected(message.clone())),
            None => Ok(()),
        }
    }

    async fn apply_manifest(
        &self,
        namespace: &NamespaceName,
        manifest: &Manifest,
    ) -> Result<(), GatewayError> {
        self.call_history
            .lock()
            .unwrap()
            .push(format!("apply {} {}", namespace, manifest.relative_path()));

        match self.apply_failures.lock().unwrap().get(manifest.relative_path()) {
            Some(message) => Err(GatewayError::rejected(message.clone())),
            None => Ok(()),
        }
    }
}

/// Entry lister that returns a fixed set of entries
pub struct InMemoryLister {
    entries: Vec<Entry>,
}

impl InMemoryLister {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl EntryLister for InMemoryLister {
    fn list_entries(&self, _root: &Path) -> GkResult<Vec<Entry>> {
        Ok(self.entries.clone())
    }
}

/// Entry lister that always fails
pub struct FailingLister;

impl EntryLister for FailingLister {
    fn list_entries(&self, root: &Path) -> GkResult<Vec<Entry>> {
        Err(GkError::filesystem_error(
            "permission denied",
            Some(root.to_path_buf()),
        ))
    }
}

mock! {
    pub Gateway {}

    #[async_trait]
    impl ClusterGateway for Gateway {
        async fn ensure_namespace(&self, namespace: &NamespaceName) -> Result<(), GatewayError>;

        async fn apply_manifest(
            &self,
            namespace: &NamespaceName,
            manifest: &Manifest,
        ) -> Result<(), GatewayError>;
    }
}
