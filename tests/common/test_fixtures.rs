//! Test fixtures for creating manifest trees on disk

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A manifest tree inside a temporary directory
pub struct ManifestTree {
    dir: TempDir,
}

impl ManifestTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// The standard layout used across tests:
    /// two namespaces, one nested manifest and one ignored root file
    pub fn standard() -> Self {
        Self::new()
            .with_file("team-a/deploy.yaml", "kind: Deployment\n")
            .with_file("team-a/sub/svc.yml", "kind: Service\n")
            .with_file("team-b/cfg.YAML", "kind: ConfigMap\n")
            .with_file("readme.txt", "not a manifest\n")
    }

    /// Add a file, creating parent directories as needed
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        self
    }

    /// Add an empty directory
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(relative)).expect("Failed to create directory");
        self
    }

    /// Root of the tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for ManifestTree {
    fn default() -> Self {
        Self::new()
    }
}
