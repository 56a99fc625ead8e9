//! Isolated project directory for end-to-end syncs.

use std::fs;
use std::path::PathBuf;

use scaffold::{SyncConfig, SyncOutcome, SyncRequest, Synchronizer};
use tempfile::TempDir;

/// A temporary Go project synced through `LocalFs`
pub struct TestProject {
    pub root: TempDir,
    pub sync: Synchronizer,
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_options(SyncConfig::default())
    }

    pub fn with_options(options: SyncConfig) -> Self {
        Self {
            root: TempDir::new().unwrap(),
            sync: Synchronizer::new(options),
        }
    }

    /// Path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Run one sync, panicking with the error on failure
    pub fn run(&self, request: &SyncRequest) -> SyncOutcome {
        self.sync
            .sync(request)
            .unwrap_or_else(|e| panic!("sync of {} failed: {}", request.describe(), e))
    }
}
