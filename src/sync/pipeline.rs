//! Ordered generation pass
//!
//! A pass is an explicit list of named stages, each holding sync requests.
//! Stages and requests run strictly in order; the first failure stops the
//! pass. Files written before the failure stay on disk.

use anyhow::{Context, Result};

use crate::fs::FileSystem;

use super::engine::{SyncOutcome, SyncRequest, Synchronizer};

/// A named group of sync requests (one generator)
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub requests: Vec<SyncRequest>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
        }
    }

    pub fn with_request(mut self, request: SyncRequest) -> Self {
        self.requests.push(request);
        self
    }
}

/// Explicit ordered pipeline of stages
#[derive(Debug, Clone, Default)]
pub struct GenerationPass {
    stages: Vec<Stage>,
}

/// Outcomes of a successful pass, in execution order
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub outcomes: Vec<(String, SyncOutcome)>,
}

impl PassReport {
    /// Number of files actually written
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.written).count()
    }

    /// Did any sync change a file?
    pub fn changed(&self) -> bool {
        self.outcomes.iter().any(|(_, o)| o.changed)
    }

    pub fn conflicts(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.conflicts.len()).sum()
    }

    pub fn unplaced(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.unplaced.len()).sum()
    }
}

impl GenerationPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Append all stages of another pass after this one's.
    pub fn extend(&mut self, other: GenerationPass) {
        self.stages.extend(other.stages);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.iter().map(|s| s.requests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every request in order, stopping at the first failure.
    pub fn run<FS: FileSystem>(&self, sync: &Synchronizer<FS>) -> Result<PassReport> {
        let mut report = PassReport::default();
        for stage in &self.stages {
            let _span = tracing::info_span!("stage", name = %stage.name).entered();
            for request in &stage.requests {
                let outcome = sync.sync(request).with_context(|| {
                    format!(
                        "stage '{}': failed to sync {} in {}",
                        stage.name,
                        request.describe(),
                        request.path.display()
                    )
                })?;
                report.outcomes.push((stage.name.clone(), outcome));
            }
        }
        tracing::info!(
            syncs = report.outcomes.len(),
            written = report.written(),
            conflicts = report.conflicts(),
            "generation pass finished"
        );
        Ok(report)
    }
}
