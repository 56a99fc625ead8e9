//! Idempotent declaration synchronizer
//!
//! Generators describe the declaration they want (a template plus the
//! elements that must exist in it); the synchronizer finds or creates it in
//! the target file and merges the elements in without disturbing anything
//! else. Re-running with the same inputs produces byte-identical files.

mod bootstrap;
mod conflict;
mod element;
mod engine;
mod locate;
mod matcher;
mod merge;
pub mod pipeline;


pub use bootstrap::{load, Bootstrap, FileOrigin, Loaded};
pub use conflict::{unified_diff, TemplateConflict};
pub use element::Element;
pub use engine::{SyncAction, SyncOutcome, SyncRequest, Synchronizer};
pub use locate::{declares, describe, locate, DeclKind};
pub use matcher::{literal_key, Matcher, Placement};
pub use merge::{ensure, merge, merge_decl, merge_imports, Keyed, MergeLog};
pub use pipeline::{GenerationPass, PassReport, Stage};
