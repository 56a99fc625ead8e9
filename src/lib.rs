//! Scaffold - idempotent synchronization engine for Go service scaffolding
//!
//! Generators describe the declarations a file must contain; the
//! synchronizer finds or creates each one in the file on disk, merges in
//! missing elements without touching hand-written code, and rewrites the
//! file only when its content changes. Running the same generation pass
//! twice leaves the project unchanged.

pub mod blueprints;
pub mod config;
pub mod error;
pub mod fs;
pub mod sync;
pub mod syntax;
pub mod telemetry;

// Re-exports for convenience
pub use blueprints::{entity_pass, Entity, EntityField, Layout};
pub use config::{Config, ParseErrorPolicy, SyncConfig};
pub use error::{ScaffoldError, ScaffoldResult};
pub use fs::{FileSystem, LocalFs};
pub use sync::{
    Bootstrap, DeclKind, Element, FileOrigin, GenerationPass, Matcher, PassReport, Placement,
    Stage, SyncAction, SyncOutcome, SyncRequest, Synchronizer,
};
pub use syntax::{format_source, parse_file, print_file, ParseError};
