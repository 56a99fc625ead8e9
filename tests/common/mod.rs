//! Common test utilities for scaffold scenario tests.
//!
//! This module provides:
//! - `TestProject`: isolated project directory with a real synchronizer
//! - Fixtures: reusable Go sources and sync requests

pub mod fixtures;
pub mod project;

pub use fixtures::*;
pub use project::*;
