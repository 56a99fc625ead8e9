//! Template conflicts and diff rendering
//!
//! A conflict is an existing element that carries a desired element's key
//! but different content. The existing element always wins; conflicts are
//! only reported.

use std::fmt;

/// Existing element kept in place of a differing desired one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConflict {
    /// Declaration the element belongs to (`type Widget`)
    pub decl: String,
    /// Shared identity key
    pub key: String,
    /// Normalized text of the element on disk
    pub existing: String,
    /// Normalized text the template wanted
    pub desired: String,
}

impl fmt::Display for TemplateConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: kept existing {} `{}` (template wants `{}`)",
            self.decl, self.key, self.existing, self.desired
        )
    }
}

/// Generate a unified diff between old and new content.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    use similar::TextDiff;
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}
