//! File synchronizer
//!
//! One sync call is a full read, merge, print and write cycle for a single
//! declaration:
//!
//! 1. Load: parse the target file, or start from the bootstrap tree
//! 2. Imports: merge the request's imports into the import declaration
//! 3. Locate: find the declaration by kind and name
//! 4. Merge: insert the template when missing, then merge desired elements
//! 5. Write: print the tree and write it when the bytes changed
//!
//! ## Usage
//!
//! ```ignore
//! let sync = Synchronizer::from_config(&config.sync);
//! let outcome = sync.sync(&request)?;
//! println!("{} appended", outcome.appended.len());
//! ```

use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::fs::{FileSystem, LocalFs};
use crate::syntax::{
    parse_decl, print_file, Decl, ImportDecl, ImportSpec, Item, SourceFile,
};

use super::bootstrap::{load, Bootstrap, FileOrigin};
use super::conflict::{unified_diff, TemplateConflict};
use super::element::Element;
use super::locate::{declares, describe, locate, DeclKind};
use super::merge::{merge_decl, merge_imports, MergeLog};

/// Everything one sync needs: where, what, and the canonical shape
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub path: PathBuf,
    pub kind: DeclKind,
    /// Locator name; import path for [`DeclKind::Import`]
    pub name: String,
    pub bootstrap: Bootstrap,
    /// Imports the declaration needs, ensured in every sync
    pub imports: Vec<ImportSpec>,
    /// Declaration inserted verbatim when none exists
    pub template: Decl,
    /// Elements that must exist in the declaration
    pub elements: Vec<Element>,
}

impl SyncRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        kind: DeclKind,
        name: impl Into<String>,
        bootstrap: Bootstrap,
        template: Decl,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            name: name.into(),
            bootstrap,
            imports: Vec::new(),
            template,
            elements: Vec::new(),
        }
    }

    /// Build a request whose template is given as Go source.
    pub fn from_source(
        path: impl Into<PathBuf>,
        kind: DeclKind,
        name: impl Into<String>,
        bootstrap: Bootstrap,
        template: &str,
    ) -> ScaffoldResult<Self> {
        let name = name.into();
        let template = parse_decl(template).map_err(|source| ScaffoldError::Template {
            name: format!("{} {}", kind, name),
            source,
        })?;
        Ok(Self::new(path, kind, name, bootstrap, template))
    }

    pub fn with_import(mut self, spec: ImportSpec) -> Self {
        self.imports.push(spec);
        self
    }

    pub fn with_imports(mut self, specs: impl IntoIterator<Item = ImportSpec>) -> Self {
        self.imports.extend(specs);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// `type Widget`, `func NewWidget`
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind, self.name)
    }

    fn check_template(&self) -> ScaffoldResult<()> {
        if declares(&self.template, self.kind, &self.name) {
            return Ok(());
        }
        Err(ScaffoldError::TemplateMismatch {
            expected: self.describe(),
            found: describe(&self.template),
        })
    }
}

/// Whether the declaration was inserted or already existed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Merged,
}

/// What one sync did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub decl: String,
    pub action: SyncAction,
    pub origin: FileOrigin,
    /// Keys of elements appended by the merge
    pub appended: Vec<String>,
    pub conflicts: Vec<TemplateConflict>,
    /// Elements whose target was not found
    pub unplaced: Vec<String>,
    /// Printed content differs from what was on disk
    pub changed: bool,
    pub written: bool,
    previous: String,
    content: String,
}

impl SyncOutcome {
    pub fn bootstrapped(&self) -> bool {
        self.origin.is_bootstrapped()
    }

    /// The file content after the sync
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Unified diff from the previous file content to the new one.
    pub fn diff(&self) -> String {
        unified_diff(
            &self.path.display().to_string(),
            &self.previous,
            &self.content,
        )
    }
}

/// Find-or-create-then-merge engine
///
/// Generic over `FS: FileSystem`, defaulting to [`LocalFs`]. Use
/// [`Synchronizer::new_with_fs`] to run against another filesystem.
#[derive(Debug, Clone)]
pub struct Synchronizer<FS: FileSystem = LocalFs> {
    fs: FS,
    options: SyncConfig,
}

impl<FS: FileSystem> Synchronizer<FS> {
    pub fn new_with_fs(fs: FS, options: SyncConfig) -> Self {
        Self { fs, options }
    }

    pub fn fs(&self) -> &FS {
        &self.fs
    }

    pub fn options(&self) -> &SyncConfig {
        &self.options
    }

    /// Run one sync.
    ///
    /// I/O failures and template errors abort; an unparseable target is
    /// handled per the configured parse-error policy.
    pub fn sync(&self, request: &SyncRequest) -> ScaffoldResult<SyncOutcome> {
        request.check_template()?;
        let path = request.path.as_path();
        let decl_name = request.describe();

        let loaded = load(
            &self.fs,
            path,
            &request.bootstrap,
            self.options.on_parse_error,
        )?;
        let mut tree = loaded.tree;
        let mut log = MergeLog::default();

        let action = match request.kind {
            DeclKind::Import => sync_imports(&mut tree, request, &mut log),
            _ => {
                ensure_imports(&mut tree, &request_imports(request), &mut log);
                sync_decl(&mut tree, request, &decl_name, &mut log)
            }
        };

        let content = print_file(&tree);
        let changed = content != loaded.previous;
        let written = changed || !self.options.skip_unchanged;

        tracing::debug!(
            path = %path.display(),
            decl = %decl_name,
            action = ?action,
            appended = log.appended.len(),
            "synced declaration"
        );
        for conflict in &log.conflicts {
            tracing::warn!(path = %path.display(), "template conflict: {}", conflict);
        }
        for element in &log.unplaced {
            tracing::warn!(path = %path.display(), decl = %decl_name, "could not place {}", element);
        }

        if written {
            self.fs.write_atomic(path, &content)?;
            tracing::info!(path = %path.display(), decl = %decl_name, "wrote file");
        }

        Ok(SyncOutcome {
            path: path.to_path_buf(),
            decl: decl_name,
            action,
            origin: loaded.origin,
            appended: log.appended,
            conflicts: log.conflicts,
            unplaced: log.unplaced,
            changed,
            written,
            previous: loaded.previous,
            content,
        })
    }
}

/// Convenience constructors using LocalFs
impl Synchronizer<LocalFs> {
    pub fn new(options: SyncConfig) -> Self {
        let fs = LocalFs::with_mode(options.file_mode);
        Self::new_with_fs(fs, options)
    }

    pub fn from_config(options: &SyncConfig) -> Self {
        Self::new(options.clone())
    }
}

/// Imports from the request and from its import elements, in that order.
fn request_imports(request: &SyncRequest) -> Vec<ImportSpec> {
    let mut specs = request.imports.clone();
    specs.extend(request.elements.iter().filter_map(|e| match e {
        Element::Import(spec) => Some(spec.clone()),
        _ => None,
    }));
    specs
}

fn non_import_elements(request: &SyncRequest) -> Vec<Element> {
    request
        .elements
        .iter()
        .filter(|e| !matches!(e, Element::Import(_)))
        .cloned()
        .collect()
}

/// Merge specs into the first import declaration, creating one directly
/// after the package clause when the file has none.
fn ensure_imports(tree: &mut SourceFile, specs: &[ImportSpec], log: &mut MergeLog) {
    let index = tree
        .decls
        .iter()
        .position(|d| matches!(d.item, Item::Import(_)));
    merge_into_import_decl(tree, index, specs, log);
}

fn merge_into_import_decl(
    tree: &mut SourceFile,
    index: Option<usize>,
    specs: &[ImportSpec],
    log: &mut MergeLog,
) {
    if specs.is_empty() {
        return;
    }
    let index = match index {
        Some(index) => index,
        None => {
            tree.decls
                .insert(0, Decl::new(Item::Import(ImportDecl::default())));
            0
        }
    };
    if let Item::Import(imports) = &mut tree.decls[index].item {
        merge_imports(imports, specs, log);
    }
}

fn sync_imports(tree: &mut SourceFile, request: &SyncRequest, log: &mut MergeLog) -> SyncAction {
    let mut specs: Vec<ImportSpec> = match &request.template.item {
        Item::Import(imports) => imports.specs.iter().filter_map(|m| m.item().cloned()).collect(),
        _ => Vec::new(),
    };
    specs.extend(request_imports(request));

    let found = locate(tree, DeclKind::Import, &request.name);
    let action = if found.is_some() {
        SyncAction::Merged
    } else {
        SyncAction::Created
    };
    let index = found.or_else(|| {
        tree.decls
            .iter()
            .position(|d| matches!(d.item, Item::Import(_)))
    });
    merge_into_import_decl(tree, index, &specs, log);
    action
}

fn sync_decl(
    tree: &mut SourceFile,
    request: &SyncRequest,
    decl_name: &str,
    log: &mut MergeLog,
) -> SyncAction {
    let elements = non_import_elements(request);
    match locate(tree, request.kind, &request.name) {
        Some(index) => {
            merge_decl(&mut tree.decls[index], decl_name, &elements, log);
            SyncAction::Merged
        }
        None => {
            let mut decl = request.template.clone();
            merge_decl(&mut decl, decl_name, &elements, log);
            tree.decls.push(decl);
            SyncAction::Created
        }
    }
}
