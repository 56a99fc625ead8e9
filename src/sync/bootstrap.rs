//! Bootstrap trees and file loading

use std::path::Path;

use crate::config::ParseErrorPolicy;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::fs::FileSystem;
use crate::syntax::{parse_file, Decl, ImportDecl, ImportSpec, Item, Member, ParseError, SourceFile, Token};

/// Minimal file content used when no parseable file exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub package: String,
    /// Comment lines written above the package clause
    pub header: Vec<String>,
    /// Imports every fresh file of this kind starts with
    pub imports: Vec<ImportSpec>,
}

impl Bootstrap {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            header: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    pub fn with_import(mut self, spec: ImportSpec) -> Self {
        self.imports.push(spec);
        self
    }

    /// Build the bootstrap tree: header, package clause and the fixed imports.
    pub fn tree(&self) -> SourceFile {
        let mut file = SourceFile::new(self.package.clone());
        file.header = self.header.iter().map(Token::comment).collect();
        file.header_detached = !file.header.is_empty();
        if !self.imports.is_empty() {
            file.decls.push(Decl::new(Item::Import(ImportDecl {
                specs: self.imports.iter().cloned().map(Member::Item).collect(),
                grouped: self.imports.len() > 1,
            })));
        }
        file
    }
}

/// Where the tree a sync works on came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOrigin {
    /// Parsed from the file on disk
    Existing,
    /// No file on disk
    Missing,
    /// File exists but holds only whitespace
    Empty,
    /// File exists but does not parse; its content is discarded
    Unparseable(ParseError),
}

impl FileOrigin {
    pub fn is_bootstrapped(&self) -> bool {
        !matches!(self, FileOrigin::Existing)
    }
}

/// A loaded tree with the text it was read from
#[derive(Debug)]
pub struct Loaded {
    pub tree: SourceFile,
    pub origin: FileOrigin,
    /// File content before the sync, empty when missing
    pub previous: String,
}

/// Read and parse `path`, or fall back to the bootstrap tree.
///
/// A read failure is an error. A parse failure either regenerates from the
/// bootstrap or aborts, per `policy`.
pub fn load<F: FileSystem>(
    fs: &F,
    path: &Path,
    bootstrap: &Bootstrap,
    policy: ParseErrorPolicy,
) -> ScaffoldResult<Loaded> {
    if !fs.exists(path) {
        return Ok(Loaded {
            tree: bootstrap.tree(),
            origin: FileOrigin::Missing,
            previous: String::new(),
        });
    }

    let previous = fs.read_to_string(path)?;
    if previous.trim().is_empty() {
        return Ok(Loaded {
            tree: bootstrap.tree(),
            origin: FileOrigin::Empty,
            previous,
        });
    }

    match parse_file(&previous) {
        Ok(tree) => Ok(Loaded {
            tree,
            origin: FileOrigin::Existing,
            previous,
        }),
        Err(source) => match policy {
            ParseErrorPolicy::Abort => Err(ScaffoldError::Unparseable {
                path: path.to_path_buf(),
                source,
            }),
            ParseErrorPolicy::Regenerate => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "existing file does not parse; regenerating it from scratch"
                );
                Ok(Loaded {
                    tree: bootstrap.tree(),
                    origin: FileOrigin::Unparseable(source),
                    previous,
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::syntax::print_file;

    fn bootstrap() -> Bootstrap {
        Bootstrap::new("models")
            .with_header("// Code generated by scaffold.")
            .with_import(ImportSpec::new("context"))
            .with_import(ImportSpec::new("time"))
    }

    #[test]
    fn bootstrap_tree_prints_header_package_and_imports() {
        assert_eq!(
            print_file(&bootstrap().tree()),
            "// Code generated by scaffold.\n\npackage models\n\nimport (\n\t\"context\"\n\t\"time\"\n)\n"
        );
    }

    #[test]
    fn bootstrap_without_imports_is_just_the_package() {
        assert_eq!(print_file(&Bootstrap::new("app").tree()), "package app\n");
    }

    #[test]
    fn missing_file_bootstraps() {
        let fs = MockFileSystem::new();
        let loaded = load(&fs, Path::new("a.go"), &bootstrap(), ParseErrorPolicy::Abort).unwrap();
        assert_eq!(loaded.origin, FileOrigin::Missing);
        assert_eq!(loaded.tree, bootstrap().tree());
    }

    #[test]
    fn blank_file_bootstraps_without_parse_error() {
        let fs = MockFileSystem::new().with_file("a.go", "\n\n");
        let loaded = load(&fs, Path::new("a.go"), &bootstrap(), ParseErrorPolicy::Abort).unwrap();
        assert_eq!(loaded.origin, FileOrigin::Empty);
    }

    #[test]
    fn unparseable_file_regenerates_or_aborts() {
        let fs = MockFileSystem::new().with_file("a.go", "package models\nfunc (\n");
        let loaded =
            load(&fs, Path::new("a.go"), &bootstrap(), ParseErrorPolicy::Regenerate).unwrap();
        assert!(matches!(loaded.origin, FileOrigin::Unparseable(_)));
        assert_eq!(loaded.previous, "package models\nfunc (\n");

        let err = load(&fs, Path::new("a.go"), &bootstrap(), ParseErrorPolicy::Abort).unwrap_err();
        assert!(matches!(err, ScaffoldError::Unparseable { .. }));
    }

    #[test]
    fn existing_file_is_parsed() {
        let fs = MockFileSystem::new().with_file("a.go", "package models\n\ntype A int\n");
        let loaded = load(&fs, Path::new("a.go"), &bootstrap(), ParseErrorPolicy::Abort).unwrap();
        assert_eq!(loaded.origin, FileOrigin::Existing);
        assert_eq!(loaded.tree.decls.len(), 1);
    }
}
