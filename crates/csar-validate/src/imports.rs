//! # TOSCA Import Graph
//!
//! The main definitions file may import other definition files, which may
//! import further files. [`ImportGraphResolver`] walks that graph starting
//! from the main definitions file and reports:
//!
//! - documents that are not valid YAML,
//! - `imports` entries that are structurally invalid,
//! - imports naming a file that is not in the package.
//!
//! ## Traversal
//!
//! Documents live in an arena ([`ImportGraph`]) indexed by their
//! normalized [`PackagePath`]. The walk is an explicit-stack depth-first
//! search, so deep import chains cannot overflow the call stack. Every
//! document is parsed at most once: reaching a document that is already
//! visiting, resolved or failed is a no-op, which also makes cycles
//! terminate.
//!
//! ## Import entry forms
//!
//! ```yaml
//! imports:
//!   - etsi_nfv_sol001_vnfd_types.yaml          # plain path
//!   - file: Definitions/helper.yaml             # mapping with `file`
//!   - helper:                                   # named import
//!       file: helper.yaml
//!   - other: other.yaml                         # named import, short form
//! ```
//!
//! Relative paths resolve against the importing document's directory; a
//! leading `/` resolves against the package root. Imports naming an
//! external URL are not followed.

use std::collections::HashMap;

use csar_core::{PackageFileStore, PackagePath};
use serde_yaml::Value;

use crate::violation::Violation;

/// Traversal state of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Unvisited,
    /// On the traversal stack.
    Visiting,
    Resolved,
    /// Could not be parsed; its imports were not followed.
    Failed,
}

/// A path-valued `imports` entry of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// The path as written in the document.
    pub declared_path: String,
    /// The document the statement appears in.
    pub resolved_from: PackagePath,
}

/// One node of the import graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionDocument {
    pub path: PackagePath,
    pub state: DocumentState,
    pub imports: Vec<ImportStatement>,
}

/// Arena of documents reached from the main definitions file.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    documents: Vec<DefinitionDocument>,
    index: HashMap<PackagePath, usize>,
}

impl ImportGraph {
    /// Index of `path`, inserting an unvisited node if needed.
    fn node(&mut self, path: PackagePath) -> usize {
        if let Some(idx) = self.index.get(&path) {
            return *idx;
        }
        let idx = self.documents.len();
        self.index.insert(path.clone(), idx);
        self.documents.push(DefinitionDocument {
            path,
            state: DocumentState::Unvisited,
            imports: Vec::new(),
        });
        idx
    }

    /// Documents in discovery order.
    pub fn documents(&self) -> &[DefinitionDocument] {
        &self.documents
    }

    pub fn get(&self, path: &PackagePath) -> Option<&DefinitionDocument> {
        self.index.get(path).map(|idx| &self.documents[*idx])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of walking the import graph.
#[derive(Debug, Clone, Default)]
pub struct ImportResolution {
    pub graph: ImportGraph,
    /// Violations in traversal order.
    pub violations: Vec<Violation>,
    /// Number of YAML parses performed.
    pub documents_parsed: usize,
}

/// Walks the import graph of a package.
#[derive(Debug, Clone, Copy)]
pub struct ImportGraphResolver<'a> {
    store: &'a PackageFileStore,
}

/// A raw `imports` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImportEntry {
    Path(String),
    Invalid(String),
}

struct Frame {
    node: usize,
    entries: std::vec::IntoIter<ImportEntry>,
}

impl<'a> ImportGraphResolver<'a> {
    pub fn new(store: &'a PackageFileStore) -> Self {
        Self { store }
    }

    /// Walk every document reachable from `root`.
    pub fn resolve(&self, root: &PackagePath) -> ImportResolution {
        let mut resolution = ImportResolution::default();
        if !self.store.contains_path(root) {
            resolution
                .violations
                .push(Violation::DefinitionsMissing(root.to_string()));
            return resolution;
        }

        let root_idx = resolution.graph.node(root.clone());
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.enter(&mut resolution, root_idx) {
            stack.push(frame);
        }

        while let Some(top) = stack.last_mut() {
            let node = top.node;
            let Some(entry) = top.entries.next() else {
                stack.pop();
                resolution.graph.documents[node].state = DocumentState::Resolved;
                continue;
            };

            let from = resolution.graph.documents[node].path.clone();
            let declared = match entry {
                ImportEntry::Invalid(statement) => {
                    resolution.violations.push(Violation::InvalidImportStatement {
                        file: from.to_string(),
                        statement,
                    });
                    continue;
                }
                ImportEntry::Path(declared) => declared,
            };

            resolution.graph.documents[node].imports.push(ImportStatement {
                declared_path: declared.clone(),
                resolved_from: from.clone(),
            });

            if is_external(&declared) {
                tracing::debug!(file = %from, import = %declared, "skipping external import");
                continue;
            }

            let target = match from.resolve(&declared) {
                Ok(target) if self.store.contains_path(&target) => target,
                Ok(target) => {
                    resolution.violations.push(Violation::MissingImportFile {
                        file: from.to_string(),
                        path: target.to_string(),
                    });
                    continue;
                }
                Err(_) => {
                    resolution.violations.push(Violation::MissingImportFile {
                        file: from.to_string(),
                        path: declared,
                    });
                    continue;
                }
            };

            let idx = resolution.graph.node(target);
            if resolution.graph.documents[idx].state == DocumentState::Unvisited {
                if let Some(frame) = self.enter(&mut resolution, idx) {
                    stack.push(frame);
                }
            }
        }

        tracing::debug!(
            root = %root,
            documents = resolution.graph.len(),
            violations = resolution.violations.len(),
            "import graph resolved"
        );
        resolution
    }

    /// Parse a document and open a frame over its imports. Returns `None`
    /// when the document cannot be parsed.
    fn enter(&self, resolution: &mut ImportResolution, idx: usize) -> Option<Frame> {
        let path = resolution.graph.documents[idx].path.clone();
        let content = self.store.get(&path).unwrap_or_default();
        resolution.documents_parsed += 1;

        match parse_document(content) {
            Ok(document) => {
                resolution.graph.documents[idx].state = DocumentState::Visiting;
                let entries = import_entries(&document, &path, &mut resolution.violations);
                Some(Frame {
                    node: idx,
                    entries: entries.into_iter(),
                })
            }
            Err(reason) => {
                resolution.graph.documents[idx].state = DocumentState::Failed;
                resolution.violations.push(Violation::InvalidYaml {
                    file: path.to_string(),
                    reason,
                });
                None
            }
        }
    }
}

/// Parse a definitions document. Whitespace-only content is an empty
/// document.
fn parse_document(content: &[u8]) -> Result<Value, String> {
    let text = std::str::from_utf8(content).map_err(|_| "content is not valid UTF-8".to_string())?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}

/// Read the `imports` list of a document.
fn import_entries(document: &Value, path: &PackagePath, violations: &mut Vec<Violation>) -> Vec<ImportEntry> {
    let Some(imports) = document.get("imports") else {
        return Vec::new();
    };
    match imports {
        Value::Null => Vec::new(),
        Value::Sequence(entries) => entries.iter().map(import_entry).collect(),
        other => {
            violations.push(Violation::InvalidImportStatement {
                file: path.to_string(),
                statement: render(other),
            });
            Vec::new()
        }
    }
}

fn import_entry(value: &Value) -> ImportEntry {
    match value {
        Value::String(path) => non_empty(path).unwrap_or_else(|| ImportEntry::Invalid(render(value))),
        Value::Mapping(map) => {
            if let Some(file) = map.get("file") {
                return file_entry(file).unwrap_or_else(|| ImportEntry::Invalid(render(value)));
            }
            let mut named = map.iter();
            match (named.next(), named.next()) {
                (Some((_, Value::String(path))), None) => {
                    non_empty(path).unwrap_or_else(|| ImportEntry::Invalid(render(value)))
                }
                (Some((_, Value::Mapping(inner))), None) => inner
                    .get("file")
                    .and_then(file_entry)
                    .unwrap_or_else(|| ImportEntry::Invalid(render(value))),
                _ => ImportEntry::Invalid(render(value)),
            }
        }
        _ => ImportEntry::Invalid(render(value)),
    }
}

fn file_entry(file: &Value) -> Option<ImportEntry> {
    file.as_str().and_then(non_empty)
}

fn non_empty(path: &str) -> Option<ImportEntry> {
    let path = path.trim();
    (!path.is_empty()).then(|| ImportEntry::Path(path.to_string()))
}

fn is_external(path: &str) -> bool {
    path.contains("://")
}

/// Render an import entry for an error message; an empty entry renders as
/// `null`.
fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => format!("'{s}'"),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', ", "))
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}
