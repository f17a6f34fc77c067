use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Property;

/// A tool declared by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSpec {
  /// A module resolved through the dependency graph to a host executable.
  Module(String),
  /// A literal path relative to the declaring module's source directory.
  File(String),
}

impl ToolSpec {
  /// The label the tool is registered under.
  pub fn label(&self) -> &str {
    match self {
      ToolSpec::Module(name) => name,
      ToolSpec::File(path) => path,
    }
  }

  /// The property the tool was declared in.
  pub fn property(&self) -> Property {
    match self {
      ToolSpec::Module(_) => Property::Tools,
      ToolSpec::File(_) => Property::ToolFiles,
    }
  }

  /// Tool specs in declaration order: module-tools before file-tools.
  pub fn from_declaration(tools: &[String], tool_files: &[String]) -> Vec<ToolSpec> {
    tools
      .iter()
      .cloned()
      .map(ToolSpec::Module)
      .chain(tool_files.iter().cloned().map(ToolSpec::File))
      .collect()
  }
}

/// What a dependency says about providing a host tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostToolCapability {
  /// The dependency is a host tool at this path.
  HasToolPath(PathBuf),
  /// The dependency is not a host tool.
  NoCapability,
  /// The dependency is a host tool whose path is not set.
  CapabilityUnset,
}

/// Resolved tool labels for one module.
///
/// Built once by [`ToolResolver`](super::ToolResolver) and read-only
/// afterwards. Remembers which label was declared first so `$(location)`
/// never depends on lookup order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolTable {
  paths: BTreeMap<String, PathBuf>,
  first: Option<String>,
}

impl ToolTable {
  pub fn get(&self, label: &str) -> Option<&Path> {
    self.paths.get(label).map(PathBuf::as_path)
  }

  /// The first declared tool.
  pub fn first(&self) -> Option<&Path> {
    self.first.as_deref().and_then(|label| self.get(label))
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  /// Register `label`, returning the path it already had if one exists.
  pub(super) fn insert(&mut self, label: &str, path: PathBuf) -> Option<PathBuf> {
    if let Some(existing) = self.paths.get(label) {
      return Some(existing.clone());
    }
    if self.first.is_none() {
      self.first = Some(label.to_string());
    }
    self.paths.insert(label.to_string(), path);
    None
  }
}
