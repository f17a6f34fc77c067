//! Tool resolution.
//!
//! A module refers to its tools symbolically: module-tools by the name of a
//! dependency that builds a host executable, file-tools by a path relative to
//! the module's source directory. Resolution turns both into a [`ToolTable`]
//! and records every resolved path as an implicit dependency, since those
//! paths only appear inside the command text.
//!
//! Labels are unique per module. Registering a label twice with the same path
//! keeps the first registration; with a different path it fails, naming both.

mod types;

pub use types::*;

use std::path::PathBuf;

use tracing::debug;

use crate::error::{CapabilityError, GenerateError};

/// What tool resolution needs from the surrounding module.
pub trait ToolContext {
  /// The host-tool capability of dependency `name`, or `None` if no such module exists.
  fn host_tool(&self, name: &str) -> Option<HostToolCapability>;

  /// A path relative to the module's source directory.
  fn module_src(&self, rel: &str) -> PathBuf;
}

/// The outcome of resolving all of a module's tools.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedTools {
  pub table: ToolTable,
  /// Every distinct resolved path, in declaration order.
  pub implicits: Vec<PathBuf>,
}

/// Accumulates tool specs into a [`ResolvedTools`].
#[derive(Debug, Default)]
pub struct ToolResolver {
  resolved: ResolvedTools,
}

impl ToolResolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Resolve one tool and register it under its label.
  ///
  /// # Errors
  ///
  /// - [`GenerateError::DependencyCapability`] if a module-tool dependency is
  ///   undefined, not a host tool, or has no path set
  /// - [`GenerateError::DuplicateTool`] if the label is already registered with a
  ///   different path
  pub fn resolve(&mut self, spec: &ToolSpec, ctx: &impl ToolContext) -> Result<(), GenerateError> {
    let path = match spec {
      ToolSpec::Module(name) => match ctx.host_tool(name) {
        Some(HostToolCapability::HasToolPath(path)) => path,
        Some(HostToolCapability::CapabilityUnset) => return Err(CapabilityError::Unset(name.clone()).into()),
        Some(HostToolCapability::NoCapability) => return Err(CapabilityError::NotAHostTool(name.clone()).into()),
        None => return Err(CapabilityError::Undefined(name.clone()).into()),
      },
      ToolSpec::File(rel) => ctx.module_src(rel),
    };

    let label = spec.label();
    match self.resolved.table.insert(label, path.clone()) {
      None => {
        debug!(label = %label, path = ?path, "resolved tool");
        self.resolved.implicits.push(path);
        Ok(())
      }
      Some(first) if first == path => {
        debug!(label = %label, "tool declared twice with the same path, keeping first");
        Ok(())
      }
      Some(first) => Err(GenerateError::DuplicateTool {
        label: label.to_string(),
        first,
        second: path,
      }),
    }
  }

  pub fn finish(self) -> ResolvedTools {
    self.resolved
  }
}
