//! Errors reported while generating a module's build actions.
//!
//! Every error here is permanent for the module's declaration: nothing is
//! retried, and a failing module emits no actions. Errors are wrapped in a
//! [`ModuleError`] that names the module and, when one is to blame, the
//! property the user has to fix.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::action::SinkError;
use crate::placeholder::PlaceholderError;
use crate::sources::SourceError;

/// A declared module property, used to point errors at the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
  Cmd,
  Tools,
  ToolFiles,
  Srcs,
  ExcludeSrcs,
  Out,
  OutputExtension,
}

impl Property {
  pub fn as_str(self) -> &'static str {
    match self {
      Property::Cmd => "cmd",
      Property::Tools => "tools",
      Property::ToolFiles => "tool_files",
      Property::Srcs => "srcs",
      Property::ExcludeSrcs => "exclude_srcs",
      Property::Out => "out",
      Property::OutputExtension => "output_extension",
    }
  }
}

impl fmt::Display for Property {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Why a module-tool dependency could not provide a tool path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
  /// The dependency is a host tool but its path is not set.
  #[error("host tool {0:?} missing output file")]
  Unset(String),

  /// The dependency exists but is not a host tool.
  #[error("unknown dependency {0:?}: module does not provide a host tool")]
  NotAHostTool(String),

  /// No module with this name is declared.
  #[error("dependency {0:?} is not defined")]
  Undefined(String),
}

/// Errors that abort generation for a single module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
  /// The declaration is unusable as written (e.g. no tools at all).
  #[error("{0}")]
  Configuration(String),

  /// A module-tool dependency lacks the host-tool capability.
  #[error(transparent)]
  DependencyCapability(#[from] CapabilityError),

  /// Two different paths claim the same tool label.
  #[error("multiple tools for {label:?}, {first:?} and {second:?}")]
  DuplicateTool {
    label: String,
    first: PathBuf,
    second: PathBuf,
  },

  /// A placeholder outside the recognized set.
  #[error("unknown variable '{0}'")]
  UnknownVariable(String),

  /// `$(location <label>)` with a label that was never declared.
  #[error("unknown location label {0:?}")]
  UnknownLocationLabel(String),

  /// The command template is not well-formed.
  #[error(transparent)]
  TemplateSyntax(#[from] PlaceholderError),

  /// Sources could not be expanded.
  #[error(transparent)]
  Sources(#[from] SourceError),

  /// The action sink refused the module's actions.
  #[error(transparent)]
  Sink(#[from] SinkError),

  /// A module this one depends on failed, so it was not generated.
  #[error("dependency {0:?} failed")]
  DependencyFailed(String),
}

/// A [`GenerateError`] attributed to a module and optionally a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleError {
  pub module: String,
  pub property: Option<Property>,
  pub error: GenerateError,
}

impl ModuleError {
  pub fn new(module: &str, property: Option<Property>, error: GenerateError) -> Self {
    Self {
      module: module.to_string(),
      property,
      error,
    }
  }
}

impl fmt::Display for ModuleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.property {
      Some(property) => write!(f, "module {:?}: {}: {}", self.module, property, self.error),
      None => write!(f, "module {:?}: {}", self.module, self.error),
    }
  }
}

impl std::error::Error for ModuleError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.error)
  }
}
