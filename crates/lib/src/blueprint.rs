//! Blueprint files: the declared modules of a source tree.
//!
//! A blueprint is a JSON document listing modules. Each module names its
//! type, its name, and optionally its source directory relative to the
//! blueprint; every other key is a property interpreted by the module type.
//!
//! ```json
//! {
//!   "modules": [
//!     { "type": "host_tool", "name": "protoc", "src": "prebuilts/protoc" },
//!     {
//!       "type": "gensrcs",
//!       "name": "protos",
//!       "dir": "proto",
//!       "cmd": "$(location) --go_out=$(genDir) $(in)",
//!       "tools": ["protoc"],
//!       "srcs": ["*.proto"],
//!       "output_extension": ".pb.go"
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{GenerateError, ModuleError};

/// Errors that stop a whole blueprint from being evaluated.
#[derive(Debug, Error)]
pub enum BlueprintError {
  #[error("failed to read blueprint {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse blueprint: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("unknown module type {module_type:?} for module {module:?}")]
  UnknownType { module: String, module_type: String },

  #[error("module {0:?} is declared more than once")]
  DuplicateModule(String),

  #[error("invalid declaration: {0}")]
  Declaration(ModuleError),

  #[error("dependency cycle involving module {0:?}")]
  Cycle(String),
}

/// The parsed contents of a blueprint file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Blueprint {
  #[serde(default)]
  pub modules: Vec<ModuleDecl>,
}

impl Blueprint {
  pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn load(path: &Path) -> Result<Self, BlueprintError> {
    let content = std::fs::read_to_string(path).map_err(|source| BlueprintError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }
}

fn default_dir() -> String {
  ".".to_string()
}

/// One declared module, with its type-specific properties still untyped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleDecl {
  #[serde(rename = "type")]
  pub module_type: String,
  pub name: String,
  #[serde(default = "default_dir")]
  pub dir: String,
  #[serde(flatten)]
  pub properties: Map<String, Value>,
}

impl ModuleDecl {
  /// Deserialize the type-specific properties.
  ///
  /// # Errors
  ///
  /// A [`GenerateError::Configuration`] if a property is missing, unknown or
  /// of the wrong type.
  pub fn properties<T: DeserializeOwned>(&self) -> Result<T, ModuleError> {
    serde_json::from_value(Value::Object(self.properties.clone())).map_err(|e| {
      ModuleError::new(
        &self.name,
        None,
        GenerateError::Configuration(format!("invalid {} properties: {e}", self.module_type)),
      )
    })
  }
}
