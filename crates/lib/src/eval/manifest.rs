//! The evaluation manifest.
//!
//! A serializable snapshot of an [`Evaluation`]: every module with its
//! generated outputs, every action in generation order, and every module
//! error. This is what `genrule plan` writes to disk.
//!
//! # Example
//!
//! ```json
//! {
//!   "modules": [
//!     { "name": "protos", "type": "gensrcs", "dir": "proto",
//!       "gen_dir": "/out/gen/proto/protos", "outputs": ["/out/gen/proto/protos/x.pb.go"] }
//!   ],
//!   "actions": [
//!     { "module": "protos", "command": "/src/protoc ${in}",
//!       "outputs": ["/out/gen/proto/protos/x.pb.go"], "inputs": ["/src/proto/x.proto"],
//!       "implicits": ["/src/protoc"] }
//!   ],
//!   "errors": []
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Evaluation;
use crate::action::StoredAction;
use crate::error::Property;

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
  pub modules: Vec<ModuleEntry<'a>>,
  pub actions: &'a [StoredAction],
  pub errors: Vec<ErrorEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ModuleEntry<'a> {
  pub name: &'a str,
  #[serde(rename = "type")]
  pub module_type: &'static str,
  pub dir: &'a str,
  /// Unset for modules that generate nothing or failed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gen_dir: Option<&'a Path>,
  pub outputs: &'a [PathBuf],
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry<'a> {
  pub module: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub property: Option<Property>,
  pub message: String,
}

impl<'a> Manifest<'a> {
  pub fn new(eval: &'a Evaluation) -> Self {
    let modules = eval
      .modules()
      .map(|module| {
        let generated = module.generated_sources();
        ModuleEntry {
          name: module.name(),
          module_type: module.type_name(),
          dir: module.dir(),
          gen_dir: generated.map(|outputs| outputs.gen_dir()),
          outputs: generated.map(|outputs| outputs.files()).unwrap_or_default(),
        }
      })
      .collect();

    let errors = eval
      .errors()
      .iter()
      .map(|err| ErrorEntry {
        module: &err.module,
        property: err.property,
        message: err.error.to_string(),
      })
      .collect();

    Self {
      modules,
      actions: eval.store().actions(),
      errors,
    }
  }

  /// Pretty-printed JSON.
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}
