//! Build action emission.
//!
//! Each planned task becomes one [`BuildAction`] sharing the module's
//! resolved command. Resolved tool paths are attached as implicit
//! dependencies on every action, so an action reruns when a tool changes even
//! though the tool only appears inside the command text.
//!
//! # Submodules
//!
//! - [`store`] - the action sink and the in-memory [`ActionStore`]

pub mod store;

pub use store::{ActionSink, ActionStore, SinkError, StoredAction};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::expand::ResolvedCommand;
use crate::task::Task;

/// A ready-to-execute build action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildAction {
  pub command: ResolvedCommand,
  pub outputs: Vec<PathBuf>,
  pub inputs: Vec<PathBuf>,
  /// Ordering-only dependencies: the module's resolved tools.
  pub implicits: Vec<PathBuf>,
}

/// Every output a module generated, plus its generation directory.
///
/// Grows as actions are emitted and is only read once generation is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedOutputSet {
  gen_dir: PathBuf,
  files: Vec<PathBuf>,
}

impl GeneratedOutputSet {
  pub fn new(gen_dir: PathBuf) -> Self {
    Self {
      gen_dir,
      files: Vec::new(),
    }
  }

  /// Generated files, in emission order.
  pub fn files(&self) -> &[PathBuf] {
    &self.files
  }

  /// The directory holding the generated files; usable as an include path.
  pub fn gen_dir(&self) -> &Path {
    &self.gen_dir
  }
}

/// Turns tasks into actions for one module.
pub struct ActionEmitter<'a> {
  command: &'a ResolvedCommand,
  implicits: &'a [PathBuf],
  outputs: &'a mut GeneratedOutputSet,
}

impl<'a> ActionEmitter<'a> {
  pub fn new(command: &'a ResolvedCommand, implicits: &'a [PathBuf], outputs: &'a mut GeneratedOutputSet) -> Self {
    Self {
      command,
      implicits,
      outputs,
    }
  }

  /// Emit the action for `task` and record its outputs.
  pub fn emit(&mut self, task: Task) -> BuildAction {
    self.outputs.files.extend(task.outputs.iter().cloned());
    BuildAction {
      command: self.command.clone(),
      outputs: task.outputs,
      inputs: task.inputs,
      implicits: self.implicits.to_vec(),
    }
  }
}
