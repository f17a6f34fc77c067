//! Where emitted actions go.
//!
//! The [`ActionSink`] is the hand-off point to whatever schedules and runs
//! actions. [`ActionStore`] is the in-memory sink used by evaluation: it
//! keeps actions in submission order and makes sure no two modules claim the
//! same output.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::BuildAction;

/// Errors raised by an action sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
  #[error("output {output:?} of module {module:?} already produced by module {owner:?}")]
  DuplicateOutput {
    output: PathBuf,
    module: String,
    owner: String,
  },
}

/// Accepts a module's actions.
pub trait ActionSink {
  /// Accept every action of `module`, or none of them.
  fn submit(&mut self, module: &str, actions: Vec<BuildAction>) -> Result<(), SinkError>;
}

/// An action together with the module that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAction {
  pub module: String,
  #[serde(flatten)]
  pub action: BuildAction,
}

/// In-memory action sink.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ActionStore {
  actions: Vec<StoredAction>,
  #[serde(skip)]
  owners: HashMap<PathBuf, String>,
}

impl ActionStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn actions(&self) -> &[StoredAction] {
    &self.actions
  }

  /// Actions emitted by `module`, in emission order.
  pub fn actions_for<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a BuildAction> + 'a {
    self
      .actions
      .iter()
      .filter(move |stored| stored.module == module)
      .map(|stored| &stored.action)
  }

  /// Modules with at least one action, in first-submission order.
  pub fn modules(&self) -> Vec<&str> {
    let mut modules: Vec<&str> = Vec::new();
    for stored in &self.actions {
      if !modules.contains(&stored.module.as_str()) {
        modules.push(&stored.module);
      }
    }
    modules
  }

  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }
}

impl ActionSink for ActionStore {
  fn submit(&mut self, module: &str, actions: Vec<BuildAction>) -> Result<(), SinkError> {
    {
      let mut claimed: HashMap<&PathBuf, &str> = HashMap::new();
      for output in actions.iter().flat_map(|action| &action.outputs) {
        let owner = self
          .owners
          .get(output)
          .map(String::as_str)
          .or_else(|| claimed.get(output).copied());
        if let Some(owner) = owner {
          return Err(SinkError::DuplicateOutput {
            output: output.clone(),
            module: module.to_string(),
            owner: owner.to_string(),
          });
        }
        claimed.insert(output, module);
      }
    }

    for action in actions {
      for output in &action.outputs {
        self.owners.insert(output.clone(), module.to_string());
      }
      self.actions.push(StoredAction {
        module: module.to_string(),
        action,
      });
    }

    Ok(())
  }
}
