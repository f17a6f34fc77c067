//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use genrule_lib::blueprint::Blueprint;
use genrule_lib::eval::{Evaluation, evaluate};
use genrule_lib::module::ModuleRegistry;
use genrule_lib::paths::PathContext;
use tempfile::TempDir;

/// A temporary source tree with its own output root.
pub struct SourceTree {
  pub temp: TempDir,
}

impl SourceTree {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn out(&self) -> PathBuf {
    self.temp.path().join("out")
  }

  /// Write an empty file relative to the root.
  pub fn touch(&self, rel: &str) -> &Self {
    let path = self.root().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "").unwrap();
    self
  }

  pub fn evaluate(&self, json: &str) -> Evaluation {
    let blueprint = Blueprint::from_json(json).unwrap();
    let paths = PathContext::new(self.root(), self.out());
    evaluate(&blueprint, &ModuleRegistry::with_builtins(), &paths).unwrap()
  }
}
