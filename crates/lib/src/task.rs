//! Splitting a module's work into tasks.
//!
//! A task is one `(inputs, outputs)` pair and becomes one build action. The
//! two module types differ only in how they split their sources:
//!
//! - [`PerInputPlanner`] (`gensrcs`): one task per source, output named after
//!   the source's relative path with a new extension
//! - [`AggregatePlanner`] (`genrule`): a single task over every source,
//!   producing a fixed list of declared outputs

use std::path::{Path, PathBuf};

use crate::paths::{gen_path, gen_path_with_ext};
use crate::sources::SourceFile;

/// One unit of work: ordered inputs and ordered outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
  pub inputs: Vec<PathBuf>,
  pub outputs: Vec<PathBuf>,
}

/// A task-splitting policy.
pub trait TaskPlanner: std::fmt::Debug {
  /// Plan tasks for the expanded `sources` with outputs under `gen_dir`.
  fn plan(&self, sources: Vec<SourceFile>, gen_dir: &Path) -> Vec<Task>;
}

/// One task per input, each producing `<gen_dir>/<rel dir>/<stem><output_extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerInputPlanner {
  output_extension: String,
}

impl PerInputPlanner {
  pub fn new(output_extension: &str) -> Self {
    Self {
      output_extension: output_extension.to_string(),
    }
  }
}

impl TaskPlanner for PerInputPlanner {
  fn plan(&self, sources: Vec<SourceFile>, gen_dir: &Path) -> Vec<Task> {
    sources
      .into_iter()
      .map(|source| {
        let output = gen_path_with_ext(gen_dir, &source.rel, &self.output_extension);
        Task {
          inputs: vec![source.path],
          outputs: vec![output],
        }
      })
      .collect()
  }
}

/// A single task over all inputs, producing the declared outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatePlanner {
  out: Vec<String>,
}

impl AggregatePlanner {
  pub fn new(out: Vec<String>) -> Self {
    Self { out }
  }
}

impl TaskPlanner for AggregatePlanner {
  fn plan(&self, sources: Vec<SourceFile>, gen_dir: &Path) -> Vec<Task> {
    vec![Task {
      inputs: sources.into_iter().map(|source| source.path).collect(),
      outputs: self.out.iter().map(|name| gen_path(gen_dir, name)).collect(),
    }]
  }
}
