//! Source list expansion.
//!
//! Each `srcs` entry is one of:
//!
//! - `:name` - every file generated by module `name`
//! - a glob (`*`, `?` or `[`) - matching files under the module's source
//!   directory, sorted; matching nothing is fine
//! - anything else - a path relative to the module's source directory
//!
//! Order is preserved across entries. Every expanded file keeps its path
//! relative to where it was found (the module's source directory, or the
//! generation directory of the referenced module), which is what per-input
//! output names are derived from.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::MODULE_REF_PREFIX;

/// Errors from expanding a source list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
  #[error("invalid glob pattern {pattern:?}: {message}")]
  InvalidPattern { pattern: String, message: String },

  #[error("failed to read match for {pattern:?}: {message}")]
  Glob { pattern: String, message: String },

  #[error("source reference {0:?} names an undefined module")]
  UndefinedModule(String),

  #[error("module {0:?} does not produce source files")]
  NoGeneratedSources(String),
}

/// One expanded source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
  pub path: PathBuf,
  /// `path` relative to the directory it was found under.
  pub rel: PathBuf,
}

impl SourceFile {
  /// A file found under `base`.
  ///
  /// Falls back to the bare file name when `path` is not strictly below
  /// `base`, so `rel` never climbs out of the directory it is joined onto.
  pub fn new(path: PathBuf, base: &Path) -> Self {
    let rel = path
      .strip_prefix(base)
      .ok()
      .filter(|rel| !rel.as_os_str().is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_))))
      .map(Path::to_path_buf)
      .or_else(|| path.file_name().map(PathBuf::from))
      .unwrap_or_default();
    Self { path, rel }
  }
}

/// What source expansion needs from the surrounding module.
pub trait SourceContext {
  /// The module's source directory.
  fn module_src_dir(&self) -> PathBuf;

  /// A path relative to the module's source directory.
  fn module_src(&self, rel: &str) -> PathBuf;

  /// Files generated by module `name`, relative to its generation directory.
  fn generated_sources(&self, name: &str) -> Result<Vec<SourceFile>, SourceError>;
}

/// Expand source specs into concrete files.
pub fn expand(specs: &[String], ctx: &impl SourceContext) -> Result<Vec<SourceFile>, SourceError> {
  let mut sources = Vec::new();
  let base = ctx.module_src_dir();

  for spec in specs {
    if let Some(name) = spec.strip_prefix(MODULE_REF_PREFIX) {
      sources.extend(ctx.generated_sources(name)?);
    } else if is_glob(spec) {
      sources.extend(glob_sources(spec, &base)?);
    } else {
      sources.push(SourceFile::new(ctx.module_src(spec), &base));
    }
  }

  Ok(sources)
}

/// Remove every file in `excluded` from `sources`, keeping order.
pub fn exclude(mut sources: Vec<SourceFile>, excluded: &[SourceFile]) -> Vec<SourceFile> {
  if excluded.is_empty() {
    return sources;
  }
  let excluded: HashSet<&Path> = excluded.iter().map(|source| source.path.as_path()).collect();
  sources.retain(|source| !excluded.contains(source.path.as_path()));
  sources
}

fn is_glob(spec: &str) -> bool {
  spec.contains(['*', '?', '['])
}

fn glob_sources(spec: &str, base: &Path) -> Result<Vec<SourceFile>, SourceError> {
  let pattern = format!("{}/{}", glob::Pattern::escape(&base.to_string_lossy()), spec);

  let entries = glob::glob(&pattern).map_err(|e| SourceError::InvalidPattern {
    pattern: spec.to_string(),
    message: e.msg.to_string(),
  })?;

  let mut matches = Vec::new();
  for entry in entries {
    let path = entry.map_err(|e| SourceError::Glob {
      pattern: spec.to_string(),
      message: e.to_string(),
    })?;
    if !path.is_dir() {
      matches.push(path);
    }
  }
  matches.sort();

  debug!(pattern = %spec, count = matches.len(), "expanded glob");
  Ok(matches.into_iter().map(|path| SourceFile::new(path, base)).collect())
}
