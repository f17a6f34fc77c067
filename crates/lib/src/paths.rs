//! Path construction for module sources and generated outputs.
//!
//! Every module has a source directory (relative to the blueprint root) and a
//! private generation directory under the output root:
//!
//! ```text
//! <source_root>/<dir>/<rel>          module source path
//! <out_root>/gen/<dir>/<name>/<rel>  module gen path
//! ```

use std::path::{Component, Path, PathBuf};

use crate::consts::{DEFAULT_OUT_DIR, GEN_DIR_NAME, OUT_DIR_ENV};

/// Turns logical (module, relative name) pairs into concrete paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
  source_root: PathBuf,
  out_root: PathBuf,
}

impl PathContext {
  pub fn new(source_root: impl Into<PathBuf>, out_root: impl Into<PathBuf>) -> Self {
    Self {
      source_root: source_root.into(),
      out_root: out_root.into(),
    }
  }

  /// Path context for a blueprint file.
  ///
  /// The source root is the blueprint's directory. The output root comes from
  /// `out_dir` if given, then `GENRULE_OUT_DIR`, then `<source_root>/out`.
  pub fn for_blueprint(blueprint: &Path, out_dir: Option<&Path>) -> Self {
    let parent = blueprint.parent().unwrap_or(Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
      Path::new(".")
    } else {
      parent
    };
    let source_root = dunce::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
    let out_root = out_root(&source_root, out_dir);
    Self::new(source_root, out_root)
  }

  pub fn source_root(&self) -> &Path {
    &self.source_root
  }

  pub fn out_root(&self) -> &Path {
    &self.out_root
  }

  /// Directory holding a module's sources.
  pub fn module_src_dir(&self, dir: &str) -> PathBuf {
    join_relative(&self.source_root, dir)
  }

  /// A path relative to a module's source directory.
  pub fn module_src(&self, dir: &str, rel: &str) -> PathBuf {
    join_relative(&self.module_src_dir(dir), rel)
  }

  /// A module's generation directory.
  pub fn module_gen_dir(&self, dir: &str, name: &str) -> PathBuf {
    join_relative(&join_relative(&self.out_root, GEN_DIR_NAME), dir).join(name)
  }
}

/// Resolve the output root: explicit flag, then environment, then default.
pub fn out_root(source_root: &Path, flag: Option<&Path>) -> PathBuf {
  if let Some(dir) = flag {
    return dir.to_path_buf();
  }

  if let Ok(dir) = std::env::var(OUT_DIR_ENV)
    && !dir.is_empty()
  {
    return PathBuf::from(dir);
  }

  source_root.join(DEFAULT_OUT_DIR)
}

/// A path relative to a generation directory.
pub fn gen_path(gen_dir: &Path, rel: impl AsRef<Path>) -> PathBuf {
  join_relative(gen_dir, rel)
}

/// Output path for the source at `rel` under `gen_dir`, with its final
/// extension replaced. Subdirectories of `rel` are kept.
pub fn gen_path_with_ext(gen_dir: &Path, rel: &Path, ext: &str) -> PathBuf {
  let file_name = rel.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
  let dir = match rel.parent() {
    Some(parent) => gen_path(gen_dir, parent),
    None => gen_dir.to_path_buf(),
  };
  dir.join(replace_extension(&file_name, ext))
}

/// Replace the final extension of a file name.
///
/// Names without an extension (including dotfiles like `.bashrc`) get `ext`
/// appended. `ext` may be given with or without its leading dot; an empty
/// `ext` strips the extension.
pub fn replace_extension(file_name: &str, ext: &str) -> String {
  let stem = match file_name.rfind('.') {
    Some(i) if i > 0 => &file_name[..i],
    _ => file_name,
  };
  let ext = ext.trim_start_matches('.');
  if ext.is_empty() {
    stem.to_string()
  } else {
    format!("{stem}.{ext}")
  }
}

/// Join `rel` onto `base`, dropping `.` components so `dir = "."` maps to the base.
fn join_relative(base: &Path, rel: impl AsRef<Path>) -> PathBuf {
  let mut path = base.to_path_buf();
  for component in rel.as_ref().components() {
    match component {
      Component::CurDir => {}
      other => path.push(other),
    }
  }
  path
}
