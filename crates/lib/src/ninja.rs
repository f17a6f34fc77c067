//! Ninja build file output.
//!
//! Each module becomes one `rule` whose `command` is the module's resolved
//! command, and each of its actions one `build` statement:
//!
//! ```ninja
//! rule protos
//!   command = /src/protoc --go_out=/out/gen/protos ${in}
//!   description = protos ${out}
//!
//! build /out/gen/protos/x.pb.go: protos /src/x.proto | /src/protoc
//! ```
//!
//! `${in}` and `${out}` are the only Ninja variables a command refers to;
//! every other `$` is escaped. Ninja has no way to write a newline inside a
//! value or path, so commands and paths containing one are rejected.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::action::ActionStore;
use crate::consts::APP_NAME;

/// Names a rule must not take: Ninja keywords and the built-in `phony` rule.
const RESERVED_NAMES: &[&str] = &["build", "default", "include", "phony", "pool", "rule", "subninja"];

#[derive(Debug, Error)]
pub enum NinjaError {
  #[error("command of module {0:?} contains a newline")]
  MultilineCommand(String),

  #[error("path {path:?} of module {module:?} contains a newline")]
  MultilinePath { module: String, path: PathBuf },

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Render every action in `store` as a Ninja file.
///
/// # Errors
///
/// Returns an error if a command or path cannot be written in Ninja syntax.
pub fn render(store: &ActionStore) -> Result<String, NinjaError> {
  let mut out = String::new();
  let _ = writeln!(out, "# Generated by {APP_NAME}. Do not edit.");
  let _ = writeln!(out, "ninja_required_version = 1.3");

  let mut taken: HashSet<String> = RESERVED_NAMES.iter().map(|name| name.to_string()).collect();
  for module in store.modules() {
    let rule = rule_name(module, &mut taken);
    let mut actions = store.actions_for(module).peekable();
    let Some(first) = actions.peek() else {
      continue;
    };

    let command = first.command.to_ninja();
    if command.contains(['\n', '\r']) {
      return Err(NinjaError::MultilineCommand(module.to_string()));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "rule {rule}");
    let _ = writeln!(out, "  command = {command}");
    let _ = writeln!(out, "  description = {} ${{out}}", escape_value(module));
    let _ = writeln!(out);

    for action in actions {
      let _ = write!(out, "build {}: {rule}", join_paths(module, &action.outputs)?);
      if !action.inputs.is_empty() {
        let _ = write!(out, " {}", join_paths(module, &action.inputs)?);
      }
      if !action.implicits.is_empty() {
        let _ = write!(out, " | {}", join_paths(module, &action.implicits)?);
      }
      let _ = writeln!(out);
    }
  }

  Ok(out)
}

/// Render `store` and write it to `path`, creating parent directories.
pub fn write(store: &ActionStore, path: &Path) -> Result<(), NinjaError> {
  let content = render(store)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, content)?;
  debug!(path = %path.display(), actions = store.len(), "wrote ninja file");
  Ok(())
}

/// A rule name for `module` that is a valid Ninja identifier and not yet taken.
fn rule_name(module: &str, taken: &mut HashSet<String>) -> String {
  let base: String = module
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
    .collect();
  let base = if base.is_empty() { "module".to_string() } else { base };

  let mut name = base.clone();
  let mut n = 1;
  while !taken.insert(name.clone()) {
    n += 1;
    name = format!("{base}_{n}");
  }
  name
}

fn join_paths(module: &str, paths: &[PathBuf]) -> Result<String, NinjaError> {
  let mut escaped = Vec::with_capacity(paths.len());
  for path in paths {
    let text = path.to_string_lossy();
    if text.contains(['\n', '\r']) {
      return Err(NinjaError::MultilinePath {
        module: module.to_string(),
        path: path.clone(),
      });
    }
    escaped.push(escape_path(&text));
  }
  Ok(escaped.join(" "))
}

/// Escape a path for a `build` line.
fn escape_path(path: &str) -> String {
  let mut escaped = String::with_capacity(path.len());
  for c in path.chars() {
    if matches!(c, '$' | ' ' | ':') {
      escaped.push('$');
    }
    escaped.push(c);
  }
  escaped
}

/// Escape a free-text variable value. Line breaks become spaces.
fn escape_value(value: &str) -> String {
  value.replace('$', "$$").replace(['\n', '\r'], " ")
}
