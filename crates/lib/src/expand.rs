//! Command-template expansion.
//!
//! A module's `cmd` is expanded once, against its resolved tools and its
//! generation directory, into a [`ResolvedCommand`]. The per-task values
//! `$(in)` and `$(out)` cannot be known at that point, so they stay in the
//! result as typed holes that the executor fills for each action.
//!
//! | placeholder         | expands to                             |
//! |---------------------|----------------------------------------|
//! | `$(location)`       | the first declared tool                |
//! | `$(location label)` | the tool registered under `label`      |
//! | `$(in)`             | hole: the action's inputs              |
//! | `$(out)`            | hole: the action's outputs             |
//! | `$(genDir)`         | the module's generation directory      |
//! | `$$`                | a literal `$`                          |

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::GenerateError;
use crate::placeholder::{self, Segment, Variable};
use crate::tool::ToolTable;

/// The variables a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
  Location,
  In,
  Out,
  GenDir,
}

impl Builtin {
  fn accepts_arg(self) -> bool {
    matches!(self, Builtin::Location)
  }
}

/// Closed dispatch table; names not listed here are unknown variables.
const BUILTINS: &[(&str, Builtin)] = &[
  ("location", Builtin::Location),
  ("in", Builtin::In),
  ("out", Builtin::Out),
  ("genDir", Builtin::GenDir),
];

fn lookup(variable: &Variable) -> Option<Builtin> {
  BUILTINS
    .iter()
    .find(|(name, _)| *name == variable.name)
    .map(|(_, builtin)| *builtin)
    .filter(|builtin| variable.arg.is_none() || builtin.accepts_arg())
}

/// A piece of a resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPart {
  Literal(String),
  /// Filled with the action's inputs.
  In,
  /// Filled with the action's outputs.
  Out,
}

/// A command with every placeholder resolved except the `in`/`out` holes.
///
/// Displays in the executor's textual form, with the holes written as
/// `${in}` and `${out}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
  parts: Vec<CommandPart>,
}

impl ResolvedCommand {
  pub fn parts(&self) -> &[CommandPart] {
    &self.parts
  }

  /// Fill the holes with space-separated paths.
  pub fn substitute(&self, inputs: &[PathBuf], outputs: &[PathBuf]) -> String {
    let mut command = String::new();
    for part in &self.parts {
      match part {
        CommandPart::Literal(text) => command.push_str(text),
        CommandPart::In => command.push_str(&join_paths(inputs)),
        CommandPart::Out => command.push_str(&join_paths(outputs)),
      }
    }
    command
  }

  /// Render for a Ninja `command` binding: literal `$` is escaped as `$$`.
  pub fn to_ninja(&self) -> String {
    let mut command = String::new();
    for part in &self.parts {
      match part {
        CommandPart::Literal(text) => command.push_str(&text.replace('$', "$$")),
        CommandPart::In => command.push_str("${in}"),
        CommandPart::Out => command.push_str("${out}"),
      }
    }
    command
  }

  fn push_literal(&mut self, text: &str) {
    if let Some(CommandPart::Literal(last)) = self.parts.last_mut() {
      last.push_str(text);
    } else {
      self.parts.push(CommandPart::Literal(text.to_string()));
    }
  }
}

impl fmt::Display for ResolvedCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for part in &self.parts {
      match part {
        CommandPart::Literal(text) => f.write_str(text)?,
        CommandPart::In => f.write_str("${in}")?,
        CommandPart::Out => f.write_str("${out}")?,
      }
    }
    Ok(())
  }
}

impl Serialize for ResolvedCommand {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

fn join_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|p| p.to_string_lossy())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Expands command templates for one module.
pub struct TemplateExpander<'a> {
  tools: &'a ToolTable,
  gen_dir: &'a Path,
}

impl<'a> TemplateExpander<'a> {
  pub fn new(tools: &'a ToolTable, gen_dir: &'a Path) -> Self {
    Self { tools, gen_dir }
  }

  /// Expand `template` in a single left-to-right pass.
  ///
  /// Substituted values are never rescanned for placeholders.
  ///
  /// # Errors
  ///
  /// The first of:
  /// - [`GenerateError::TemplateSyntax`] for malformed `$` usage
  /// - [`GenerateError::UnknownVariable`] for a name outside the table
  /// - [`GenerateError::UnknownLocationLabel`] for an undeclared tool label
  /// - [`GenerateError::Configuration`] for `$(location)` with no tools at all
  pub fn expand(&self, template: &str) -> Result<ResolvedCommand, GenerateError> {
    let mut command = ResolvedCommand::default();

    for segment in placeholder::parse(template)? {
      match segment {
        Segment::Literal(text) => command.push_literal(&text),
        Segment::Variable(variable) => {
          let builtin = lookup(&variable).ok_or_else(|| GenerateError::UnknownVariable(variable.to_string()))?;
          match builtin {
            Builtin::Location => {
              let path = self.location(variable.arg.as_deref())?;
              command.push_literal(&path.to_string_lossy());
            }
            Builtin::In => command.parts.push(CommandPart::In),
            Builtin::Out => command.parts.push(CommandPart::Out),
            Builtin::GenDir => command.push_literal(&self.gen_dir.to_string_lossy()),
          }
        }
      }
    }

    Ok(command)
  }

  fn location(&self, label: Option<&str>) -> Result<&Path, GenerateError> {
    match label {
      Some(label) => self
        .tools
        .get(label)
        .ok_or_else(|| GenerateError::UnknownLocationLabel(label.to_string())),
      None => self
        .tools
        .first()
        .ok_or_else(|| GenerateError::Configuration("$(location) used but no tools are declared".to_string())),
    }
  }
}
