//! Tokenizer for command-template placeholders.
//!
//! Command templates are shell-like strings in which tools, files and
//! per-task values are referenced symbolically. This module only splits a
//! template into literal text and placeholder references; deciding what a
//! placeholder means is left to [`crate::expand`].
//!
//! # Grammar
//!
//! - `$(name)` - a placeholder with no argument
//! - `$(name arg)` - a placeholder with an argument (everything after the
//!   first space, trimmed); the name itself is taken verbatim, so `$( in )`
//!   names nothing known
//! - `$$` - a literal `$`; the character after it is never treated as the
//!   start of a placeholder
//!
//! Any other use of `$` is a syntax error, so a typo such as `$in` is reported
//! instead of silently reaching the shell.
//!
//! # Example
//!
//! ```
//! use genrule_lib::placeholder::{parse, Segment, Variable};
//!
//! let segments = parse("$(location) --out=$(genDir)").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Variable(Variable::new("location", None)),
//!     Segment::Literal(" --out=".to_string()),
//!     Segment::Variable(Variable::new("genDir", None)),
//! ]);
//! ```

use std::fmt;

use thiserror::Error;

/// A placeholder reference as written in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
  pub name: String,
  pub arg: Option<String>,
}

impl Variable {
  pub fn new(name: &str, arg: Option<&str>) -> Self {
    Self {
      name: name.to_string(),
      arg: arg.map(str::to_string),
    }
  }

  /// Split a placeholder body into its name and optional argument.
  ///
  /// The name runs up to the first space and is not trimmed. Whatever follows
  /// that space is the argument, trimmed, and present even when blank.
  fn from_body(body: &str) -> Self {
    match body.split_once(' ') {
      Some((name, arg)) => Self {
        name: name.to_string(),
        arg: Some(arg.trim().to_string()),
      },
      None => Self {
        name: body.to_string(),
        arg: None,
      },
    }
  }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.arg {
      Some(arg) => write!(f, "$({} {})", self.name, arg),
      None => write!(f, "$({})", self.name),
    }
  }
}

/// A segment of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text, with `$$` escapes already collapsed to `$`.
  Literal(String),

  /// A placeholder to be expanded.
  Variable(Variable),
}

/// Syntax errors in a command template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("missing ) for placeholder starting at position {0}")]
  MissingClose(usize),

  #[error("expected character after '$' at position {0}")]
  TrailingDollar(usize),

  #[error("unexpected character {ch:?} after '$' at position {pos}")]
  UnexpectedChar { ch: char, pos: usize },

  #[error("expected '(' after '$', did you mean $({0})?")]
  ExpectedParen(String),
}

/// Split a template into literal and placeholder segments.
///
/// Adjacent literal text is merged, so a template without placeholders
/// yields at most one segment.
///
/// # Errors
///
/// Returns the first syntax error encountered, scanning left to right.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek().copied() {
      Some((_, '$')) => {
        chars.next();
        literal.push('$');
      }
      Some((_, '(')) => {
        chars.next();

        let mut body = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == ')' {
            found_close = true;
            break;
          }
          body.push(c);
        }

        if !found_close {
          return Err(PlaceholderError::MissingClose(pos));
        }

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable(Variable::from_body(&body)));
      }
      Some((_, c)) if c.is_whitespace() => {
        return Err(PlaceholderError::UnexpectedChar { ch: c, pos });
      }
      Some((next, _)) => {
        let rest = &input[next..];
        let word = rest.split(char::is_whitespace).next().unwrap_or(rest);
        return Err(PlaceholderError::ExpectedParen(word.to_string()));
      }
      None => return Err(PlaceholderError::TrailingDollar(pos)),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}
