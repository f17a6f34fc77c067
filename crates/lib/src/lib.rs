//! genrule-lib: command-driven source generation for a build graph.
//!
//! Modules declared in a blueprint (`genrule`, `gensrcs`, `host_tool`) are
//! evaluated in dependency order. Generator modules resolve their tools,
//! expand a command template with `$(...)` placeholders, plan tasks over
//! their sources and emit one [`action::BuildAction`] per task:
//!
//! - [`tool`]: tool resolution into a label-to-path table
//! - [`expand`]: command template expansion into a [`expand::ResolvedCommand`]
//! - [`task`]: per-input and aggregate task planning
//! - [`action`]: action emission and the action sink
//! - [`eval`]: dependency-ordered blueprint evaluation
//! - [`ninja`]: Ninja build file output

pub mod action;
pub mod blueprint;
pub mod consts;
pub mod error;
pub mod eval;
pub mod expand;
pub mod module;
pub mod ninja;
pub mod paths;
pub mod placeholder;
pub mod sources;
pub mod task;
pub mod tool;
