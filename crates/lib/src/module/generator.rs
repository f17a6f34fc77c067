//! `genrule` and `gensrcs`: modules that run a command to generate files.
//!
//! Both share one engine ([`Generator`]) and differ only in their
//! [`TaskPlanner`]:
//!
//! - `genrule` runs the command once over all sources to produce the declared
//!   `out` files
//! - `gensrcs` runs the command once per source, producing one file named
//!   after the source with `output_extension`
//!
//! Generation validates the declaration, resolves tools, expands `cmd`
//! once, plans tasks and emits one action per task. Nothing reaches the sink
//! unless every step succeeds.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{Module, ModuleContext, module_references};
use crate::action::{ActionEmitter, GeneratedOutputSet};
use crate::blueprint::ModuleDecl;
use crate::error::{GenerateError, ModuleError, Property};
use crate::expand::TemplateExpander;
use crate::sources;
use crate::task::{AggregatePlanner, PerInputPlanner, TaskPlanner};
use crate::tool::{ToolResolver, ToolSpec};

pub const GENRULE: &str = "genrule";
pub const GENSRCS: &str = "gensrcs";

/// Properties shared by every generator module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorProperties {
  /// Command template. Supports `$(location)`, `$(location <label>)`,
  /// `$(in)`, `$(out)`, `$(genDir)` and `$$`.
  pub cmd: String,
  /// Modules that build the host executables used by `cmd`.
  pub tools: Vec<String>,
  /// Files in the module directory used as tools.
  pub tool_files: Vec<String>,
  pub srcs: Vec<String>,
  pub exclude_srcs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenRuleProperties {
  cmd: String,
  #[serde(default)]
  tools: Vec<String>,
  #[serde(default)]
  tool_files: Vec<String>,
  #[serde(default)]
  srcs: Vec<String>,
  #[serde(default)]
  exclude_srcs: Vec<String>,
  /// Names of the generated files.
  #[serde(default)]
  out: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenSrcsProperties {
  cmd: String,
  #[serde(default)]
  tools: Vec<String>,
  #[serde(default)]
  tool_files: Vec<String>,
  #[serde(default)]
  srcs: Vec<String>,
  #[serde(default)]
  exclude_srcs: Vec<String>,
  /// Extension substituted onto each source's name.
  #[serde(default)]
  output_extension: String,
}

/// A module that generates files by running a command.
#[derive(Debug)]
pub struct Generator {
  name: String,
  dir: String,
  type_name: &'static str,
  properties: GeneratorProperties,
  planner: Box<dyn TaskPlanner>,
  outputs: Option<GeneratedOutputSet>,
}

impl Generator {
  pub fn new(
    name: &str,
    dir: &str,
    type_name: &'static str,
    properties: GeneratorProperties,
    planner: Box<dyn TaskPlanner>,
  ) -> Self {
    Self {
      name: name.to_string(),
      dir: dir.to_string(),
      type_name,
      properties,
      planner,
      outputs: None,
    }
  }

  /// Factory for `genrule` modules.
  pub fn genrule(decl: &ModuleDecl) -> Result<Box<dyn Module>, ModuleError> {
    let props: GenRuleProperties = decl.properties()?;
    validate_out(&decl.name, &props.out)?;

    let properties = GeneratorProperties {
      cmd: props.cmd,
      tools: props.tools,
      tool_files: props.tool_files,
      srcs: props.srcs,
      exclude_srcs: props.exclude_srcs,
    };
    let planner = AggregatePlanner::new(props.out);
    Ok(Box::new(Self::new(&decl.name, &decl.dir, GENRULE, properties, Box::new(planner))))
  }

  /// Factory for `gensrcs` modules.
  pub fn gensrcs(decl: &ModuleDecl) -> Result<Box<dyn Module>, ModuleError> {
    let props: GenSrcsProperties = decl.properties()?;
    if props.output_extension.trim_start_matches('.').is_empty() {
      return Err(ModuleError::new(
        &decl.name,
        Some(Property::OutputExtension),
        GenerateError::Configuration("an output extension is required".to_string()),
      ));
    }

    let properties = GeneratorProperties {
      cmd: props.cmd,
      tools: props.tools,
      tool_files: props.tool_files,
      srcs: props.srcs,
      exclude_srcs: props.exclude_srcs,
    };
    let planner = PerInputPlanner::new(&props.output_extension);
    Ok(Box::new(Self::new(&decl.name, &decl.dir, GENSRCS, properties, Box::new(planner))))
  }
}

/// `out` must be non-empty, free of duplicates and stay inside the
/// generation directory.
fn validate_out(module: &str, out: &[String]) -> Result<(), ModuleError> {
  let invalid = |message: String| ModuleError::new(module, Some(Property::Out), GenerateError::Configuration(message));

  if out.is_empty() {
    return Err(invalid("at least one output file is required".to_string()));
  }

  let mut seen = HashSet::new();
  for name in out {
    let escapes = Path::new(name)
      .components()
      .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if name.is_empty() || escapes {
      return Err(invalid(format!(
        "output {name:?} must be a relative path inside the generation directory"
      )));
    }

    // `x` and `./x` name the same file
    let normalized: PathBuf = Path::new(name)
      .components()
      .filter(|c| !matches!(c, Component::CurDir))
      .collect();
    if normalized.as_os_str().is_empty() {
      return Err(invalid(format!(
        "output {name:?} must be a relative path inside the generation directory"
      )));
    }
    if !seen.insert(normalized) {
      return Err(invalid(format!("output {name:?} is listed more than once")));
    }
  }

  Ok(())
}

impl Module for Generator {
  fn name(&self) -> &str {
    &self.name
  }

  fn type_name(&self) -> &'static str {
    self.type_name
  }

  fn dir(&self) -> &str {
    &self.dir
  }

  fn dependencies(&self) -> Vec<String> {
    let mut deps = self.properties.tools.clone();
    deps.extend(module_references(&self.properties.srcs));
    deps.extend(module_references(&self.properties.exclude_srcs));
    deps
  }

  fn generated_sources(&self) -> Option<&GeneratedOutputSet> {
    self.outputs.as_ref()
  }

  fn generate(&mut self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
    let props = &self.properties;

    let specs = ToolSpec::from_declaration(&props.tools, &props.tool_files);
    if specs.is_empty() {
      return Err(ctx.module_error(GenerateError::Configuration(
        "at least one `tools` or `tool_files` is required".to_string(),
      )));
    }

    let mut resolver = ToolResolver::new();
    for spec in &specs {
      resolver
        .resolve(spec, &*ctx)
        .map_err(|e| ctx.property_error(spec.property(), e))?;
    }
    let tools = resolver.finish();

    let gen_dir = ctx.gen_dir();
    let command = TemplateExpander::new(&tools.table, &gen_dir)
      .expand(&props.cmd)
      .map_err(|e| ctx.property_error(Property::Cmd, e))?;

    let srcs = sources::expand(&props.srcs, &*ctx).map_err(|e| ctx.property_error(Property::Srcs, e))?;
    let excluded =
      sources::expand(&props.exclude_srcs, &*ctx).map_err(|e| ctx.property_error(Property::ExcludeSrcs, e))?;
    let tasks = self.planner.plan(sources::exclude(srcs, &excluded), &gen_dir);

    let mut outputs = GeneratedOutputSet::new(gen_dir);
    let actions: Vec<_> = {
      let mut emitter = ActionEmitter::new(&command, &tools.implicits, &mut outputs);
      tasks.into_iter().map(|task| emitter.emit(task)).collect()
    };

    let count = actions.len();
    ctx.submit(actions).map_err(|e| ctx.module_error(e))?;

    debug!(module = %self.name, actions = count, command = %command, "generated module");
    self.outputs = Some(outputs);
    Ok(())
  }
}
