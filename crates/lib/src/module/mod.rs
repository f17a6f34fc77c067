//! Module types and the context they generate in.
//!
//! A [`Module`] is one declared unit of the blueprint. During evaluation each
//! module is handed a [`ModuleContext`] giving it path construction, a view of
//! the modules it depends on, and the action sink.
//!
//! # Submodules
//!
//! - [`generator`] - `genrule` and `gensrcs`
//! - [`host_tool`] - `host_tool`, a prebuilt host executable
//! - [`registry`] - module type name to factory mapping

pub mod generator;
pub mod host_tool;
pub mod registry;

pub use generator::{Generator, GeneratorProperties};
pub use host_tool::HostTool;
pub use registry::{ModuleFactory, ModuleRegistry};

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::action::{ActionSink, BuildAction, GeneratedOutputSet, SinkError};
use crate::consts::MODULE_REF_PREFIX;
use crate::error::{GenerateError, ModuleError, Property};
use crate::paths::PathContext;
use crate::sources::{SourceContext, SourceError, SourceFile};
use crate::tool::{HostToolCapability, ToolContext};

/// A declared module.
pub trait Module: fmt::Debug {
  fn name(&self) -> &str;

  /// The module type, as written in the blueprint.
  fn type_name(&self) -> &'static str;

  /// Source directory relative to the blueprint root.
  fn dir(&self) -> &str;

  /// Names of modules that must be generated before this one.
  fn dependencies(&self) -> Vec<String> {
    Vec::new()
  }

  /// Whether this module provides a host executable, and where.
  fn host_tool_path(&self) -> HostToolCapability {
    HostToolCapability::NoCapability
  }

  /// Files generated by this module, once generated.
  fn generated_sources(&self) -> Option<&GeneratedOutputSet> {
    None
  }

  /// Produce this module's actions.
  fn generate(&mut self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError>;
}

/// Names referenced as `:name` in a source list.
pub(crate) fn module_references(specs: &[String]) -> impl Iterator<Item = String> + '_ {
  specs
    .iter()
    .filter_map(|spec| spec.strip_prefix(MODULE_REF_PREFIX))
    .map(str::to_string)
}

/// Everything a module may use while generating.
pub struct ModuleContext<'a> {
  name: &'a str,
  dir: &'a str,
  paths: &'a PathContext,
  modules: &'a BTreeMap<String, Box<dyn Module>>,
  sink: &'a mut dyn ActionSink,
}

impl<'a> ModuleContext<'a> {
  /// `modules` are the other modules of the blueprint; the one being
  /// generated is not among them.
  pub fn new(
    name: &'a str,
    dir: &'a str,
    paths: &'a PathContext,
    modules: &'a BTreeMap<String, Box<dyn Module>>,
    sink: &'a mut dyn ActionSink,
  ) -> Self {
    Self {
      name,
      dir,
      paths,
      modules,
      sink,
    }
  }

  pub fn name(&self) -> &str {
    self.name
  }

  pub fn dir(&self) -> &str {
    self.dir
  }

  pub fn paths(&self) -> &PathContext {
    self.paths
  }

  /// This module's generation directory.
  pub fn gen_dir(&self) -> PathBuf {
    self.paths.module_gen_dir(self.dir, self.name)
  }

  /// Hand this module's actions to the sink.
  pub fn submit(&mut self, actions: Vec<BuildAction>) -> Result<(), SinkError> {
    self.sink.submit(self.name, actions)
  }

  /// An error attributed to one of this module's properties.
  pub fn property_error(&self, property: Property, error: impl Into<GenerateError>) -> ModuleError {
    ModuleError::new(self.name, Some(property), error.into())
  }

  /// An error attributed to the module as a whole.
  pub fn module_error(&self, error: impl Into<GenerateError>) -> ModuleError {
    ModuleError::new(self.name, None, error.into())
  }
}

impl ToolContext for ModuleContext<'_> {
  fn host_tool(&self, name: &str) -> Option<HostToolCapability> {
    self.modules.get(name).map(|module| module.host_tool_path())
  }

  fn module_src(&self, rel: &str) -> PathBuf {
    self.paths.module_src(self.dir, rel)
  }
}

impl SourceContext for ModuleContext<'_> {
  fn module_src_dir(&self) -> PathBuf {
    self.paths.module_src_dir(self.dir)
  }

  fn module_src(&self, rel: &str) -> PathBuf {
    self.paths.module_src(self.dir, rel)
  }

  fn generated_sources(&self, name: &str) -> Result<Vec<SourceFile>, SourceError> {
    let module = self
      .modules
      .get(name)
      .ok_or_else(|| SourceError::UndefinedModule(name.to_string()))?;
    let outputs = module
      .generated_sources()
      .ok_or_else(|| SourceError::NoGeneratedSources(name.to_string()))?;
    Ok(
      outputs
        .files()
        .iter()
        .map(|file| SourceFile::new(file.clone(), outputs.gen_dir()))
        .collect(),
    )
  }
}
