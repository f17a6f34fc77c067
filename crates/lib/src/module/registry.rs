//! Module type registry.

use std::collections::BTreeMap;

use super::Module;
use super::generator::{GENRULE, GENSRCS, Generator};
use super::host_tool::{HOST_TOOL, HostTool};
use crate::blueprint::{BlueprintError, ModuleDecl};
use crate::error::ModuleError;

/// Builds a module from its declaration.
pub type ModuleFactory = fn(&ModuleDecl) -> Result<Box<dyn Module>, ModuleError>;

/// Maps module type names to factories.
///
/// Evaluation is handed a registry explicitly; there is no global one.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
  factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with `genrule`, `gensrcs` and `host_tool`.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry.register(GENRULE, Generator::genrule);
    registry.register(GENSRCS, Generator::gensrcs);
    registry.register(HOST_TOOL, HostTool::factory);
    registry
  }

  /// Register `factory` under `type_name`, replacing any previous one.
  pub fn register(&mut self, type_name: &str, factory: ModuleFactory) {
    self.factories.insert(type_name.to_string(), factory);
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.factories.contains_key(type_name)
  }

  /// Registered type names, sorted.
  pub fn type_names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  /// Instantiate the module declared by `decl`.
  ///
  /// # Errors
  ///
  /// - [`BlueprintError::UnknownType`] if the type is not registered
  /// - [`BlueprintError::Declaration`] if the factory rejects the declaration
  pub fn create(&self, decl: &ModuleDecl) -> Result<Box<dyn Module>, BlueprintError> {
    let factory = self
      .factories
      .get(&decl.module_type)
      .ok_or_else(|| BlueprintError::UnknownType {
        module: decl.name.clone(),
        module_type: decl.module_type.clone(),
      })?;
    factory(decl).map_err(BlueprintError::Declaration)
  }
}
