//! Blueprint evaluation.
//!
//! Evaluation instantiates every declared module through a
//! [`ModuleRegistry`], orders them so each module generates after its
//! dependencies, and generates them one by one into an [`ActionStore`].
//!
//! Blueprint-level problems (unreadable file, unknown type, rejected
//! declaration, duplicate name, dependency cycle) stop evaluation. A module
//! that fails to generate only takes down the modules that depend on it;
//! everything else is still generated.
//!
//! # Submodules
//!
//! - [`dag`] - the module dependency graph
//! - [`manifest`] - serializable summary of an evaluation

pub mod dag;
pub mod manifest;

pub use dag::ModuleGraph;
pub use manifest::{ErrorEntry, Manifest, ModuleEntry};

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::action::ActionStore;
use crate::blueprint::{Blueprint, BlueprintError};
use crate::error::{GenerateError, ModuleError};
use crate::module::{Module, ModuleContext, ModuleRegistry};
use crate::paths::PathContext;

/// The outcome of evaluating a blueprint.
#[derive(Debug)]
pub struct Evaluation {
  store: ActionStore,
  modules: BTreeMap<String, Box<dyn Module>>,
  order: Vec<String>,
  errors: Vec<ModuleError>,
}

impl Evaluation {
  /// Every action emitted, in generation order.
  pub fn store(&self) -> &ActionStore {
    &self.store
  }

  /// Module instances, after generation.
  pub fn module(&self, name: &str) -> Option<&dyn Module> {
    self.modules.get(name).map(|module| &**module)
  }

  /// Modules in the order they were generated.
  pub fn modules(&self) -> impl Iterator<Item = &dyn Module> {
    self.order.iter().filter_map(|name| self.module(name))
  }

  /// Module names in generation order.
  pub fn order(&self) -> &[String] {
    &self.order
  }

  /// Errors of modules that failed, in generation order.
  pub fn errors(&self) -> &[ModuleError] {
    &self.errors
  }

  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn manifest(&self) -> Manifest<'_> {
    Manifest::new(self)
  }
}

/// Evaluate `blueprint`, constructing paths with `paths`.
///
/// # Errors
///
/// A [`BlueprintError`] if the blueprint as a whole cannot be evaluated.
/// Per-module failures are collected in [`Evaluation::errors`].
pub fn evaluate(
  blueprint: &Blueprint,
  registry: &ModuleRegistry,
  paths: &PathContext,
) -> Result<Evaluation, BlueprintError> {
  info!(
    modules = blueprint.modules.len(),
    source_root = %paths.source_root().display(),
    out_root = %paths.out_root().display(),
    "evaluating blueprint"
  );

  let mut declared = Vec::with_capacity(blueprint.modules.len());
  let mut seen = HashSet::new();
  for decl in &blueprint.modules {
    if !seen.insert(decl.name.as_str()) {
      return Err(BlueprintError::DuplicateModule(decl.name.clone()));
    }
    declared.push(registry.create(decl)?);
  }

  let graph = ModuleGraph::new(
    declared
      .iter()
      .map(|module| (module.name(), module.dependencies())),
  )?;
  let order: Vec<String> = graph.order().into_iter().map(str::to_string).collect();

  let mut modules: BTreeMap<String, Box<dyn Module>> = declared
    .into_iter()
    .map(|module| (module.name().to_string(), module))
    .collect();
  let mut store = ActionStore::new();
  let mut errors = Vec::new();
  let mut failed: HashSet<String> = HashSet::new();

  for name in &order {
    let Some(mut module) = modules.remove(name) else {
      continue;
    };

    let failed_dep = graph.dependencies(name).into_iter().find(|dep| failed.contains(*dep));
    let result = match failed_dep {
      Some(dep) => Err(ModuleError::new(
        name,
        None,
        GenerateError::DependencyFailed(dep.to_string()),
      )),
      None => {
        let dir = module.dir().to_string();
        let mut ctx = ModuleContext::new(name, &dir, paths, &modules, &mut store);
        module.generate(&mut ctx)
      }
    };

    match result {
      Ok(()) => debug!(
        module = %name,
        module_type = module.type_name(),
        actions = store.actions_for(name).count(),
        "generated module"
      ),
      Err(err) => {
        warn!(module = %name, error = %err, "module failed");
        failed.insert(name.clone());
        errors.push(err);
      }
    }

    modules.insert(name.clone(), module);
  }

  info!(
    modules = order.len(),
    actions = store.len(),
    failed = errors.len(),
    "evaluation complete"
  );

  Ok(Evaluation {
    store,
    modules,
    order,
    errors,
  })
}

/// Load and evaluate the blueprint at `path`.
///
/// Sources resolve against the blueprint's directory. Outputs go under
/// `out_dir` if given, else `GENRULE_OUT_DIR`, else `<blueprint dir>/out`.
pub fn evaluate_file(
  path: &Path,
  registry: &ModuleRegistry,
  out_dir: Option<&Path>,
) -> Result<Evaluation, BlueprintError> {
  let blueprint = Blueprint::load(path)?;
  let paths = PathContext::for_blueprint(path, out_dir);
  evaluate(&blueprint, registry, &paths)
}
