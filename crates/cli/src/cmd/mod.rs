mod ninja;
mod plan;
mod show;
mod types;

pub use ninja::cmd_ninja;
pub use plan::cmd_plan;
pub use show::cmd_show;
pub use types::cmd_types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use genrule_lib::blueprint::Blueprint;
use genrule_lib::eval::{Evaluation, evaluate};
use genrule_lib::module::ModuleRegistry;
use genrule_lib::paths::PathContext;

use crate::output::print_error;

/// Load and evaluate a blueprint with the built-in module types.
pub(crate) fn evaluate_blueprint(path: &Path, out_dir: Option<&Path>) -> Result<(Evaluation, PathContext)> {
  let blueprint =
    Blueprint::load(path).with_context(|| format!("Failed to load blueprint: {}", path.display()))?;
  let paths = PathContext::for_blueprint(path, out_dir);
  debug!(
    source_root = %paths.source_root().display(),
    out_root = %paths.out_root().display(),
    "resolved paths"
  );

  let registry = ModuleRegistry::with_builtins();
  let eval = evaluate(&blueprint, &registry, &paths)
    .with_context(|| format!("Failed to evaluate blueprint: {}", path.display()))?;
  Ok((eval, paths))
}

/// Print every module error to stderr.
pub(crate) fn report_errors(eval: &Evaluation) {
  for err in eval.errors() {
    print_error(&err.to_string());
  }
}
