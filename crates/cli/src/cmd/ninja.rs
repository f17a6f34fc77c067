//! Implementation of the `genrule ninja` command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use genrule_lib::consts::NINJA_FILE_NAME;
use genrule_lib::ninja;

use super::{evaluate_blueprint, report_errors};
use crate::output::{OutputFormat, print_json, print_stat, print_success};

#[derive(Debug, Serialize)]
struct NinjaOutput<'a> {
  path: &'a Path,
  modules: usize,
  actions: usize,
}

pub fn cmd_ninja(blueprint: &Path, out_dir: Option<&Path>, file: Option<&Path>, output: OutputFormat) -> Result<()> {
  let (eval, paths) = evaluate_blueprint(blueprint, out_dir)?;

  if !eval.is_success() {
    report_errors(&eval);
    bail!("Not writing Ninja file: {} module(s) failed", eval.errors().len());
  }

  let path = match file {
    Some(file) => file.to_path_buf(),
    None => paths.out_root().join(NINJA_FILE_NAME),
  };
  let store = eval.store();
  ninja::write(store, &path).with_context(|| format!("Failed to write Ninja file: {}", path.display()))?;

  let result = NinjaOutput {
    path: &path,
    modules: store.modules().len(),
    actions: store.len(),
  };

  if output.is_json() {
    print_json(&result)?;
  } else {
    print_success(&format!("Wrote {}", path.display()));
    print_stat("Rules", &result.modules.to_string());
    print_stat("Builds", &result.actions.to_string());
  }

  Ok(())
}
