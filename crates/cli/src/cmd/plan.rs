//! Implementation of the `genrule plan` command.
//!
//! Evaluates a blueprint and writes the resulting manifest (modules, actions
//! and errors) to `<out>/genrule.manifest.json`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use genrule_lib::consts::MANIFEST_FILE_NAME;

use super::{evaluate_blueprint, report_errors};
use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

pub fn cmd_plan(blueprint: &Path, out_dir: Option<&Path>, output: OutputFormat) -> Result<()> {
  let (eval, paths) = evaluate_blueprint(blueprint, out_dir)?;
  let manifest = eval.manifest();

  fs::create_dir_all(paths.out_root())
    .with_context(|| format!("Failed to create output directory: {}", paths.out_root().display()))?;
  let manifest_path = paths.out_root().join(MANIFEST_FILE_NAME);
  let manifest_json = manifest.to_json().context("Failed to serialize manifest")?;
  fs::write(&manifest_path, &manifest_json)
    .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

  if output.is_json() {
    print_json(&manifest)?;
  } else {
    report_errors(&eval);
    if eval.is_success() {
      print_success("Plan complete");
    } else {
      print_warning("Plan complete with errors");
    }
    print_stat("Modules", &manifest.modules.len().to_string());
    print_stat("Actions", &manifest.actions.len().to_string());
    print_stat("Failed", &manifest.errors.len().to_string());
    print_stat("Manifest", &manifest_path.display().to_string());
  }

  if !eval.is_success() {
    bail!("{} module(s) failed", eval.errors().len());
  }

  Ok(())
}
