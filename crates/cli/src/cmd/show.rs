//! Implementation of the `genrule show` command.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::Serialize;

use genrule_lib::action::BuildAction;
use genrule_lib::tool::HostToolCapability;

use super::evaluate_blueprint;
use crate::output::{OutputFormat, print_error, print_info, print_json, print_mapping, print_stat};

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
  name: &'a str,
  #[serde(rename = "type")]
  module_type: &'static str,
  dir: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  tool_path: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  gen_dir: Option<&'a Path>,
  outputs: &'a [PathBuf],
  actions: Vec<&'a BuildAction>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

pub fn cmd_show(blueprint: &Path, name: &str, out_dir: Option<&Path>, output: OutputFormat) -> Result<()> {
  let (eval, _) = evaluate_blueprint(blueprint, out_dir)?;

  let Some(module) = eval.module(name) else {
    bail!("Module {:?} is not declared in {}", name, blueprint.display());
  };

  let generated = module.generated_sources();
  let tool_path = match module.host_tool_path() {
    HostToolCapability::HasToolPath(path) => Some(path),
    HostToolCapability::CapabilityUnset | HostToolCapability::NoCapability => None,
  };
  let show = ShowOutput {
    name: module.name(),
    module_type: module.type_name(),
    dir: module.dir(),
    tool_path,
    gen_dir: generated.map(|outputs| outputs.gen_dir()),
    outputs: generated.map(|outputs| outputs.files()).unwrap_or_default(),
    actions: eval.store().actions_for(name).collect(),
    error: eval
      .errors()
      .iter()
      .find(|err| err.module == name)
      .map(|err| err.to_string()),
  };

  if output.is_json() {
    return print_json(&show);
  }

  print_info(&format!("{} ({})", show.name, show.module_type));
  print_stat("Dir", show.dir);
  if let Some(path) = &show.tool_path {
    print_stat("Tool", &path.display().to_string());
  }
  if let Some(gen_dir) = show.gen_dir {
    print_stat("Gen dir", &gen_dir.display().to_string());
  }

  if let Some(first) = show.actions.first() {
    print_stat("Command", &first.command.to_string());
    print_stat("Actions", &show.actions.len().to_string());
    for action in &show.actions {
      print_mapping(&join(&action.inputs), &join(&action.outputs));
    }
  }

  if let Some(error) = &show.error {
    print_error(error);
  }

  Ok(())
}

fn join(paths: &[PathBuf]) -> String {
  if paths.is_empty() {
    return "-".to_string();
  }
  paths
    .iter()
    .map(|path| path.display().to_string())
    .collect::<Vec<_>>()
    .join(" ")
}
