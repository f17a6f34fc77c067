//! `host_tool`: a prebuilt executable other modules can use as a tool.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use super::{Module, ModuleContext};
use crate::blueprint::ModuleDecl;
use crate::error::ModuleError;
use crate::tool::HostToolCapability;

pub const HOST_TOOL: &str = "host_tool";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostToolProperties {
  /// Executable path relative to the module directory. Unset means the tool
  /// has no output yet.
  #[serde(default)]
  src: Option<String>,
}

#[derive(Debug)]
pub struct HostTool {
  name: String,
  dir: String,
  src: Option<String>,
  path: Option<PathBuf>,
}

impl HostTool {
  pub fn new(name: &str, dir: &str, src: Option<&str>) -> Self {
    Self {
      name: name.to_string(),
      dir: dir.to_string(),
      src: src.filter(|s| !s.is_empty()).map(str::to_string),
      path: None,
    }
  }

  pub fn factory(decl: &ModuleDecl) -> Result<Box<dyn Module>, ModuleError> {
    let props: HostToolProperties = decl.properties()?;
    Ok(Box::new(Self::new(&decl.name, &decl.dir, props.src.as_deref())))
  }
}

impl Module for HostTool {
  fn name(&self) -> &str {
    &self.name
  }

  fn type_name(&self) -> &'static str {
    HOST_TOOL
  }

  fn dir(&self) -> &str {
    &self.dir
  }

  fn host_tool_path(&self) -> HostToolCapability {
    match &self.path {
      Some(path) => HostToolCapability::HasToolPath(path.clone()),
      None => HostToolCapability::CapabilityUnset,
    }
  }

  fn generate(&mut self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
    self.path = self.src.as_deref().map(|src| ctx.paths().module_src(&self.dir, src));
    debug!(module = %self.name, path = ?self.path, "host tool ready");
    Ok(())
  }
}
