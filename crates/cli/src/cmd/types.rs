use anyhow::Result;

use genrule_lib::module::ModuleRegistry;

use crate::output::{OutputFormat, print_json};

pub fn cmd_types(output: OutputFormat) -> Result<()> {
  let registry = ModuleRegistry::with_builtins();
  let names: Vec<&str> = registry.type_names().collect();

  if output.is_json() {
    print_json(&names)?;
  } else {
    for name in names {
      println!("{name}");
    }
  }

  Ok(())
}
