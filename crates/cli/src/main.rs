mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_ninja, cmd_plan, cmd_show, cmd_types};
use output::{OutputFormat, print_error};

/// genrule - generate sources by running commands from a blueprint
#[derive(Parser)]
#[command(name = "genrule")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  /// Output root (default: $GENRULE_OUT_DIR, then <blueprint dir>/out)
  #[arg(long, global = true)]
  out_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a blueprint and write its action manifest
  Plan {
    /// Path to the blueprint file
    #[arg(default_value = "blueprint.json")]
    blueprint: PathBuf,
  },

  /// Evaluate a blueprint and write a Ninja build file
  Ninja {
    /// Path to the blueprint file
    #[arg(default_value = "blueprint.json")]
    blueprint: PathBuf,

    /// Ninja file to write (default: <out>/build.ninja)
    #[arg(short = 'o', long = "file")]
    file: Option<PathBuf>,
  },

  /// Show the resolved command, actions and outputs of one module
  Show {
    /// Path to the blueprint file
    blueprint: PathBuf,

    /// Module name
    module: String,
  },

  /// List the registered module types
  Types,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let out_dir = cli.out_dir.as_deref();
  match cli.command {
    Commands::Plan { blueprint } => cmd_plan(&blueprint, out_dir, cli.output),
    Commands::Ninja { blueprint, file } => cmd_ninja(&blueprint, out_dir, file.as_deref(), cli.output),
    Commands::Show { blueprint, module } => cmd_show(&blueprint, &module, out_dir, cli.output),
    Commands::Types => cmd_types(cli.output),
  }
}
