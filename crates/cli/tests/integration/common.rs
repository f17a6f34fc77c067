//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary source tree holding a `blueprint.json`.
pub struct TestEnv {
  pub temp: TempDir,
  pub blueprint_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `blueprint.json` file.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let blueprint_path = temp.path().join("blueprint.json");
    std::fs::write(&blueprint_path, fixture_content(name)).unwrap();
    Self { temp, blueprint_path }
  }

  /// Write a file relative to the source root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Canonical source root, as the CLI resolves it.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Default output root.
  pub fn out_path(&self) -> PathBuf {
    self.root().join("out")
  }

  /// Read a JSON file relative to the source root.
  pub fn read_json(&self, relative_path: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap();
    serde_json::from_str(&content).unwrap()
  }

  /// Get a Command for the genrule binary with no inherited output root.
  pub fn genrule_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("genrule");
    cmd.env_remove("GENRULE_OUT_DIR");
    cmd.current_dir(self.temp.path());
    cmd
  }
}
