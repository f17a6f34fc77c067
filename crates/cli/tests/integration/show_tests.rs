use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn show_generator_module() {
  let env = TestEnv::from_fixture("protos.json");
  env.write_file("proto/x.proto", "");

  env
    .genrule_cmd()
    .arg("show")
    .arg(&env.blueprint_path)
    .arg("protos")
    .assert()
    .success()
    .stdout(predicate::str::contains("protos (gensrcs)"))
    .stdout(predicate::str::contains("--go_out="))
    .stdout(predicate::str::contains("x.pb.go"));
}

#[test]
fn show_host_tool_json() {
  let env = TestEnv::from_fixture("protos.json");

  let output = env
    .genrule_cmd()
    .args(["--output", "json", "show"])
    .arg(&env.blueprint_path)
    .arg("protoc")
    .output()
    .unwrap();
  assert!(output.status.success());

  let show: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(show["type"], "host_tool");
  assert_eq!(
    show["tool_path"],
    env.root().join("prebuilts/protoc").display().to_string()
  );
  assert!(show["actions"].as_array().unwrap().is_empty());
}

#[test]
fn show_failed_module_prints_error() {
  let env = TestEnv::from_fixture("broken.json");

  env
    .genrule_cmd()
    .arg("show")
    .arg(&env.blueprint_path)
    .arg("no_tools")
    .assert()
    .success()
    .stderr(predicate::str::contains("at least one `tools` or `tool_files` is required"));
}
