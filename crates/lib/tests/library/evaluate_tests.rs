use std::path::Path;

use genrule_lib::blueprint::BlueprintError;
use genrule_lib::error::GenerateError;
use genrule_lib::eval::evaluate_file;
use genrule_lib::module::ModuleRegistry;
use serial_test::serial;

use super::common::SourceTree;

const BLUEPRINT: &str = r#"{
  "modules": [
    { "type": "genrule", "name": "v", "cmd": "$(location) > $(out)", "tool_files": ["v.sh"], "out": ["v.h"] }
  ]
}"#;

fn write_blueprint(tree: &SourceTree, json: &str) -> std::path::PathBuf {
  let path = tree.root().join("blueprint.json");
  std::fs::write(&path, json).unwrap();
  path
}

fn canonical(path: &Path) -> std::path::PathBuf {
  dunce::canonicalize(path).unwrap()
}

#[test]
#[serial]
fn default_out_root_is_next_to_blueprint() {
  let tree = SourceTree::new();
  let path = write_blueprint(&tree, BLUEPRINT);

  let eval = temp_env::with_var_unset("GENRULE_OUT_DIR", || {
    evaluate_file(&path, &ModuleRegistry::with_builtins(), None).unwrap()
  });

  let action = eval.store().actions_for("v").next().unwrap();
  assert_eq!(action.outputs, vec![canonical(tree.root()).join("out/gen/v/v.h")]);
}

#[test]
#[serial]
fn env_overrides_default_and_flag_overrides_env() {
  let tree = SourceTree::new();
  let path = write_blueprint(&tree, BLUEPRINT);
  let registry = ModuleRegistry::with_builtins();

  temp_env::with_var("GENRULE_OUT_DIR", Some("/from-env"), || {
    let eval = evaluate_file(&path, &registry, None).unwrap();
    let action = eval.store().actions_for("v").next().unwrap();
    assert_eq!(action.outputs[0], Path::new("/from-env/gen/v/v.h"));

    let eval = evaluate_file(&path, &registry, Some(Path::new("/from-flag"))).unwrap();
    let action = eval.store().actions_for("v").next().unwrap();
    assert_eq!(action.outputs[0], Path::new("/from-flag/gen/v/v.h"));
  });
}

#[test]
fn missing_blueprint_file() {
  let err = evaluate_file(
    Path::new("/nonexistent/blueprint.json"),
    &ModuleRegistry::with_builtins(),
    None,
  )
  .unwrap_err();
  assert!(matches!(err, BlueprintError::Read { .. }));
}

#[test]
fn tool_cycle_is_blueprint_error() {
  let tree = SourceTree::new();
  let path = write_blueprint(
    &tree,
    r#"{ "modules": [
      { "type": "genrule", "name": "a", "cmd": "x", "tools": ["b"], "out": ["a"] },
      { "type": "genrule", "name": "b", "cmd": "x", "tools": ["a"], "out": ["b"] }
    ] }"#,
  );

  let err = evaluate_file(&path, &ModuleRegistry::with_builtins(), Some(Path::new("/out"))).unwrap_err();
  assert!(matches!(err, BlueprintError::Cycle(_)));
}

#[test]
fn chain_of_generators() {
  let tree = SourceTree::new();
  tree.touch("defs/a.def").touch("defs/b.def");

  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "bundle", "cmd": "$(location) $(in) > $(out)", "tool_files": ["cat.sh"],
        "srcs": [":headers", ":sources"], "out": ["bundle.txt"] },
      { "type": "gensrcs", "name": "sources", "cmd": "$(location) $(in) > $(out)", "tool_files": ["c.sh"],
        "srcs": [":headers"], "output_extension": ".c" },
      { "type": "gensrcs", "name": "headers", "dir": "defs", "cmd": "$(location) $(in) > $(out)",
        "tool_files": ["h.sh"], "srcs": ["*.def"], "output_extension": ".h" }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  assert_eq!(eval.order(), &["headers", "sources", "bundle"]);

  let bundle = eval.store().actions_for("bundle").next().unwrap();
  let headers = tree.out().join("gen/defs/headers");
  let sources = tree.out().join("gen/sources");
  assert_eq!(
    bundle.inputs,
    vec![
      headers.join("a.h"),
      headers.join("b.h"),
      sources.join("a.c"),
      sources.join("b.c"),
    ]
  );
}

#[test]
fn failure_propagates_through_chain() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "gensrcs", "name": "headers", "cmd": "$(bad)", "tool_files": ["h.sh"],
        "srcs": ["a.def"], "output_extension": ".h" },
      { "type": "gensrcs", "name": "sources", "cmd": "$(location) $(in)", "tool_files": ["c.sh"],
        "srcs": [":headers"], "output_extension": ".c" },
      { "type": "genrule", "name": "bundle", "cmd": "$(location) $(in)", "tool_files": ["cat.sh"],
        "srcs": [":sources"], "out": ["bundle.txt"] }
    ] }"#,
  );

  let errors: Vec<_> = eval.errors().iter().map(|e| (e.module.as_str(), &e.error)).collect();
  assert_eq!(errors.len(), 3);
  assert_eq!(errors[1], ("sources", &GenerateError::DependencyFailed("headers".to_string())));
  assert_eq!(errors[2], ("bundle", &GenerateError::DependencyFailed("sources".to_string())));
  assert!(eval.store().is_empty());
}
