use std::path::PathBuf;

use genrule_lib::error::{GenerateError, Property};

use super::common::SourceTree;

// =============================================================================
// Realistic Scenario Tests
// =============================================================================

#[test]
fn genrule_with_file_tool() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "result", "cmd": "$(location) $(in) > $(out)",
        "tool_files": ["gen.sh"], "srcs": ["a.txt"], "out": ["result.txt"] }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  let actions: Vec<_> = eval.store().actions_for("result").collect();
  assert_eq!(actions.len(), 1);

  let gen_sh = tree.root().join("gen.sh");
  let result = tree.out().join("gen/result/result.txt");
  assert_eq!(actions[0].command.to_string(), format!("{} ${{in}} > ${{out}}", gen_sh.display()));
  assert_eq!(actions[0].inputs, vec![tree.root().join("a.txt")]);
  assert_eq!(actions[0].outputs, vec![result.clone()]);
  assert_eq!(actions[0].implicits, vec![gen_sh.clone()]);

  assert_eq!(
    actions[0].command.substitute(&actions[0].inputs, &actions[0].outputs),
    format!(
      "{} {} > {}",
      gen_sh.display(),
      tree.root().join("a.txt").display(),
      result.display()
    )
  );
}

#[test]
fn gensrcs_over_globbed_protos() {
  let tree = SourceTree::new();
  tree
    .touch("proto/y.proto")
    .touch("proto/x.proto")
    .touch("proto/README.md");

  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "host_tool", "name": "protoc", "src": "prebuilts/protoc" },
      { "type": "gensrcs", "name": "protos", "dir": "proto",
        "cmd": "$(location protoc) --go_out=$(genDir) $(in)",
        "tools": ["protoc"], "srcs": ["*.proto"], "output_extension": ".pb.go" }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  let gen_dir = tree.out().join("gen/proto/protos");
  let outputs = eval.module("protos").unwrap().generated_sources().unwrap();
  assert_eq!(outputs.gen_dir(), gen_dir);
  assert_eq!(outputs.files(), &[gen_dir.join("x.pb.go"), gen_dir.join("y.pb.go")]);

  let actions: Vec<_> = eval.store().actions_for("protos").collect();
  assert_eq!(actions.len(), 2);
  assert_eq!(actions[0].inputs, vec![tree.root().join("proto/x.proto")]);
  assert_eq!(actions[1].inputs, vec![tree.root().join("proto/y.proto")]);
  for action in &actions {
    assert_eq!(action.implicits, vec![tree.root().join("prebuilts/protoc")]);
  }
}

#[test]
fn gensrcs_recursive_glob_mirrors_source_tree() {
  let tree = SourceTree::new();
  tree.touch("proto/a/x.proto").touch("proto/b/x.proto");

  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "gensrcs", "name": "protos", "dir": "proto", "cmd": "$(location) $(in) > $(out)",
        "tool_files": ["gen.sh"], "srcs": ["**/*.proto"], "output_extension": ".pb.go" }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  let gen_dir = tree.out().join("gen/proto/protos");
  let actions: Vec<_> = eval.store().actions_for("protos").collect();
  assert_eq!(actions.len(), 2);
  assert_eq!(actions[0].inputs, vec![tree.root().join("proto/a/x.proto")]);
  assert_eq!(actions[0].outputs, vec![gen_dir.join("a/x.pb.go")]);
  assert_eq!(actions[1].inputs, vec![tree.root().join("proto/b/x.proto")]);
  assert_eq!(actions[1].outputs, vec![gen_dir.join("b/x.pb.go")]);
}

#[test]
fn escaped_dollar_stays_literal() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "echo $$(out) > $(out)", "tool_files": ["t"], "out": ["o"] }
    ] }"#,
  );

  let action = eval.store().actions_for("g").next().unwrap();
  assert_eq!(action.command.to_string(), "echo $(out) > ${out}");
  assert_eq!(action.command.to_ninja(), "echo $$(out) > ${out}");
}

#[test]
fn module_and_file_tools_by_label() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "host_tool", "name": "stamper", "dir": "tools", "src": "stamper" },
      { "type": "genrule", "name": "g", "dir": "lib",
        "cmd": "$(location stamper) --template $(location header.tmpl) $(in) > $(out)",
        "tools": ["stamper"], "tool_files": ["header.tmpl"], "srcs": ["v.txt"], "out": ["v.h"] }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  let action = eval.store().actions_for("g").next().unwrap();
  let stamper = tree.root().join("tools/stamper");
  let template = tree.root().join("lib/header.tmpl");
  assert_eq!(
    action.command.to_string(),
    format!("{} --template {} ${{in}} > ${{out}}", stamper.display(), template.display())
  );
  assert_eq!(action.implicits, vec![stamper, template]);
}

#[test]
fn multiple_outputs_share_one_action() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "split", "cmd": "$(location) $(in) $(genDir)", "tool_files": ["split.py"],
        "srcs": ["table.csv"], "out": ["a.h", "sub/b.h"] }
    ] }"#,
  );

  let actions: Vec<_> = eval.store().actions_for("split").collect();
  assert_eq!(actions.len(), 1);
  let gen_dir = tree.out().join("gen/split");
  assert_eq!(actions[0].outputs, vec![gen_dir.join("a.h"), gen_dir.join("sub/b.h")]);
}

#[test]
fn gensrcs_without_sources_emits_nothing() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "gensrcs", "name": "none", "cmd": "$(location) $(in)", "tool_files": ["t"],
        "srcs": ["*.idl"], "output_extension": "h" }
    ] }"#,
  );

  assert!(eval.is_success());
  assert!(eval.store().is_empty());
  assert!(eval.module("none").unwrap().generated_sources().unwrap().files().is_empty());
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn unknown_location_label() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "$(location my_tool)", "tool_files": ["other_tool"], "out": ["o"] }
    ] }"#,
  );

  let err = &eval.errors()[0];
  assert_eq!(err.property, Some(Property::Cmd));
  assert_eq!(err.error, GenerateError::UnknownLocationLabel("my_tool".to_string()));
  assert!(eval.store().is_empty());
}

#[test]
fn no_tools_is_configuration_error() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "$(nonsense)", "out": ["o"] }
    ] }"#,
  );

  let err = &eval.errors()[0];
  assert_eq!(err.property, None);
  assert!(matches!(err.error, GenerateError::Configuration(_)));
  assert!(eval.store().is_empty());
}

#[test]
fn unknown_variable() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "$(location) $(outdir)", "tool_files": ["t"], "out": ["o"] }
    ] }"#,
  );

  assert_eq!(eval.errors()[0].error, GenerateError::UnknownVariable("$(outdir)".to_string()));
}

#[test]
fn template_syntax_error() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "$(location", "tool_files": ["t"], "out": ["o"] }
    ] }"#,
  );

  let err = &eval.errors()[0];
  assert_eq!(err.property, Some(Property::Cmd));
  assert!(matches!(err.error, GenerateError::TemplateSyntax(_)));
}

#[test]
fn source_reference_to_tool_module() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "host_tool", "name": "protoc", "src": "protoc" },
      { "type": "genrule", "name": "g", "cmd": "$(location)", "tool_files": ["t"], "srcs": [":protoc"], "out": ["o"] }
    ] }"#,
  );

  let err = &eval.errors()[0];
  assert_eq!(err.property, Some(Property::Srcs));
  assert!(matches!(err.error, GenerateError::Sources(_)));
}

#[test]
fn genrule_as_module_tool() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "gen_tool", "cmd": "$(location)", "tool_files": ["t"], "out": ["tool"] },
      { "type": "genrule", "name": "g", "cmd": "$(location)", "tools": ["gen_tool"], "out": ["o"] }
    ] }"#,
  );

  let err = &eval.errors()[0];
  assert_eq!(err.module, "g");
  assert_eq!(err.property, Some(Property::Tools));
  assert!(matches!(err.error, GenerateError::DependencyCapability(_)));
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn dotfiles_and_extensionless_sources() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "gensrcs", "name": "g", "cmd": "$(location) $(in) $(out)", "tool_files": ["t"],
        "srcs": [".bashrc", "Makefile", "archive.tar.gz"], "output_extension": "out" }
    ] }"#,
  );

  let gen_dir = tree.out().join("gen/g");
  let outputs: Vec<PathBuf> = eval.module("g").unwrap().generated_sources().unwrap().files().to_vec();
  assert_eq!(
    outputs,
    vec![
      gen_dir.join(".bashrc.out"),
      gen_dir.join("Makefile.out"),
      gen_dir.join("archive.tar.out"),
    ]
  );
}

#[test]
fn same_tool_declared_twice() {
  let tree = SourceTree::new();
  let eval = tree.evaluate(
    r#"{ "modules": [
      { "type": "genrule", "name": "g", "cmd": "$(location gen.sh)", "tool_files": ["gen.sh", "gen.sh"], "out": ["o"] }
    ] }"#,
  );

  assert!(eval.is_success(), "{:?}", eval.errors());
  let action = eval.store().actions_for("g").next().unwrap();
  assert_eq!(action.implicits, vec![tree.root().join("gen.sh")]);
}
