//! Generation driven by a configuration file

use assert_fs::TempDir;
use assert_fs::prelude::*;
use codegen_core::{
    CodegenConfig, CommentStyle, Error, FileWriter, GeneratedDocument, SaveStatus, TextAssembler,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

const PYTHON_CONFIG: &str = r#"
spaces_per_indent = 4
max_line_length = 40
comment_style = "hash"
file_header = ["Copyright (c) Example Corp."]
"#;

fn python_module(config: &CodegenConfig, path: &std::path::Path) -> GeneratedDocument {
    let mut body = TextAssembler::new(config);
    body.append_line("def handler(event, context):").indent();
    body.manual_section("handler", "pass").unwrap();
    body.unindent();
    GeneratedDocument::new(path, body.finalize()).with_preamble("#!/usr/bin/env python3")
}

#[test]
fn hash_style_project_from_a_config_file() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("codegen.toml");
    config_file.write_str(PYTHON_CONFIG).unwrap();
    let config = CodegenConfig::load(config_file.path()).unwrap();
    assert_eq!(config.comment_style, CommentStyle::Hash);

    let target = temp.child("handler.py");
    let doc = python_module(&config, target.path());
    let writer = FileWriter::new(config.clone());
    writer.save(&doc).unwrap();

    let expected_body = "def handler(event, context):\n    # BEGIN MANUAL SECTION handler\n    pass\n    # END MANUAL SECTION\n";
    target.assert(predicate::str::starts_with(
        "#!/usr/bin/env python3\n# Copyright (c) Example Corp.\n#\n# This file is partially generated.",
    ));
    target.assert(predicate::str::ends_with(expected_body));

    let edited = std::fs::read_to_string(target.path())
        .unwrap()
        .replace("    pass\n", "    return {\"ok\": True}\n");
    target.write_str(&edited).unwrap();

    let report = writer.save(&doc).unwrap();
    assert_eq!(report.status, SaveStatus::Unchanged);
    target.assert(predicate::str::contains("    return {\"ok\": True}\n"));
}

#[test]
fn unknown_config_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.child("codegen.toml");
    config_file.write_str("indent_width = 4\n").unwrap();

    let err = CodegenConfig::load(config_file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
    assert!(err.to_string().contains("codegen.toml"));
}

#[cfg(unix)]
#[test]
fn configured_formatter_runs_before_signing() {
    let temp = TempDir::new().unwrap();
    let config = CodegenConfig::from_toml_str(
        r#"
comment_style = "hash"

[formatter]
command = "sed"
args = ["s/pass/return None/"]
extensions = ["py"]
"#,
    )
    .unwrap();

    let target = temp.child("handler.py");
    let writer = FileWriter::new(config.clone());
    writer.save(&python_module(&config, target.path())).unwrap();
    target.assert(predicate::str::contains("  return None\n"));

    // Formatted output is stable: a second run finds nothing to change
    let report = writer.save(&python_module(&config, target.path())).unwrap();
    assert_eq!(report.status, SaveStatus::Unchanged);

    // Files outside the allow-list are not formatted
    let notes = temp.child("notes.txt");
    writer
        .save(&GeneratedDocument::new(notes.path(), "pass"))
        .unwrap();
    notes.assert(predicate::str::contains("pass\n"));
}

#[cfg(unix)]
#[test]
fn formatter_that_mangles_the_token_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config = CodegenConfig::from_toml_str(
        r#"
[formatter]
command = "tr"
args = ["a-z", "A-Z"]
"#,
    )
    .unwrap();

    let target = temp.child("shout.txt");
    let err = FileWriter::new(config)
        .save(&GeneratedDocument::new(target.path(), "quiet\n"))
        .unwrap_err();
    assert!(matches!(err, Error::SigningToken { found: 0, .. }));
    target.assert(predicate::path::missing());
}
