//! End-to-end regeneration scenarios
//!
//! Each test drives a small generator through several runs against a real
//! directory and checks what ends up on disk.

use assert_fs::TempDir;
use assert_fs::prelude::*;
use codegen_blocks::find_region;
use codegen_core::{
    CodegenConfig, Error, FileKind, FileWriter, GeneratedDocument, MergeAction, SaveReport,
    SaveStatus, SignatureCodec, SignatureVerdict, TextAssembler,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A throwaway output directory plus the generator settings for it.
struct TestProject {
    temp_dir: TempDir,
    config: CodegenConfig,
}

impl TestProject {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            config: CodegenConfig::default(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }

    fn write(&self, name: &str, content: &str) {
        self.temp_dir.child(name).write_str(content).unwrap();
    }

    fn save(&self, doc: &GeneratedDocument) -> codegen_core::Result<SaveReport> {
        FileWriter::new(self.config.clone()).save(doc)
    }

    fn verdict(&self, name: &str) -> SignatureVerdict {
        SignatureCodec::new(self.config.region_marker()).verify(&self.read(name))
    }
}

const PREAMBLE: &str = "<?hh // strict";

/// Generates `function extra(): int` with a manual body named `Extra`.
fn extra_generator(project: &TestProject) -> GeneratedDocument {
    let mut body = TextAssembler::new(&project.config);
    body.append_line("function extra(): int {").indent();
    body.manual_section("Extra", "// TODO").unwrap();
    body.unindent().append_line("}");
    GeneratedDocument::new(project.path("extra.php"), body.finalize()).with_preamble(PREAMBLE)
}

/// Generates a record class with one accessor per field.
fn record_generator(project: &TestProject, fields: &[&str]) -> GeneratedDocument {
    let mut body = TextAssembler::new(&project.config);
    body.append_line("final class Record {").indent();
    for field in fields {
        body.ensure_empty_line()
            .append_with_suggested_breaks(&format!(
                "public function get{field}():\tstring {{"
            ))
            .new_line()
            .indent()
            .set_inside_function();
        body.manual_section(&format!("Record::get{field}"), &format!("return $this->{field};"))
            .unwrap();
        body.unindent().append_line("}");
    }
    body.unindent().append_line("}");
    GeneratedDocument::new(project.path("Record.php"), body.finalize())
        .with_doc_comment("Generated from the record schema.")
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn extra_section_edit_survives_regeneration() {
    let project = TestProject::new();

    let first = project.save(&extra_generator(&project)).unwrap();
    assert_eq!(first.status, SaveStatus::Created);
    let written = project.read("extra.php");
    assert!(written.contains("  // TODO\n"));

    project.write("extra.php", &written.replace("// TODO", "return 42;"));
    assert_eq!(
        project.verdict("extra.php"),
        SignatureVerdict::Valid(FileKind::PartiallyGenerated)
    );

    let second = project.save(&extra_generator(&project)).unwrap();
    assert_eq!(second.action, MergeAction::Merged);
    assert_eq!(second.status, SaveStatus::Unchanged);

    let region = find_region(
        &project.read("extra.php"),
        &project.config.region_marker(),
        "Extra",
    )
    .unwrap()
    .unwrap();
    assert_eq!(region.content, "  return 42;\n");
    assert_eq!(
        project.verdict("extra.php"),
        SignatureVerdict::Valid(FileKind::PartiallyGenerated)
    );
}

#[test]
fn generated_text_changes_are_applied_around_manual_edits() {
    let project = TestProject::new();
    project.save(&record_generator(&project, &["Name"])).unwrap();

    let edited = project
        .read("Record.php")
        .replace("return $this->Name;", "return ucfirst($this->Name);");
    project.write("Record.php", &edited);

    let report = project
        .save(&record_generator(&project, &["Name", "Email"]))
        .unwrap();
    assert_eq!(report.status, SaveStatus::Updated);
    assert!(report.dropped.is_empty());

    let content = project.read("Record.php");
    assert!(content.contains("return ucfirst($this->Name);"));
    assert!(content.contains("public function getEmail(): string {"));
    assert!(content.contains("return $this->Email;"));
    assert_eq!(
        project.verdict("Record.php"),
        SignatureVerdict::Valid(FileKind::PartiallyGenerated)
    );
}

#[test]
fn dropped_field_is_reported() {
    let project = TestProject::new();
    project
        .save(&record_generator(&project, &["Name", "Legacy"]))
        .unwrap();

    let edited = project
        .read("Record.php")
        .replace("return $this->Legacy;", "return 'kept by hand';");
    project.write("Record.php", &edited);

    let report = project.save(&record_generator(&project, &["Name"])).unwrap();
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].name, "Record::getLegacy");
    assert!(report.dropped[0].content.contains("return 'kept by hand';"));
    assert!(!project.read("Record.php").contains("kept by hand"));
}

#[test]
fn added_method_appears_in_a_previously_saved_file() {
    let project = TestProject::new();
    let base = extra_generator(&project);
    project.save(&base).unwrap();

    let mut body = TextAssembler::new(&project.config);
    body.append(base.body())
        .ensure_empty_line()
        .append_line("function extraMethod(): void {")
        .indent();
    body.manual_section("extraMethod", "").unwrap();
    body.unindent().append_line("}");
    let extended =
        GeneratedDocument::new(project.path("extra.php"), body.finalize()).with_preamble(PREAMBLE);

    let report = project.save(&extended).unwrap();
    assert_eq!(report.status, SaveStatus::Updated);

    project
        .temp_dir
        .child("extra.php")
        .assert(predicate::str::contains("function extraMethod(): void {"));
    assert_eq!(
        project.verdict("extra.php"),
        SignatureVerdict::Valid(FileKind::PartiallyGenerated)
    );
}

#[test]
fn resaving_with_identical_input_does_not_touch_the_file() {
    let project = TestProject::new();
    let doc = record_generator(&project, &["Name", "Age"]);
    project.save(&doc).unwrap();
    let before = project.read("Record.php");

    for _ in 0..3 {
        let report = project.save(&doc).unwrap();
        assert_eq!(report.status, SaveStatus::Unchanged);
    }
    assert_eq!(project.read("Record.php"), before);
}

#[test]
fn fully_generated_file_is_replaced_wholesale() {
    let project = TestProject::new();
    let v1 = GeneratedDocument::new(project.path("consts.php"), "const int A = 1;\n");
    let v2 = GeneratedDocument::new(project.path("consts.php"), "const int A = 2;\n");

    project.save(&v1).unwrap();
    let report = project.save(&v2).unwrap();

    assert_eq!(report.action, MergeAction::Regenerated);
    assert_eq!(report.status, SaveStatus::Updated);
    let content = project.read("consts.php");
    assert!(content.contains("const int A = 2;"));
    assert!(content.contains("This file is generated. Do not modify it manually!"));
}

// =============================================================================
// Clobber protection
// =============================================================================

#[test]
fn appending_one_character_blocks_regeneration() {
    let project = TestProject::new();
    let doc = GeneratedDocument::new(project.path("consts.php"), "const int A = 1;\n");
    project.save(&doc).unwrap();

    let tampered = format!("{}.", project.read("consts.php"));
    project.write("consts.php", &tampered);

    let err = project.save(&doc).unwrap_err();
    assert!(matches!(err, Error::BadSignature { .. }));
    assert_eq!(project.read("consts.php"), tampered);
}

#[test]
fn edit_outside_manual_sections_blocks_regeneration() {
    let project = TestProject::new();
    project.save(&extra_generator(&project)).unwrap();

    let tampered = project
        .read("extra.php")
        .replace("function extra(): int {", "function extra(): string {");
    project.write("extra.php", &tampered);

    let err = project.save(&extra_generator(&project)).unwrap_err();
    assert!(matches!(err, Error::BadSignature { .. }));
    assert!(err.to_string().contains("extra.php"));
    assert_eq!(project.read("extra.php"), tampered);
}

#[test]
fn hand_written_file_is_never_overwritten() {
    let project = TestProject::new();
    project.write("extra.php", "<?hh\nfunction extra(): int { return 1; }\n");

    let err = project.save(&extra_generator(&project)).unwrap_err();
    assert!(matches!(err, Error::NoSignature { .. }));
    assert!(err.is_refusal());
    assert_eq!(
        project.read("extra.php"),
        "<?hh\nfunction extra(): int { return 1; }\n"
    );
}
