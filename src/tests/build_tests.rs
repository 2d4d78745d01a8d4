use super::{
    FileKind, OutputFile, Project, build_project_files, check_project_files, compile_file,
    write_output_files,
};
use crate::Flag;
use crate::compiler_frontend::compiler_errors::ErrorType;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID: &str = "main() { print(1) }";
const BROKEN: &str = "main() { print(1 }";

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}

#[test]
fn directories_are_scanned_recursively_in_sorted_order() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "b.spr", VALID);
    write(dir.path(), "a.spr", VALID);
    write(dir.path(), "nested/c.spr", VALID);
    write(dir.path(), "notes.txt", "not source");

    let project = Project::open(dir.path()).expect("open project");
    let names: Vec<_> = project
        .source_files
        .iter()
        .map(|path| path.strip_prefix(dir.path()).expect("inside project").to_path_buf())
        .collect();

    assert_eq!(
        names,
        vec![
            Path::new("a.spr").to_path_buf(),
            Path::new("b.spr").to_path_buf(),
            Path::new("nested/c.spr").to_path_buf(),
        ]
    );
}

#[test]
fn single_files_need_the_source_extension() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "main.txt", VALID);

    let error = Project::open(&dir.path().join("main.txt")).err().expect("wrong extension");
    assert_eq!(error.error_type, ErrorType::File);

    let error = Project::open(&dir.path().join("missing.spr")).err().expect("missing file");
    assert_eq!(error.error_type, ErrorType::File);
}

#[test]
fn build_writes_wat_next_to_each_source() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "main.spr", VALID);
    write(dir.path(), "lib/other.spr", VALID);

    let written = build_project_files(dir.path(), &[]).expect("build should succeed");
    assert_eq!(written.len(), 2);

    let wat = fs::read_to_string(dir.path().join("main.wat")).expect("main.wat written");
    assert!(wat.starts_with("(module"));
    assert!(dir.path().join("lib/other.wat").is_file());
    assert!(!dir.path().join("main.wasm").exists());
}

#[test]
fn wasm_flag_also_writes_binaries() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "main.spr", VALID);

    build_project_files(dir.path(), &[Flag::EmitWasm]).expect("build should succeed");

    let wasm = fs::read(dir.path().join("main.wasm")).expect("main.wasm written");
    assert_eq!(&wasm[..4], b"\0asm");
}

#[test]
fn one_failing_file_means_nothing_is_written() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "good.spr", VALID);
    write(dir.path(), "bad.spr", BROKEN);

    let errors = build_project_files(dir.path(), &[]).expect_err("build should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, ErrorType::Syntax);
    assert_eq!(errors[0].location.scope, dir.path().join("bad.spr"));

    assert!(!dir.path().join("good.wat").exists());
    assert!(!dir.path().join("bad.wat").exists());
}

#[test]
fn config_output_dir_mirrors_the_source_tree() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "sprout.toml", "output_dir = \"out\"\nemit_wasm = true\n");
    write(dir.path(), "nested/main.spr", VALID);

    build_project_files(dir.path(), &[]).expect("build should succeed");

    assert!(dir.path().join("out/nested/main.wat").is_file());
    assert!(dir.path().join("out/nested/main.wasm").is_file());
    assert!(!dir.path().join("nested/main.wat").exists());
}

#[test]
fn config_memory_pages_reach_the_module() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "sprout.toml", "memory_pages = 4\n");
    write(dir.path(), "main.spr", "main() { let w[2] w[1] = 3 print(w[1]) }");

    let project = Project::open(dir.path()).expect("open project");
    let outputs = compile_file(&project, &dir.path().join("main.spr"), false).expect("compile");

    assert_eq!(outputs.len(), 1);
    match &outputs[0].file_kind {
        FileKind::Wat(wat) => assert!(wat.contains("(memory 4)")),
        FileKind::Wasm(_) => panic!("only text was requested"),
    }
}

#[test]
fn malformed_config_stops_the_build() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "sprout.toml", "memory_pages = \"lots\"\n");
    write(dir.path(), "main.spr", VALID);

    let errors = build_project_files(dir.path(), &[]).expect_err("bad config");
    assert_eq!(errors[0].error_type, ErrorType::Config);
    assert!(!dir.path().join("main.wat").exists());
}

#[test]
fn check_reports_every_failing_file() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "a.spr", BROKEN);
    write(dir.path(), "b.spr", "main() { y = 1 }");
    write(dir.path(), "c.spr", VALID);

    let mut errors = check_project_files(dir.path());
    errors.sort_by(|a, b| a.location.scope.cmp(&b.location.scope));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].error_type, ErrorType::Syntax);
    assert_eq!(errors[1].error_type, ErrorType::UndeclaredName);
    assert!(!dir.path().join("c.wat").exists());
}

#[test]
fn check_catches_errors_only_found_when_assembling() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "unknown.spr", "main() { missing() }");
    write(dir.path(), "arity.spr", "two(a, b) { return a } main() { two(1) }");
    write(dir.path(), "fine.spr", VALID);

    let errors = check_project_files(dir.path());

    assert_eq!(errors.len(), 2);
    for error in &errors {
        assert_eq!(error.error_type, ErrorType::WasmGeneration);
        assert_ne!(error.location.scope, dir.path().join("fine.spr"));
    }
    assert!(!dir.path().join("fine.wasm").exists());
    assert!(!dir.path().join("fine.wat").exists());
}

#[test]
fn failed_write_leaves_no_outputs_behind() {
    let dir = TempDir::new().expect("temp dir");
    // A file where an output directory should be
    write(dir.path(), "blocked", "");

    let outputs = vec![
        OutputFile::new(dir.path().join("first.wat"), FileKind::Wat(String::from("(module)"))),
        OutputFile::new(
            dir.path().join("blocked/second.wat"),
            FileKind::Wat(String::from("(module)")),
        ),
    ];

    let error = write_output_files(&outputs).expect_err("blocked is not a directory");
    assert_eq!(error.error_type, ErrorType::File);

    assert!(!dir.path().join("first.wat").exists());
    assert!(!dir.path().join("first.wat.tmp").exists());
}

#[test]
fn writing_replaces_existing_outputs() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "main.wat", "old");

    let outputs = vec![OutputFile::new(
        dir.path().join("main.wat"),
        FileKind::Wat(String::from("(module)")),
    )];
    write_output_files(&outputs).expect("write outputs");

    assert_eq!(fs::read_to_string(dir.path().join("main.wat")).expect("read"), "(module)");
    assert!(!dir.path().join("main.wat.tmp").exists());
}
