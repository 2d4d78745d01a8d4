use crate::backends::wasm::encode::wat_to_wasm;
use crate::compiler_frontend::CompilerFrontend;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::settings::{Config, SPROUT_FILE_EXTENSION};
use crate::{Flag, return_compiler_error, return_file_error, timer_log};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct InputFile {
    pub source_code: String,
    pub source_path: PathBuf,
}

impl InputFile {
    pub fn read(source_path: &Path) -> Result<InputFile, CompilerError> {
        match fs::read_to_string(source_path) {
            Ok(source_code) => Ok(InputFile {
                source_code,
                source_path: source_path.to_path_buf(),
            }),
            Err(e) => return_file_error!(source_path, format!("Could not read source file: {e}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub full_file_path: PathBuf,
    pub file_kind: FileKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Wat(String),
    Wasm(Vec<u8>),
}

impl OutputFile {
    pub fn new(full_file_path: PathBuf, file_kind: FileKind) -> Self {
        Self {
            full_file_path,
            file_kind,
        }
    }
}

/// Everything one build or check run needs to know
pub struct Project {
    pub config: Config,

    /// Directory the config file was looked for in, output_dir is relative to it
    pub project_dir: PathBuf,
    pub source_files: Vec<PathBuf>,
}

impl Project {
    /// A single source file, or every source file under a directory
    pub fn open(entry_path: &Path) -> Result<Project, CompilerError> {
        if !entry_path.exists() {
            return_file_error!(entry_path, "Path does not exist");
        }

        let (config, project_dir) = Config::find(entry_path)?;

        let source_files = if entry_path.is_dir() {
            let mut files = Vec::new();
            collect_source_files(entry_path, &mut files)?;
            files.sort();
            files
        } else if has_source_extension(entry_path) {
            vec![entry_path.to_path_buf()]
        } else {
            return_file_error!(
                entry_path,
                format!("Source files must have the .{SPROUT_FILE_EXTENSION} extension")
            );
        };

        Ok(Project {
            config,
            project_dir,
            source_files,
        })
    }

    /// Where the outputs of a source file go
    pub fn output_path(&self, source_path: &Path, extension: &str) -> PathBuf {
        match &self.config.output_dir {
            Some(output_dir) => {
                let relative = source_path
                    .strip_prefix(&self.project_dir)
                    .unwrap_or(source_path);

                self.project_dir
                    .join(output_dir)
                    .join(relative)
                    .with_extension(extension)
            }
            None => source_path.with_extension(extension),
        }
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == SPROUT_FILE_EXTENSION)
}

fn collect_source_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CompilerError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return_file_error!(dir, format!("Could not read directory: {e}")),
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => return_file_error!(dir, format!("Could not read directory entry: {e}")),
        };

        if path.is_dir() {
            collect_source_files(&path, files)?;
        } else if has_source_extension(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Compiles one file into its output files.
/// Only reads from disk, nothing is written here.
pub fn compile_file(
    project: &Project,
    source_path: &Path,
    emit_wasm: bool,
) -> Result<Vec<OutputFile>, CompilerError> {
    let input = InputFile::read(source_path)?;
    let compiler = CompilerFrontend::new(&project.config);

    let wat = compiler.compile_source(&input.source_code, &input.source_path)?;
    let mut outputs = Vec::with_capacity(2);

    if emit_wasm {
        let wasm = wat_to_wasm(&wat).map_err(|e| e.with_file_path(input.source_path.to_owned()))?;
        outputs.push(OutputFile::new(
            project.output_path(&input.source_path, "wasm"),
            FileKind::Wasm(wasm),
        ));
    }

    outputs.insert(
        0,
        OutputFile::new(
            project.output_path(&input.source_path, "wat"),
            FileKind::Wat(wat),
        ),
    );

    Ok(outputs)
}

/// Compiles every source file of a project in parallel.
///
/// Files are independent, each one gets its own tokens, AST and symbol table.
/// Outputs are only written when every file compiled,
/// otherwise all the errors are returned and nothing is written.
pub fn build_project_files(entry_path: &Path, flags: &[Flag]) -> Result<Vec<PathBuf>, Vec<CompilerError>> {
    let time = Instant::now();
    let project = Project::open(entry_path).map_err(|e| vec![e])?;
    let emit_wasm = project.config.emit_wasm || flags.contains(&Flag::EmitWasm);

    let results: Vec<Result<Vec<OutputFile>, CompilerError>> = project
        .source_files
        .par_iter()
        .map(|source_path| compile_file(&project, source_path, emit_wasm))
        .collect();

    timer_log!(time, "Compiled all files in: ");

    let mut output_files = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(outputs) => output_files.extend(outputs),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    write_output_files(&output_files).map_err(|e| vec![e])?;

    Ok(output_files
        .into_iter()
        .map(|file| file.full_file_path)
        .collect())
}

/// Compiles and assembles every source file without writing anything.
/// Returns the errors, one per failing file.
pub fn check_project_files(entry_path: &Path) -> Vec<CompilerError> {
    let project = match Project::open(entry_path) {
        Ok(project) => project,
        Err(e) => return vec![e],
    };

    // Calls to unknown functions and wrong arities only surface when assembling
    project
        .source_files
        .par_iter()
        .filter_map(|source_path| compile_file(&project, source_path, true).err())
        .collect()
}

/// Writes every output beside its target first, then moves them all into place.
/// If any write fails, the staged files are removed and no target is touched.
pub fn write_output_files(output_files: &[OutputFile]) -> Result<(), CompilerError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(output_files.len());

    for output_file in output_files {
        if let Err(e) = stage_output_file(output_file, &mut staged) {
            remove_staged_files(&staged);
            return Err(e);
        }
    }

    for (index, (staging_path, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging_path, target) {
            remove_staged_files(&staged[index..]);
            return_file_error!(*target, format!("Error writing file: {e}"));
        }
    }

    Ok(())
}

fn stage_output_file<'a>(
    output_file: &'a OutputFile,
    staged: &mut Vec<(PathBuf, &'a Path)>,
) -> Result<(), CompilerError> {
    // A safety check to make sure the file name has been set
    // This is to avoid accidentally overwriting things by mistake
    if output_file.full_file_path == PathBuf::new() {
        return_compiler_error!("File did not have a name or path set");
    }

    if let Some(parent) = output_file.full_file_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return_file_error!(parent, format!("Could not create output directory: {e}"));
        }
    }

    let staging_path = staging_path(&output_file.full_file_path);
    let written = match &output_file.file_kind {
        FileKind::Wat(content) => fs::write(&staging_path, content),
        FileKind::Wasm(content) => fs::write(&staging_path, content),
    };

    if let Err(e) = written {
        let _ = fs::remove_file(&staging_path);
        return_file_error!(
            &output_file.full_file_path,
            format!("Error writing file: {e}")
        );
    }

    staged.push((staging_path, output_file.full_file_path.as_path()));
    Ok(())
}

/// main.wat is staged as main.wat.tmp
fn staging_path(target: &Path) -> PathBuf {
    let mut path = target.as_os_str().to_owned();
    path.push(".tmp");
    PathBuf::from(path)
}

fn remove_staged_files(staged: &[(PathBuf, &Path)]) {
    for (staging_path, _) in staged {
        let _ = fs::remove_file(staging_path);
    }
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
