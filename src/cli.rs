//! Command-line entrypoints for the sprout compiler.
//!
//! Parses CLI commands and dispatches them into build, check and run workflows.

use crate::backends::wasm::encode::wat_to_wasm;
use crate::build::{InputFile, Project, build_project_files, check_project_files};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::display_messages::print_errors;
use crate::compiler_frontend::{CompilerFrontend, Flag};
use crate::runtime::host_output::StdoutOutput;
use crate::runtime::jit::run_wasm;
use crate::return_file_error;
use saying::say;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Build(String), // Builds a file or every file in a directory
    Run(String),   // JITs a single file and runs its main function
    Check(String), // Compiles without writing anything
    Help,
}

pub fn start_cli() -> ExitCode {
    let compiler_args: Vec<String> = env::args().collect();

    if compiler_args.len() < 2 {
        print_help(false);
        return ExitCode::SUCCESS;
    }

    let command = match get_command(&compiler_args[1..]) {
        Ok(command) => command,
        Err(e) => {
            say!(Red e);
            print_help(true);
            return ExitCode::FAILURE;
        }
    };

    // Gather a list of any additional flags
    let flags = get_flags(&compiler_args);
    let show_timers = !flags.contains(&Flag::DisableTimers);
    let start = Instant::now();

    match command {
        Command::Help => {
            print_help(false);
            ExitCode::SUCCESS
        }

        Command::Build(path) => match build_project_files(Path::new(&path), &flags) {
            Ok(written) => {
                for file in &written {
                    say!(Dark "  wrote ", { file.display() });
                }
                if show_timers {
                    say!(Inline "\nBuilt ", { written.len() }, " files in: ");
                    say!(Green Bold #start.elapsed());
                }
                ExitCode::SUCCESS
            }
            Err(errors) => report_errors(errors, &flags),
        },

        Command::Check(path) => {
            let errors = check_project_files(Path::new(&path));

            if errors.is_empty() {
                if !flags.contains(&Flag::JsonErrors) {
                    say!(Green "No errors found");
                }
                return ExitCode::SUCCESS;
            }

            report_errors(errors, &flags)
        }

        Command::Run(path) => match run_file(Path::new(&path)) {
            Ok(result) => {
                say!(Dark "\nmain returned ", Bright { result });
                if show_timers {
                    say!(Inline "Compiled and ran in: ");
                    say!(Green #start.elapsed());
                }
                ExitCode::SUCCESS
            }
            Err(e) => report_errors(vec![e], &flags),
        },
    }
}

/// Compiles a single file and runs it, printing straight to stdout
fn run_file(path: &Path) -> Result<i32, CompilerError> {
    let project = Project::open(path)?;

    let Some(source_path) = project.source_files.first() else {
        return_file_error!(path, "No source file to run");
    };

    let input = InputFile::read(source_path)?;
    let compiler = CompilerFrontend::new(&project.config);
    let wat = compiler.compile_source(&input.source_code, &input.source_path)?;
    let wasm = wat_to_wasm(&wat)?;

    run_wasm(&wasm, Arc::new(StdoutOutput))
}

fn report_errors(errors: Vec<CompilerError>, flags: &[Flag]) -> ExitCode {
    if flags.contains(&Flag::JsonErrors) {
        for error in &errors {
            println!("{}", error.to_json());
        }
    } else {
        print_errors(errors);
    }

    ExitCode::FAILURE
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    // Flags can come before or after the path
    let path = args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(String::to_owned);

    match command {
        Some("help") => Ok(Command::Help),

        Some("build") => match path {
            Some(path) => Ok(Command::Build(path)),

            // Work from whatever dir the user is inside
            None => Ok(Command::Build(String::from("."))),
        },

        Some("check") => match path {
            Some(path) => Ok(Command::Check(path)),
            None => Ok(Command::Check(String::from("."))),
        },

        Some("run") => match path {
            Some(path) => Ok(Command::Run(path)),
            None => Err(String::from("The run command needs a file to run")),
        },

        Some(other) => Err(format!("Invalid command: '{other}'")),
        None => Err(String::from("No command given")),
    }
}

fn get_flags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--wasm" => flags.push(Flag::EmitWasm),
            "--json" => flags.push(Flag::JsonErrors),
            "--hide-timers" => flags.push(Flag::DisableTimers),
            _ => {}
        }
    }

    flags
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "The sprout compiler");
        say!("Usage: ", Bold "<command>", Italic " <args>");
    }
    say!(Green Bold "\nCommands:");
    say!("  build <path>      - Compiles a .spr file, or every .spr file in a directory, to .wat");
    say!("  run <path>        - JITs a file and runs its main function");
    say!("  check <path>      - Reports errors without writing any files");
    say!("  help              - Shows this message");

    say!(Green Bold "\nFlags:");
    say!("  --wasm            - Also assemble a .wasm binary when building");
    say!("  --json            - Print errors as JSON, one per line");
    say!("  --hide-timers");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
