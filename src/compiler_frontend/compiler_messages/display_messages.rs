use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, ErrorType};
use saying::say;
use std::path::{Path, PathBuf};
use std::{env, fs};

fn normalize_display_path(path: &Path) -> PathBuf {
    let path_string = path.to_string_lossy();
    if let Some(stripped) = path_string.strip_prefix(r"\\?\") {
        return PathBuf::from(stripped);
    }

    path.to_path_buf()
}

fn relative_display_path(scope: &Path) -> String {
    let normalized_scope = normalize_display_path(scope);

    match env::current_dir() {
        Ok(dir) => {
            let normalized_dir = normalize_display_path(&dir);
            normalized_scope
                .strip_prefix(&normalized_dir)
                .unwrap_or(&normalized_scope)
                .to_string_lossy()
                .to_string()
        }
        Err(err) => {
            say!(Red "Couldn't find the current directory to shorten the file path: ", err);
            normalized_scope.to_string_lossy().to_string()
        }
    }
}

pub fn print_errors(errors: Vec<CompilerError>) {
    for err in errors {
        print_formatted_error(err);
    }
}

pub fn print_formatted_error(e: CompilerError) {
    let relative_dir = relative_display_path(&e.location.scope);
    let line_number = e.location.start_pos.line_number as usize;

    // Lines are counted from 1
    let line = match fs::read_to_string(normalize_display_path(&e.location.scope)) {
        Ok(file) => file
            .lines()
            .nth(line_number.saturating_sub(1))
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    };

    match e.error_type {
        ErrorType::Lex | ErrorType::Syntax => {
            if !relative_dir.is_empty() {
                say!("\n(╯°□°)╯  🔥🔥 ", Dark Magenta relative_dir, " 🔥🔥  Σ(°△°;) ");
            }

            say!(Red { error_type_heading(e.error_type) });
            say!(Dark Magenta "Line ", Bright {line_number});
        }

        ErrorType::Redeclaration
        | ErrorType::UndeclaredName
        | ErrorType::KindMismatch
        | ErrorType::Unassignable => {
            if !relative_dir.is_empty() {
                say!("\n(ಠ_ಠ) ", Dark Magenta relative_dir);
                say!(Inline " ( ._. ) ");
            }

            say!(Red { error_type_heading(e.error_type) });
            say!(Dark Magenta "Line ", Bright {line_number});
        }

        ErrorType::Rule | ErrorType::UnsupportedOperation => {
            if !relative_dir.is_empty() {
                say!("\nヽ(˶°o°)ﾉ  🔥🔥🔥 ", Dark Magenta relative_dir, " 🔥🔥🔥  ╰(°□°╰) ");
            }

            say!(Red "Rule");
            say!(Dark Magenta "Line ", Bright {line_number});
        }

        ErrorType::File => {
            say!(Yellow "🏚 Can't find/read file or directory: ", relative_dir);
            say!(e.msg);
            return;
        }

        ErrorType::Config => {
            if !relative_dir.is_empty() {
                say!("\n (-_-)  🔥🔥🔥🔥 ", Dark Magenta relative_dir, " 🔥🔥🔥🔥  <(^~^)/ ");
            }
            say!(Yellow "CONFIG FILE ISSUE- ");
            say!(Dark Yellow "Malformed config file, something doesn't make sense inside sprout.toml");
            say!(Red e.msg);
            return;
        }

        ErrorType::Runtime => {
            say!(Yellow "Program crashed while running: ", Red e.msg);
            return;
        }

        ErrorType::Compiler => {
            if !relative_dir.is_empty() {
                say!("\nヽ༼☉ ‿ ⚆༽ﾉ  🔥🔥🔥🔥 ", Dark Magenta relative_dir, " 🔥🔥🔥🔥  ╰(° _ o╰) ");
            }
            say!(Yellow "COMPILER BUG - ");
            say!(Dark Yellow "compiler developer skill issue (not your fault)");
        }

        ErrorType::WasmGeneration => {
            if !relative_dir.is_empty() {
                say!("\nヽ༼☉ ‿ ⚆༽ﾉ  🔥🔥🔥🔥 ", Dark Magenta relative_dir, " 🔥🔥🔥🔥  ╰(° O °)╯ ");
            }
            say!(Yellow "WASM GENERATION - ", Dark "the generated module was rejected");
            say!(Red e.msg);
            return;
        }
    }

    say!(Red e.msg);

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Dark Green "Hint: ", suggestion);
    }

    if line.is_empty() {
        return;
    }

    println!("\n{line}");

    // spaces before the relevant part of the line
    print!("{}", " ".repeat(e.location.start_pos.char_column as usize));

    let length_of_underline = e
        .location
        .end_pos
        .char_column
        .saturating_sub(e.location.start_pos.char_column)
        .max(1) as usize;
    say!(Red { "^".repeat(length_of_underline) });
}

fn error_type_heading(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::Lex => "Lexing",
        ErrorType::Syntax => "Syntax",
        ErrorType::Redeclaration => "Redeclared Name",
        ErrorType::UndeclaredName => "Undeclared Name",
        ErrorType::KindMismatch => "Array/Scalar Mismatch",
        ErrorType::Unassignable => "Can't Assign",
        _ => "Error",
    }
}
