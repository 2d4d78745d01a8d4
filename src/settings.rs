use crate::backends::wasm::constants::{DEFAULT_MIN_PAGES, MAX_PAGES};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::return_config_error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SPROUT_FILE_EXTENSION: &str = "spr";
pub const CONFIG_FILE_NAME: &str = "sprout.toml";

// Every value is an i32, so every array element is one 4 byte cell
pub const ARRAY_CELL_BYTES: u32 = 4;

// This is a guess about how much should be initially allocated for the token vec.
// Just a heuristic to help avoid too many allocations.
pub const SRC_TO_TOKEN_RATIO: usize = 4; // (Maybe) About 1/4 source code bytes to tokens

// Parsing and lowering expressions both recurse once per level of nesting.
// Counts parentheses, prefix operators, calls, indexes and binary operators in one chain.
pub const MAX_EXPRESSION_DEPTH: usize = 64;

/// Project settings read from `sprout.toml`.
/// Every field is optional, missing ones fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project_name: String,

    /// Where output files go, relative to the config file.
    /// None writes them next to their source file.
    pub output_dir: Option<PathBuf>,

    /// Minimum linear memory in 64KB pages, for programs that use arrays
    pub memory_pages: u32,

    /// Also assemble a .wasm binary when building
    pub emit_wasm: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_name: String::from("sprout_project"),
            output_dir: None,
            memory_pages: DEFAULT_MIN_PAGES,
            emit_wasm: false,
        }
    }
}

impl Config {
    /// Looks for a config file beside the entry path (in it, for directories).
    /// Having no config file is fine, a broken one is not.
    pub fn find(entry_path: &Path) -> Result<(Config, PathBuf), CompilerError> {
        let project_dir = if entry_path.is_dir() {
            entry_path.to_path_buf()
        } else {
            match entry_path.parent() {
                Some(parent) => parent.to_path_buf(),
                None => PathBuf::new(),
            }
        };

        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Ok((Config::default(), project_dir));
        }

        let config = Config::load(&config_path)?;
        Ok((config, project_dir))
    }

    pub fn load(config_path: &Path) -> Result<Config, CompilerError> {
        let source = match fs::read_to_string(config_path) {
            Ok(source) => source,
            Err(e) => return_config_error!(config_path, format!("Could not read config file: {e}")),
        };

        Config::parse(&source, config_path)
    }

    pub fn parse(source: &str, config_path: &Path) -> Result<Config, CompilerError> {
        let config: Config = match toml::from_str(source) {
            Ok(config) => config,
            Err(e) => return_config_error!(config_path, format!("Invalid {CONFIG_FILE_NAME}: {e}")),
        };

        if config.memory_pages == 0 || config.memory_pages > MAX_PAGES {
            return_config_error!(
                config_path,
                format!(
                    "memory_pages must be between 1 and {MAX_PAGES}, got {}",
                    config.memory_pages
                )
            );
        }

        Ok(config)
    }
}


#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
