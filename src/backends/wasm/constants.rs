//! Shared Constants for WAT Codegen
//!
//! Names that show up in the generated module text.

// =========================================================================
// Host Imports
// Every module imports these from the "env" namespace, whether or not it calls them
// =========================================================================

pub const HOST_MODULE: &str = "env";

/// Host functions all take one i32 and return an i32 (always 0)
pub const HOST_FUNCTIONS: [&str; 2] = ["print", "putch"];

// =========================================================================
// Memory Configuration Constants
// Only emitted for programs that have arrays
// =========================================================================

/// The mutable global that every stack frame is carved out of.
/// Starts at address 0 and grows upwards.
pub const STACK_POINTER: &str = "$stack_ptr";

/// Default minimum memory pages (64KB each).
pub const DEFAULT_MIN_PAGES: u32 = 1;

/// Maximum memory pages for 32-bit WASM (4GB).
pub const MAX_PAGES: u32 = 65536;

// =========================================================================
// Function Layout
// =========================================================================

/// Label of the block wrapping every function body.
/// `return` branches here with its value.
pub const EXIT_LABEL: &str = "$exit";

/// The exported entry point
pub const ENTRY_FUNCTION: &str = "main";

pub const WAT_INDENT: &str = "  ";
