// Where `print` and `putch` calls from a running program end up.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives host calls from a running module.
/// Shared with the host function closures, so it has to be thread safe.
pub trait HostOutput: Send + Sync {
    fn print(&self, value: i32);
    fn putch(&self, value: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Print(i32),
    Putch(i32),
}

/// Numbers on their own line, characters as they are
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl HostOutput for StdoutOutput {
    fn print(&self, value: i32) {
        println!("{value}");
    }

    fn putch(&self, value: i32) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", character_for(value));
        let _ = stdout.flush();
    }
}

/// Records every host call in order
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        match self.calls.lock() {
            Ok(calls) => calls.to_owned(),
            Err(poisoned) => poisoned.into_inner().to_owned(),
        }
    }

    /// Just the values passed to `print`
    pub fn printed_numbers(&self) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Print(value) => Some(value),
                HostCall::Putch(_) => None,
            })
            .collect()
    }

    /// Everything the program wrote, the same way StdoutOutput would show it
    pub fn text(&self) -> String {
        let mut text = String::new();
        for call in self.calls() {
            match call {
                HostCall::Print(value) => {
                    text.push_str(&value.to_string());
                    text.push('\n');
                }
                HostCall::Putch(value) => text.push(character_for(value)),
            }
        }
        text
    }

    fn record(&self, call: HostCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

impl HostOutput for CapturedOutput {
    fn print(&self, value: i32) {
        self.record(HostCall::Print(value));
    }

    fn putch(&self, value: i32) {
        self.record(HostCall::Putch(value));
    }
}

// Values that aren't a valid char show up as the replacement character
fn character_for(value: i32) -> char {
    char::from_u32(value as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}
