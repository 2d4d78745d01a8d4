//! Structured control flow for loops.
//!
//! WASM branches can only target enclosing blocks, so every source loop becomes
//!
//! ```wat
//! block $break_N
//!   loop $continue_N
//!     ...body...
//!     br $continue_N
//!   end
//! end
//! ```
//!
//! `break` branches to the outer block, `continue` to the top of the loop.
//! Labels are named rather than given as depths, so `if` blocks between a
//! `break` and its loop don't need to be counted.

/// Branch targets of one loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopLabels {
    pub break_label: String,
    pub continue_label: String,
}

#[derive(Debug, Default)]
pub struct ControlFlowManager {
    /// Currently open loops (innermost at the end)
    loop_stack: Vec<LoopLabels>,

    /// Counter for generating unique labels within a function
    next_loop_id: u32,
}

impl ControlFlowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self) -> LoopLabels {
        let id = self.next_loop_id;
        self.next_loop_id += 1;

        let labels = LoopLabels {
            break_label: format!("$break_{id}"),
            continue_label: format!("$continue_{id}"),
        };

        self.loop_stack.push(labels.clone());
        labels
    }

    pub fn exit_loop(&mut self) {
        self.loop_stack.pop();
    }

    /// The loop a `break` or `continue` refers to
    pub fn innermost_loop(&self) -> Option<&LoopLabels> {
        self.loop_stack.last()
    }
}
