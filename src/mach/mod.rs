/*!
## Rust Machine Module

This Rust module is a compiler from BASIC tokens to stack machine text.
The scanner runs on its own thread and the generator consumes its tokens
through the channel from the `lang` module.

*/

use crate::lang::CancelHandle;

/// First line of every generated program.
pub const HEADER: &str = ".IFJcode17";

/// Tokens the scanner may run ahead of the generator.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

mod codegen;
mod compile;
mod instruction;
mod label;
mod semantic;
mod stack;
mod translate;

pub use codegen::{GenState, Generator};
pub use compile::compile;
pub use instruction::{Instruction, Operand, VarType};
pub use label::{Label, LabelMaker};
pub use semantic::{FunctionId, Semantics, Symbols, MAIN};
pub use stack::Stack;
pub use translate::translate;

/// Settings for one compile.
#[derive(Debug, Clone)]
pub struct Options {
    /// `None` lets the scanner run arbitrarily far ahead.
    pub channel_capacity: Option<usize>,
    /// Echo every dispatched token to stderr.
    pub trace: bool,
    /// Cancelling this stops the compile with an interrupted error.
    pub cancel: Option<CancelHandle>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            channel_capacity: Some(DEFAULT_CHANNEL_CAPACITY),
            trace: false,
            cancel: None,
        }
    }
}

#[cfg(test)]
mod tests;
