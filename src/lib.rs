//! # BASIC stack compiler
//!
//! Compiles a small structured BASIC to the text of a stack based
//! virtual machine. For example:
//! ```text
//! dim x as integer
//! x = 1 + 2
//! ```
//! compiles to:
//! ```text
//! .IFJcode17
//! CREATEFRAME
//! DEFVAR x
//! PUSHS int@0
//! POPS x
//! PUSHS int@1
//! PUSHS int@2
//! ADDS
//! POPS x
//! ```
//!
//! The scanner runs on its own thread and hands tokens to the code
//! generator through a blocking channel. Run the `basicc` binary with a
//! source file, or with none to read standard input.

pub mod lang;
pub mod mach;
