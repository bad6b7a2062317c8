/*!
# Rust Language Module

This Rust module provides lexical analysis of the BASIC language:
tokens and their tables, the literal constant table, the byte scanner,
and the channel that carries tokens off the scanning thread.

*/

#[macro_use]
mod error;
mod channel;
mod constant;
mod scan;
mod token;

pub use channel::{channel, CancelHandle, Termination, TokenReceiver, TokenSender};
pub use constant::{ConstId, Constant, Constants};
pub use constant::{DEFAULT_DOUBLE, DEFAULT_INTEGER, DEFAULT_STRING};
pub use error::Error;
pub use error::ErrorCode;
pub use scan::{scan, Scanner};
pub use token::{Keyword, Line, Operator, Token, KEYWORDS, OPERATORS};

/// Line an error was found on, when known.
pub type LineNumber = Option<Line>;

#[cfg(test)]
mod tests;
