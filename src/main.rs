//! # BASIC
//!
//! Command line compiler. Reads a program and prints stack machine text.
//!

mod term;

fn main() {
    term::main()
}
