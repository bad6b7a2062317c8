use super::{GenState, Generator, Instruction, Operand};
use crate::lang::{Constant, Constants, ErrorCode, Keyword, Operator, Token};

mod codegen_test;

/// Lines after the header and frame directive.
fn body(gen: Generator) -> Vec<String> {
    let text = gen.finish().unwrap();
    text.lines().skip(2).map(String::from).collect()
}

fn int(constants: &Constants, line: u32, i: i32) -> Token {
    Token::Constant(line, constants.insert(Constant::Integer(i)))
}

fn var(line: u32, name: &str) -> Token {
    Token::Identifier(line, name.to_string())
}

fn op(line: u32, op: Operator) -> Token {
    Token::Operator(line, op)
}
