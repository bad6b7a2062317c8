use super::{Label, HEADER};
use crate::lang::{ConstId, Constant, Keyword, DEFAULT_DOUBLE, DEFAULT_INTEGER, DEFAULT_STRING};
use std::rc::Rc;

/// ## Target instruction set
///
/// The target machine has no registers. Expressions are evaluated on the
/// operand stack and moved to named variables with `POPS`.
///
/// For example: `x = 1 + 2` compiles to
/// `[PUSHS int@1, PUSHS int@2, ADDS, POPS x]`

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // *** Program prologue
    Header,
    CreateFrame,

    // *** Variables and the operand stack
    DefVar(Rc<str>),
    /// Pop the operand stack into the named variable.
    Pops(Rc<str>),
    Pushs(Operand),

    // *** Input and output
    Write(Rc<str>),
    Read(Rc<str>, VarType),

    // *** Stack arithmetic and comparison
    Adds,
    Subs,
    Muls,
    Divs,
    Gts,
    Lts,

    // *** Branch control
    /// Pop two operands and branch when they are equal.
    JumpIfEqs(Label),
    JumpIfNeqs(Label),
    Jump(Label),
    Label(Label),
    Call(Rc<str>),
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Instruction::*;
        match self {
            Header => write!(f, "{}", HEADER),
            CreateFrame => write!(f, "CREATEFRAME"),

            DefVar(s) => write!(f, "DEFVAR {}", s),
            Pops(s) => write!(f, "POPS {}", s),
            Pushs(o) => write!(f, "PUSHS {}", o),

            Write(s) => write!(f, "WRITE {}", s),
            Read(s, t) => write!(f, "READ {} {}", s, t.type_name()),

            Adds => write!(f, "ADDS"),
            Subs => write!(f, "SUBS"),
            Muls => write!(f, "MULS"),
            Divs => write!(f, "DIVS"),
            Gts => write!(f, "GTS"),
            Lts => write!(f, "LTS"),

            JumpIfEqs(l) => write!(f, "JUMPIFEQS {}", l),
            JumpIfNeqs(l) => write!(f, "JUMPIFNEQS {}", l),
            Jump(l) => write!(f, "JUMP {}", l),
            Label(l) => write!(f, "LABEL {}", l),
            Call(s) => write!(f, "CALL {}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Var(Rc<str>),
    Constant(Constant),
    Bool(bool),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Var(s) => write!(f, "{}", s),
            Operand::Bool(b) => write!(f, "bool@{}", b),
            Operand::Constant(c) => {
                write!(f, "{}@", c.type_name())?;
                match c {
                    Constant::Integer(i) => write!(f, "{}", i),
                    Constant::Double(d) => write!(f, "{:?}", d),
                    Constant::String(s) => {
                        for byte in s {
                            match byte {
                                0..=32 | b'#' | b'\\' | 128..=255 => write!(f, "\\{:03}", byte)?,
                                _ => write!(f, "{}", char::from(*byte))?,
                            }
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Integer,
    Double,
    String,
}

impl VarType {
    pub fn from_keyword(keyword: Keyword) -> Option<VarType> {
        match keyword {
            Keyword::Integer => Some(VarType::Integer),
            Keyword::Double => Some(VarType::Double),
            Keyword::String => Some(VarType::String),
            _ => None,
        }
    }

    pub fn keyword(self) -> Keyword {
        match self {
            VarType::Integer => Keyword::Integer,
            VarType::Double => Keyword::Double,
            VarType::String => Keyword::String,
        }
    }

    /// Reserved constant a fresh variable of this type starts from.
    pub fn default_constant(self) -> ConstId {
        match self {
            VarType::Integer => DEFAULT_INTEGER,
            VarType::Double => DEFAULT_DOUBLE,
            VarType::String => DEFAULT_STRING,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            VarType::Integer => "int",
            VarType::Double => "float",
            VarType::String => "string",
        }
    }
}
