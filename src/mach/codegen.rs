use super::{Instruction, Label, LabelMaker, Operand, Stack, VarType};
use crate::error;
use crate::lang::{Constants, Error, Keyword, Line, LineNumber, Operator, Token};
use std::collections::HashSet;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Temporary every `print` expression passes through.
const PRINT_TEMPORARY: &str = "$print";

/// Construct the generator is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenState {
    Condition,
    Cycle,
    Assignment,
    FunctionCall,
    Input,
    Print,
    Expression,
    Logic,
    VariableDeclaration,
}

/// ## Stack based code generator
///
/// Constructs are announced as they open and ended as they close. The
/// state on top of the stack decides what the next token or expression
/// handed in means. Branch targets wait on the label stack until the
/// construct that needs them is finished.
///
/// Every `DEFVAR` goes to the prologue after `CREATEFRAME`, so a variable
/// is declared exactly once however often the code around it runs.
pub struct Generator {
    constants: Constants,
    program: Vec<Instruction>,
    prologue_end: usize,
    declared: HashSet<Rc<str>>,
    states: Stack<GenState>,
    labels: Stack<Label>,
    label_maker: LabelMaker,
    pending: Option<Rc<str>>,
}

impl Generator {
    /// Starts a program. The header and frame directive are emitted here
    /// and nowhere else.
    pub fn new(constants: Constants) -> Generator {
        Generator {
            constants,
            program: vec![Instruction::Header, Instruction::CreateFrame],
            prologue_end: 2,
            declared: HashSet::new(),
            states: Stack::new("CONSTRUCTS NESTED TOO DEEPLY"),
            labels: Stack::new("TOO MANY PENDING LABELS"),
            label_maker: LabelMaker::new(),
            pending: None,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.program
    }

    pub fn state(&self) -> Option<GenState> {
        self.states.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn pending_labels(&self) -> usize {
        self.labels.len()
    }

    /// Allocates a fresh label and leaves it pending on the label stack.
    pub fn new_label(&mut self) -> Result<Label> {
        let label = self.label_maker.next_label();
        self.labels.push(label.clone())?;
        Ok(label)
    }

    pub fn announce(&mut self, state: GenState) -> Result<()> {
        if state == GenState::Cycle {
            let start = self.new_label()?;
            self.program.push(Instruction::Label(start));
        }
        self.states.push(state)
    }

    pub fn end(&mut self) -> Result<GenState> {
        let state = self.states.pop()?;
        match state {
            GenState::Condition => {
                let after = self.labels.pop()?;
                self.program.push(Instruction::Label(after));
            }
            GenState::Cycle => {
                let after = self.labels.pop()?;
                let start = self.labels.pop()?;
                self.program.push(Instruction::Jump(start));
                self.program.push(Instruction::Label(after));
            }
            GenState::VariableDeclaration => self.pending = None,
            GenState::Input => {
                if let Some(name) = self.pending.take() {
                    return Err(error!(InternalError; format!("INPUT {} WITHOUT TYPE", name)));
                }
            }
            _ => {}
        }
        Ok(state)
    }

    /// Closes the `then` part of the open condition and opens its `else`.
    pub fn else_branch(&mut self) -> Result<()> {
        if self.state() != Some(GenState::Condition) {
            return Err(error!(InternalError; "ELSE OUTSIDE CONDITION"));
        }
        let after = self.labels.pop()?;
        let end = self.new_label()?;
        self.program.push(Instruction::Jump(end));
        self.program.push(Instruction::Label(after));
        Ok(())
    }

    pub fn token(&mut self, token: &Token) -> Result<()> {
        use GenState::*;
        match (self.state(), token) {
            (Some(VariableDeclaration), Token::Identifier(line, name)) => {
                let name = self.take_name(*line, name)?;
                self.declare(&name);
                self.pending = Some(name);
                Ok(())
            }
            (Some(VariableDeclaration), Token::Keyword(line, keyword)) => {
                let var_type = self.var_type(*line, *keyword)?;
                let name = match self.pending.take() {
                    Some(name) => name,
                    None => return Err(error!(InternalError, *line; "TYPE WITHOUT NAME")),
                };
                let default = self.constant(var_type.default_constant(), Some(*line))?;
                let init = [
                    Instruction::Pushs(default),
                    Instruction::Pops(name.clone()),
                ];
                self.emit_prologue(init.clone());
                // Nested declarations start over from the default each time
                // control reaches them.
                if self.depth() > 1 {
                    self.program.extend(init);
                }
                Ok(())
            }
            (Some(Assignment), Token::Identifier(_, name)) => {
                self.program.push(Instruction::Pops(name.as_str().into()));
                Ok(())
            }
            (Some(Input), Token::Identifier(line, name)) => {
                self.pending = Some(self.take_name(*line, name)?);
                Ok(())
            }
            (Some(Input), Token::Keyword(line, keyword)) => {
                let var_type = self.var_type(*line, *keyword)?;
                match self.pending.take() {
                    Some(name) => {
                        self.program.push(Instruction::Read(name, var_type));
                        Ok(())
                    }
                    None => Err(error!(InternalError, *line; "TYPE WITHOUT NAME")),
                }
            }
            (Some(FunctionCall), Token::Identifier(_, name)) => {
                self.program.push(Instruction::Call(name.as_str().into()));
                Ok(())
            }
            (Some(Logic), Token::Operator(line, op)) => self.logic(*op, Some(*line)),
            (state, token) => Err(error!(InternalError, token.line();
                format!("{} HANDED TO {:?}", token, state))),
        }
    }

    /// Hands over one expression in postfix order.
    pub fn expression(&mut self, postfix: Vec<Token>) -> Result<()> {
        match self.state() {
            Some(GenState::Expression) => self.reduce(postfix),
            Some(GenState::Print) => {
                self.reduce(postfix)?;
                let temporary: Rc<str> = PRINT_TEMPORARY.into();
                self.declare(&temporary);
                self.program.push(Instruction::Pops(temporary.clone()));
                self.program.push(Instruction::Write(temporary));
                Ok(())
            }
            state => Err(error!(InternalError;
                format!("EXPRESSION HANDED TO {:?}", state))),
        }
    }

    /// Renders the program. Every construct must be closed.
    pub fn finish(self) -> Result<String> {
        if let Some(state) = self.states.last() {
            return Err(error!(InternalError; format!("UNCLOSED {:?}", state)));
        }
        if !self.labels.is_empty() {
            return Err(error!(InternalError; "UNPLACED LABEL"));
        }
        let mut s = String::new();
        for instruction in &self.program {
            s.push_str(&instruction.to_string());
            s.push('\n');
        }
        Ok(s)
    }

    /// Names arrive one at a time; a second before the first is used is a
    /// dispatcher bug.
    fn take_name(&self, line: Line, name: &str) -> Result<Rc<str>> {
        match &self.pending {
            Some(pending) => Err(error!(InternalError, line;
                format!("{} HANDED WHILE {} PENDING", name, pending))),
            None => Ok(name.into()),
        }
    }

    fn var_type(&self, line: Line, keyword: Keyword) -> Result<VarType> {
        match VarType::from_keyword(keyword) {
            Some(var_type) => Ok(var_type),
            None => Err(error!(SyntaxError, line; format!("{} IS NOT A TYPE", keyword))),
        }
    }

    /// Emits `DEFVAR` into the prologue unless the name already has one.
    fn declare(&mut self, name: &Rc<str>) {
        if self.declared.insert(name.clone()) {
            self.emit_prologue([Instruction::DefVar(name.clone())]);
        }
    }

    fn emit_prologue<I: IntoIterator<Item = Instruction>>(&mut self, instructions: I) {
        for instruction in instructions {
            self.program.insert(self.prologue_end, instruction);
            self.prologue_end += 1;
        }
    }

    fn constant(&self, id: usize, line: LineNumber) -> Result<Operand> {
        match self.constants.get(id) {
            Some(constant) => Ok(Operand::Constant(constant)),
            None => Err(error!(InternalError, line; format!("NO CONSTANT {}", id))),
        }
    }

    fn logic(&mut self, op: Operator, line: LineNumber) -> Result<()> {
        use Instruction::*;
        use Operator::*;
        let compare = match op {
            Equal | NotEqual => None,
            Greater | LessEqual => Some(Gts),
            Less | GreaterEqual => Some(Lts),
            _ => {
                return Err(error!(InternalError, line;
                    format!("{} IS NOT A COMPARISON", op)))
            }
        };
        let after = self.new_label()?;
        if let Some(compare) = compare {
            self.program.push(compare);
            self.program.push(Pushs(Operand::Bool(true)));
        }
        match op {
            Equal | Greater | Less => self.program.push(JumpIfEqs(after)),
            _ => self.program.push(JumpIfNeqs(after)),
        }
        Ok(())
    }

    fn reduce(&mut self, postfix: Vec<Token>) -> Result<()> {
        let line = postfix.first().and_then(Token::line);
        let malformed = || error!(InternalError, line; "MALFORMED EXPRESSION");
        let mut operands: usize = 0;
        for token in postfix {
            match token {
                Token::Constant(line, id) => {
                    let operand = self.constant(id, Some(line))?;
                    self.program.push(Instruction::Pushs(operand));
                    operands += 1;
                }
                Token::Identifier(_, name) => {
                    self.program
                        .push(Instruction::Pushs(Operand::Var(name.into())));
                    operands += 1;
                }
                Token::Operator(line, op) => {
                    if operands < 2 {
                        return Err(malformed());
                    }
                    operands -= 1;
                    let instruction = match op {
                        Operator::Plus => Instruction::Adds,
                        Operator::Minus => Instruction::Subs,
                        Operator::Multiply => Instruction::Muls,
                        Operator::Divide => Instruction::Divs,
                        Operator::DivideInt => {
                            return Err(error!(SyntaxError, line;
                                "INTEGER DIVISION IS NOT SUPPORTED"))
                        }
                        _ => return Err(malformed()),
                    };
                    self.program.push(instruction);
                }
                _ => return Err(malformed()),
            }
        }
        if operands != 1 {
            return Err(malformed());
        }
        Ok(())
    }
}
