use super::{FunctionId, GenState, Generator, Semantics, Symbols, VarType, MAIN};
use crate::error;
use crate::lang::{Error, Keyword, Line, Operator, Token, TokenReceiver};
use ansi_term::Style;

type Result<T> = std::result::Result<T, Error>;

/// Pulls tokens off the channel, checks names, and drives the generator
/// one statement at a time. Returns the rendered program.
pub fn translate(tokens: &mut TokenReceiver, gen: Generator, trace: bool) -> Result<String> {
    let mut this = Translator {
        tokens,
        gen,
        symbols: Symbols::new(),
        function: MAIN,
        trace,
        replayed: 0,
    };
    this.program()?;
    this.gen.finish()
}

fn unexpected(token: &Token) -> Error {
    match token {
        Token::EndOfFile => error!(SyntaxError; "UNEXPECTED END OF FILE"),
        _ => error!(SyntaxError, token.line(); format!("UNEXPECTED {}", token)),
    }
}

enum Item {
    Operand,
    Open,
    Close,
    Arithmetic(Operator),
    Other,
}

struct Translator<'a> {
    tokens: &'a mut TokenReceiver,
    gen: Generator,
    symbols: Symbols,
    function: FunctionId,
    trace: bool,
    replayed: usize,
}

impl<'a> Translator<'a> {
    fn next(&mut self) -> Result<Token> {
        let token = self.tokens.dequeue()?;
        if self.replayed > 0 {
            self.replayed -= 1;
        } else if self.trace {
            let line = match token.line() {
                Some(line) => line.to_string(),
                None => "-".to_string(),
            };
            eprintln!(
                "{}",
                Style::new().dimmed().paint(format!("[{}] {}", line, token))
            );
        }
        Ok(token)
    }

    fn push_back(&mut self, token: Token) {
        self.replayed += 1;
        self.tokens.push_back(token);
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Line> {
        let token = self.next()?;
        match token.line() {
            Some(line) if token.is_keyword(keyword) => Ok(line),
            Some(line) => Err(error!(SyntaxError, line; format!("EXPECTED {}", keyword))),
            None => Err(unexpected(&token)),
        }
    }

    fn expect_operator(&mut self, operator: Operator) -> Result<Line> {
        match self.next()? {
            Token::Operator(line, o) if o == operator => Ok(line),
            token => Err(match token.line() {
                Some(line) => error!(SyntaxError, line; format!("EXPECTED {}", operator)),
                None => unexpected(&token),
            }),
        }
    }

    fn identifier(&mut self) -> Result<(Line, String)> {
        match self.next()? {
            Token::Identifier(line, name) => Ok((line, name)),
            token => Err(unexpected(&token)),
        }
    }

    fn check_variable(&self, line: Line, name: &str) -> Result<()> {
        if self.symbols.is_variable_defined(self.function, name) {
            Ok(())
        } else {
            Err(error!(UndefinedName, line; format!("VARIABLE {} UNDEFINED", name)))
        }
    }

    /// End of statement. End of file also ends a statement and is left for
    /// the caller to see.
    fn separator(&mut self) -> Result<()> {
        match self.next()? {
            Token::Separator(_) => Ok(()),
            Token::EndOfFile => {
                self.push_back(Token::EndOfFile);
                Ok(())
            }
            token => Err(match token.line() {
                Some(line) => error!(SyntaxError, line; "EXPECTED END OF LINE"),
                None => unexpected(&token),
            }),
        }
    }

    fn program(&mut self) -> Result<()> {
        loop {
            match self.next()? {
                Token::EndOfFile => return Ok(()),
                token => {
                    self.push_back(token);
                    self.statement()?;
                }
            }
        }
    }

    /// Statements up to one of the closing keywords, which is returned.
    fn block(&mut self, closers: &[Keyword]) -> Result<Keyword> {
        loop {
            match self.next()? {
                Token::Keyword(_, k) if closers.contains(&k) => return Ok(k),
                Token::EndOfFile => return Err(unexpected(&Token::EndOfFile)),
                token => {
                    self.push_back(token);
                    self.statement()?;
                }
            }
        }
    }

    fn statement(&mut self) -> Result<()> {
        match self.next()? {
            Token::Separator(_) => Ok(()),
            Token::Keyword(_, Keyword::Scope) => self.scope(),
            Token::Keyword(_, Keyword::Dim) => self.dim(),
            Token::Keyword(_, Keyword::Input) => self.input(),
            Token::Keyword(_, Keyword::Print) => self.print(),
            Token::Keyword(_, Keyword::If) => self.r#if(),
            Token::Keyword(_, Keyword::Do) => self.r#do(),
            Token::Identifier(line, name) => self.r#let(line, name),
            token => Err(unexpected(&token)),
        }
    }

    fn scope(&mut self) -> Result<()> {
        self.separator()?;
        self.block(&[Keyword::End])?;
        self.expect_keyword(Keyword::Scope)?;
        self.separator()
    }

    fn dim(&mut self) -> Result<()> {
        let (line, name) = self.identifier()?;
        if self.symbols.is_variable_defined(self.function, &name) {
            return Err(error!(UndefinedName, line; format!("VARIABLE {} REDEFINED", name)));
        }
        self.expect_keyword(Keyword::As)?;
        let type_token = self.next()?;
        let var_type = match &type_token {
            Token::Keyword(_, k) => VarType::from_keyword(*k),
            _ => None,
        };
        let var_type = match var_type {
            Some(var_type) => var_type,
            None => return Err(error!(SyntaxError, line; "EXPECTED TYPE")),
        };
        self.gen.announce(GenState::VariableDeclaration)?;
        self.gen.token(&Token::Identifier(line, name.clone()))?;
        self.gen.token(&type_token)?;
        self.gen.end()?;
        self.symbols.define_variable(self.function, &name, var_type);
        let token = self.next()?;
        if token.is_operator(Operator::Equal) {
            self.assign_value(line, name)?;
        } else {
            self.push_back(token);
        }
        self.separator()
    }

    fn r#let(&mut self, line: Line, name: String) -> Result<()> {
        self.check_variable(line, &name)?;
        self.expect_operator(Operator::Equal)?;
        self.assign_value(line, name)?;
        self.separator()
    }

    fn assign_value(&mut self, line: Line, name: String) -> Result<()> {
        let first = self.next()?;
        if let Token::Identifier(call_line, callee) = &first {
            let second = self.next()?;
            if second.is_operator(Operator::LParen) {
                let (call_line, callee) = (*call_line, callee.clone());
                return self.call(line, name, call_line, callee);
            }
            self.push_back(second);
        }
        self.push_back(first);
        self.gen.announce(GenState::Assignment)?;
        self.gen.announce(GenState::Expression)?;
        let postfix = self.expression()?;
        self.gen.expression(postfix)?;
        self.gen.end()?;
        self.gen.token(&Token::Identifier(line, name))?;
        self.gen.end()?;
        Ok(())
    }

    /// `name = callee(args)`, with the opening parenthesis already read.
    fn call(&mut self, line: Line, name: String, call_line: Line, callee: String) -> Result<()> {
        if !self.symbols.is_function_defined(&callee) {
            return Err(error!(UndefinedName, call_line;
                format!("FUNCTION {} UNDEFINED", callee)));
        }
        self.gen.announce(GenState::Assignment)?;
        self.gen.announce(GenState::FunctionCall)?;
        let token = self.next()?;
        if !token.is_operator(Operator::RParen) {
            self.push_back(token);
            loop {
                self.gen.announce(GenState::Expression)?;
                let postfix = self.expression()?;
                self.gen.expression(postfix)?;
                self.gen.end()?;
                match self.next()? {
                    t if t.is_operator(Operator::Comma) => continue,
                    t if t.is_operator(Operator::RParen) => break,
                    t => return Err(unexpected(&t)),
                }
            }
        }
        self.gen.token(&Token::Identifier(call_line, callee))?;
        self.gen.end()?;
        self.gen.token(&Token::Identifier(line, name))?;
        self.gen.end()?;
        Ok(())
    }

    fn input(&mut self) -> Result<()> {
        let (line, name) = self.identifier()?;
        let var_type = match self.symbols.variable_type(self.function, &name) {
            Some(var_type) => var_type,
            None => return Err(error!(UndefinedName, line; format!("VARIABLE {} UNDEFINED", name))),
        };
        self.gen.announce(GenState::Input)?;
        self.gen.token(&Token::Identifier(line, name))?;
        self.gen.token(&Token::Keyword(line, var_type.keyword()))?;
        self.gen.end()?;
        self.separator()
    }

    fn print(&mut self) -> Result<()> {
        self.gen.announce(GenState::Print)?;
        loop {
            let postfix = self.expression()?;
            self.gen.expression(postfix)?;
            self.expect_operator(Operator::Semicolon)?;
            let token = self.next()?;
            let done = matches!(token, Token::Separator(_) | Token::EndOfFile);
            self.push_back(token);
            if done {
                break;
            }
        }
        self.gen.end()?;
        self.separator()
    }

    fn r#if(&mut self) -> Result<()> {
        self.gen.announce(GenState::Condition)?;
        self.condition()?;
        self.expect_keyword(Keyword::Then)?;
        self.separator()?;
        if self.block(&[Keyword::Else, Keyword::End])? == Keyword::Else {
            self.gen.else_branch()?;
            self.separator()?;
            self.block(&[Keyword::End])?;
        }
        self.expect_keyword(Keyword::If)?;
        self.gen.end()?;
        self.separator()
    }

    fn r#do(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::While)?;
        self.gen.announce(GenState::Cycle)?;
        self.condition()?;
        self.separator()?;
        self.block(&[Keyword::Loop])?;
        self.gen.end()?;
        self.separator()
    }

    /// `expr RELOP expr`. The generator is handed the negated comparison
    /// so its jump leaves the construct when the condition is false.
    fn condition(&mut self) -> Result<()> {
        self.gen.announce(GenState::Logic)?;
        self.gen.announce(GenState::Expression)?;
        let lhs = self.expression()?;
        self.gen.expression(lhs)?;
        self.gen.end()?;
        let (line, negated) = match self.next()? {
            Token::Operator(line, op) if op.is_relational() => (line, op.negated()),
            token => {
                return Err(match token.line() {
                    Some(line) => error!(SyntaxError, line; "EXPECTED COMPARISON"),
                    None => unexpected(&token),
                })
            }
        };
        self.gen.announce(GenState::Expression)?;
        let rhs = self.expression()?;
        self.gen.expression(rhs)?;
        self.gen.end()?;
        if let Some(op) = negated {
            self.gen.token(&Token::Operator(line, op))?;
        }
        self.gen.end()?;
        Ok(())
    }

    /// Reads one infix expression and returns it in postfix order.
    fn expression(&mut self) -> Result<Vec<Token>> {
        let mut output: Vec<Token> = vec![];
        let mut operators: Vec<Token> = vec![];
        let mut expect_operand = true;
        loop {
            let token = self.next()?;
            let item = match &token {
                t if t.is_operand() => Item::Operand,
                Token::Operator(_, Operator::LParen) => Item::Open,
                Token::Operator(_, Operator::RParen) => Item::Close,
                Token::Operator(_, op) if op.is_arithmetic() => Item::Arithmetic(*op),
                _ => Item::Other,
            };
            match item {
                Item::Operand if expect_operand => {
                    if let Token::Identifier(line, name) = &token {
                        self.check_variable(*line, name)?;
                    }
                    output.push(token);
                    expect_operand = false;
                }
                Item::Open if expect_operand => operators.push(token),
                Item::Close
                    if !expect_operand
                        && operators.iter().any(|t| t.is_operator(Operator::LParen)) =>
                {
                    while let Some(top) = operators.pop() {
                        if top.is_operator(Operator::LParen) {
                            break;
                        }
                        output.push(top);
                    }
                }
                Item::Arithmetic(op) if !expect_operand => {
                    while let Some(Token::Operator(_, top)) = operators.last() {
                        if !top.is_arithmetic() || top.precedence() < op.precedence() {
                            break;
                        }
                        if let Some(top) = operators.pop() {
                            output.push(top);
                        }
                    }
                    operators.push(token);
                    expect_operand = true;
                }
                _ if expect_operand => {
                    return Err(match token.line() {
                        Some(line) => {
                            error!(SyntaxError, line; format!("EXPECTED OPERAND, FOUND {}", token))
                        }
                        None => unexpected(&token),
                    })
                }
                _ => {
                    self.push_back(token);
                    break;
                }
            }
        }
        while let Some(top) = operators.pop() {
            if top.is_operator(Operator::LParen) {
                return Err(error!(SyntaxError, top.line(); "UNBALANCED PARENTHESES"));
            }
            output.push(top);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{channel, CancelHandle, Constants, Scanner, Termination};

    fn translate_str(s: &str, symbols: Option<Symbols>) -> Result<String> {
        let constants = Constants::new();
        let (tx, mut rx) = channel(None, CancelHandle::new());
        let mut scanner = Scanner::new(s.as_bytes(), constants.clone(), CancelHandle::new());
        loop {
            let token = scanner.next_token()?;
            let eof = token == Token::EndOfFile;
            tx.enqueue(token);
            if eof {
                break;
            }
        }
        tx.close(Termination::Finished);
        let mut this = Translator {
            tokens: &mut rx,
            gen: Generator::new(constants),
            symbols: symbols.unwrap_or_default(),
            function: MAIN,
            trace: false,
            replayed: 0,
        };
        this.program()?;
        this.gen.finish()
    }

    #[test]
    fn test_call_defined_function() {
        let mut symbols = Symbols::new();
        symbols.define_function("twice");
        let s = translate_str("dim x as integer\nx = twice(1, x)\n", Some(symbols)).unwrap();
        let body: Vec<&str> = s.lines().skip(5).collect();
        assert_eq!(
            body,
            vec!["PUSHS int@1", "PUSHS x", "CALL twice", "POPS x"]
        );
    }

    #[test]
    fn test_call_without_arguments() {
        let mut symbols = Symbols::new();
        symbols.define_function("f");
        let s = translate_str("dim x as double\nx = f()\n", Some(symbols)).unwrap();
        let body: Vec<&str> = s.lines().skip(5).collect();
        assert_eq!(body, vec!["CALL f", "POPS x"]);
    }

    #[test]
    fn test_call_undefined_function() {
        let e = translate_str("dim x as integer\nx = f(1)\n", None).unwrap_err();
        assert_eq!(e.to_string(), "UNDEFINED NAME IN 2; FUNCTION f UNDEFINED");
    }
}
