use super::channel::{CancelHandle, Termination, TokenSender};
use super::constant::{Constant, Constants};
use super::token::{Keyword, Line, Operator, Token, OPERATORS};
use super::{Error, ErrorCode};
use crate::error;
use std::io::{BufReader, Bytes, Read};

type Result<T> = std::result::Result<T, Error>;

/// Runs a scanner to completion, handing every token to the channel.
///
/// This is the body of the scanning thread. `EndOfFile` is always the last
/// token enqueued, and the channel is always closed on the way out.
pub fn scan<R: Read>(mut scanner: Scanner<R>, sender: TokenSender) {
    loop {
        match scanner.next_token() {
            Ok(Token::EndOfFile) => {
                if sender.enqueue(Token::EndOfFile) {
                    sender.close(Termination::Finished);
                } else {
                    sender.close(Termination::Cancelled);
                }
                return;
            }
            Ok(token) => {
                if !sender.enqueue(token) {
                    sender.close(Termination::Cancelled);
                    return;
                }
            }
            Err(error) if error.code() == ErrorCode::Interrupted => {
                sender.close(Termination::Cancelled);
                return;
            }
            Err(error) => {
                sender.close(Termination::Failed(error));
                return;
            }
        }
    }
}

/// Byte reader with room to un-read exactly one byte.
struct Source<R: Read> {
    bytes: Bytes<BufReader<R>>,
    pushed_back: Option<u8>,
    cancel: CancelHandle,
}

impl<R: Read> Source<R> {
    fn new(reader: R, cancel: CancelHandle) -> Source<R> {
        Source {
            bytes: BufReader::new(reader).bytes(),
            pushed_back: None,
            cancel,
        }
    }

    /// Every recognizer loop reads through here, so this is where a
    /// cancel is noticed.
    fn next(&mut self) -> Result<Option<u8>> {
        if self.cancel.is_cancelled() {
            return Err(error!(Interrupted; "SCANNER CANCELLED"));
        }
        if let Some(byte) = self.pushed_back.take() {
            return Ok(Some(byte));
        }
        match self.bytes.next() {
            None => Ok(None),
            Some(Ok(byte)) => Ok(Some(byte)),
            Some(Err(e)) => Err(error!(InternalError; e.to_string())),
        }
    }

    fn back(&mut self, byte: u8) {
        debug_assert!(self.pushed_back.is_none());
        self.pushed_back = Some(byte);
    }
}

fn is_operator_lead(byte: u8) -> bool {
    OPERATORS.iter().any(|(text, _)| text.as_bytes()[0] == byte)
}

fn starts_pair(byte: u8) -> bool {
    OPERATORS
        .iter()
        .any(|(text, _)| text.len() == 2 && text.as_bytes()[0] == byte)
}

fn describe(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", char::from(byte))
    } else {
        format!("\\{:03}", byte)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberState {
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

/// ## Lexical scanner
///
/// Produces one [`Token`] per call from a byte stream. Each token class
/// has its own small state machine; the lead byte picks which one runs.
pub struct Scanner<R: Read> {
    source: Source<R>,
    line: Line,
    constants: Constants,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R, constants: Constants, cancel: CancelHandle) -> Scanner<R> {
        Scanner {
            source: Source::new(reader, cancel),
            line: 1,
            constants,
        }
    }

    /// The line the next token will be reported on.
    pub fn line(&self) -> Line {
        self.line
    }

    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let byte = match self.source.next()? {
                Some(byte) => byte,
                None => return Ok(Token::EndOfFile),
            };
            match byte {
                b' ' | b'\t' | b'\r' => continue,
                b'\n' => {
                    let line = self.line;
                    self.line += 1;
                    return Ok(Token::Separator(line));
                }
                b'!' => return self.string(),
                b'\'' => self.line_comment()?,
                b'/' => match self.source.next()? {
                    Some(b'/') => self.line_comment()?,
                    Some(b'\'') => self.block_comment()?,
                    Some(other) => {
                        self.source.back(other);
                        return self.operator(byte);
                    }
                    None => return self.operator(byte),
                },
                _ if is_operator_lead(byte) => return self.operator(byte),
                _ if byte.is_ascii_alphabetic() || byte == b'_' => return self.word(byte),
                _ if byte.is_ascii_digit() => return self.number(byte),
                _ => {
                    return Err(error!(LexicalError, self.line;
                        format!("UNEXPECTED CHARACTER {}", describe(byte))))
                }
            }
        }
    }

    fn line_comment(&mut self) -> Result<()> {
        loop {
            match self.source.next()? {
                None => return Ok(()),
                Some(b'\n') => {
                    self.source.back(b'\n');
                    return Ok(());
                }
                Some(_) => continue,
            }
        }
    }

    fn block_comment(&mut self) -> Result<()> {
        let start = self.line;
        let mut quote = false;
        loop {
            match self.source.next()? {
                None => {
                    return Err(error!(LexicalError, start; "UNTERMINATED BLOCK COMMENT"));
                }
                Some(b'/') if quote => return Ok(()),
                Some(byte) => {
                    if byte == b'\n' {
                        self.line += 1;
                    }
                    quote = byte == b'\'';
                }
            }
        }
    }

    fn string(&mut self) -> Result<Token> {
        let line = self.line;
        match self.source.next()? {
            Some(b'"') => {}
            _ => return Err(error!(LexicalError, line; "EXPECTED QUOTE AFTER !")),
        }
        let mut s: Vec<u8> = vec![];
        loop {
            match self.source.next()? {
                None | Some(b'\n') => {
                    return Err(error!(LexicalError, line; "UNTERMINATED STRING"));
                }
                Some(b'"') => break,
                Some(b'\\') => s.push(self.escape(line)?),
                Some(byte) => s.push(byte),
            }
        }
        let id = self.constants.insert(Constant::String(s));
        Ok(Token::Constant(line, id))
    }

    fn escape(&mut self, line: Line) -> Result<u8> {
        let byte = match self.source.next()? {
            Some(byte) => byte,
            None => return Err(error!(LexicalError, line; "UNTERMINATED STRING")),
        };
        match byte {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'"' => Ok(b'"'),
            b'\\' => Ok(b'\\'),
            b'0'..=b'9' => {
                let mut value = u32::from(byte - b'0');
                for _ in 0..2 {
                    match self.source.next()? {
                        Some(digit) if digit.is_ascii_digit() => {
                            value = value * 10 + u32::from(digit - b'0');
                        }
                        _ => {
                            return Err(error!(LexicalError, line;
                                "ESCAPE NEEDS THREE DIGITS"))
                        }
                    }
                }
                match u8::try_from(value) {
                    Ok(value) => Ok(value),
                    Err(_) => Err(error!(LexicalError, line;
                        format!("ESCAPE \\{:03} OUT OF RANGE", value))),
                }
            }
            _ => Err(error!(LexicalError, line;
                format!("INVALID ESCAPE {}", describe(byte)))),
        }
    }

    fn number(&mut self, first: u8) -> Result<Token> {
        use NumberState::*;
        let line = self.line;
        let mut s = String::from(char::from(first));
        let mut state = Integer;
        loop {
            let byte = self.source.next()?;
            let next_state = match (state, byte) {
                (Integer, Some(b'0'..=b'9')) => Integer,
                (Integer, Some(b'.')) => Point,
                (Integer, Some(b'e' | b'E')) => Exponent,
                (Point, Some(b'0'..=b'9')) => Fraction,
                (Fraction, Some(b'0'..=b'9')) => Fraction,
                (Fraction, Some(b'e' | b'E')) => Exponent,
                (Exponent, Some(b'+' | b'-')) => ExponentSign,
                (Exponent | ExponentSign | ExponentDigits, Some(b'0'..=b'9')) => ExponentDigits,
                (Point | Exponent | ExponentSign, _) => {
                    return Err(error!(LexicalError, line;
                        format!("MISSING DIGIT IN NUMBER {}", s)))
                }
                (_, other) => {
                    if let Some(other) = other {
                        self.source.back(other);
                    }
                    break;
                }
            };
            if let Some(byte) = byte {
                s.push(char::from(byte));
            }
            state = next_state;
        }
        let constant = if state == Integer {
            match s.parse::<i32>() {
                Ok(i) => Constant::Integer(i),
                Err(_) => {
                    return Err(error!(LexicalError, line;
                        format!("INTEGER {} OUT OF RANGE", s)))
                }
            }
        } else {
            match s.parse::<f64>() {
                Ok(d) if d.is_finite() => Constant::Double(d),
                _ => {
                    return Err(error!(LexicalError, line;
                        format!("DOUBLE {} OUT OF RANGE", s)))
                }
            }
        };
        let id = self.constants.insert(constant);
        Ok(Token::Constant(line, id))
    }

    fn operator(&mut self, first: u8) -> Result<Token> {
        let line = self.line;
        let mut s = String::from(char::from(first));
        if starts_pair(first) {
            if let Some(second) = self.source.next()? {
                s.push(char::from(second));
                if Operator::lookup(&s).is_none() {
                    s.pop();
                    self.source.back(second);
                }
            }
        }
        match Operator::lookup(&s) {
            Some(op) => Ok(Token::Operator(line, op)),
            None => Err(error!(LexicalError, line;
                format!("UNEXPECTED CHARACTER {}", describe(first)))),
        }
    }

    fn word(&mut self, first: u8) -> Result<Token> {
        let line = self.line;
        let mut s = String::from(char::from(first.to_ascii_lowercase()));
        loop {
            match self.source.next()? {
                Some(byte) if byte.is_ascii_alphanumeric() || byte == b'_' => {
                    s.push(char::from(byte.to_ascii_lowercase()));
                }
                Some(byte) => {
                    self.source.back(byte);
                    break;
                }
                None => break,
            }
        }
        if let Some(keyword) = Keyword::lookup(&s) {
            return Ok(Token::Keyword(line, keyword));
        }
        s.shrink_to_fit();
        Ok(Token::Identifier(line, s))
    }
}
