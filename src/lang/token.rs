use super::constant::ConstId;

/// Source line, counted from 1.
pub type Line = u32;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Keyword(Line, Keyword),
    Operator(Line, Operator),
    Constant(Line, ConstId),
    Identifier(Line, String),
    Separator(Line),
    EndOfFile,
}

impl Token {
    pub fn line(&self) -> Option<Line> {
        use Token::*;
        match self {
            Keyword(line, _)
            | Operator(line, _)
            | Constant(line, _)
            | Identifier(line, _)
            | Separator(line) => Some(*line),
            EndOfFile => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(_, k) if *k == keyword)
    }

    pub fn is_operator(&self, operator: Operator) -> bool {
        matches!(self, Token::Operator(_, o) if *o == operator)
    }

    /// Constants and identifiers; the things an expression pushes.
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Constant(..) | Token::Identifier(..))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Keyword(_, k) => write!(f, "{}", k),
            Operator(_, o) => write!(f, "{}", o),
            Constant(_, c) => write!(f, "#{}", c),
            Identifier(_, s) => write!(f, "{}", s),
            Separator(_) => write!(f, "EOL"),
            EndOfFile => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    And,
    As,
    Asc,
    Boolean,
    Chr,
    Continue,
    Declare,
    Dim,
    Do,
    Double,
    Else,
    Elseif,
    End,
    Exit,
    False,
    For,
    Function,
    If,
    Input,
    Integer,
    Length,
    Loop,
    Next,
    Not,
    Or,
    Print,
    Return,
    Scope,
    Shared,
    Static,
    String,
    Substr,
    Then,
    True,
    While,
}

pub static KEYWORDS: [(&str, Keyword); 35] = [
    ("and", Keyword::And),
    ("as", Keyword::As),
    ("asc", Keyword::Asc),
    ("boolean", Keyword::Boolean),
    ("chr", Keyword::Chr),
    ("continue", Keyword::Continue),
    ("declare", Keyword::Declare),
    ("dim", Keyword::Dim),
    ("do", Keyword::Do),
    ("double", Keyword::Double),
    ("else", Keyword::Else),
    ("elseif", Keyword::Elseif),
    ("end", Keyword::End),
    ("exit", Keyword::Exit),
    ("false", Keyword::False),
    ("for", Keyword::For),
    ("function", Keyword::Function),
    ("if", Keyword::If),
    ("input", Keyword::Input),
    ("integer", Keyword::Integer),
    ("length", Keyword::Length),
    ("loop", Keyword::Loop),
    ("next", Keyword::Next),
    ("not", Keyword::Not),
    ("or", Keyword::Or),
    ("print", Keyword::Print),
    ("return", Keyword::Return),
    ("scope", Keyword::Scope),
    ("shared", Keyword::Shared),
    ("static", Keyword::Static),
    ("string", Keyword::String),
    ("substr", Keyword::Substr),
    ("then", Keyword::Then),
    ("true", Keyword::True),
    ("while", Keyword::While),
];

impl Keyword {
    /// Case-insensitive keyword table lookup.
    pub fn lookup(s: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(s))
            .map(|(_, k)| *k)
    }

    pub fn as_str(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, k)| k == self)
            .map(|(text, _)| *text)
            .unwrap_or("")
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Less,
    LessEqual,
    NotEqual,
    Greater,
    GreaterEqual,
    Equal,
    Plus,
    Minus,
    Multiply,
    Divide,
    DivideInt,
    LParen,
    RParen,
    Comma,
    Semicolon,
}

pub static OPERATORS: [(&str, Operator); 15] = [
    ("<", Operator::Less),
    ("<=", Operator::LessEqual),
    ("<>", Operator::NotEqual),
    (">", Operator::Greater),
    (">=", Operator::GreaterEqual),
    ("=", Operator::Equal),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Multiply),
    ("/", Operator::Divide),
    ("\\", Operator::DivideInt),
    ("(", Operator::LParen),
    (")", Operator::RParen),
    (",", Operator::Comma),
    (";", Operator::Semicolon),
];

impl Operator {
    pub fn lookup(s: &str) -> Option<Operator> {
        OPERATORS
            .iter()
            .find(|(text, _)| *text == s)
            .map(|(_, o)| *o)
    }

    pub fn as_str(&self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, o)| o == self)
            .map(|(text, _)| *text)
            .unwrap_or("")
    }

    pub fn is_relational(&self) -> bool {
        use Operator::*;
        matches!(
            self,
            Less | LessEqual | NotEqual | Greater | GreaterEqual | Equal
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        use Operator::*;
        matches!(self, Plus | Minus | Multiply | Divide | DivideInt)
    }

    /// Binding strength of an arithmetic operator; zero for everything else.
    pub fn precedence(&self) -> u8 {
        use Operator::*;
        match self {
            Multiply | Divide => 3,
            DivideInt => 2,
            Plus | Minus => 1,
            _ => 0,
        }
    }

    /// The relational operator that is true exactly when `self` is false.
    pub fn negated(&self) -> Option<Operator> {
        use Operator::*;
        match self {
            Equal => Some(NotEqual),
            NotEqual => Some(Equal),
            Less => Some(GreaterEqual),
            GreaterEqual => Some(Less),
            Greater => Some(LessEqual),
            LessEqual => Some(Greater),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
