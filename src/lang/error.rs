use super::LineNumber;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: LineNumber,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> i32 {
        self.code.exit_status()
    }

    pub fn in_line_number<L: Into<LineNumber>>(self, line: L) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            line_number: line.into(),
            ..self
        }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            message: message.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    LexicalError = 1,
    SyntaxError = 2,
    UndefinedName = 3,
    TypeMismatch = 4,
    SemanticError = 6,
    Interrupted = 98,
    InternalError = 99,
}

impl ErrorCode {
    pub fn exit_status(self) -> i32 {
        match self {
            ErrorCode::Interrupted => ErrorCode::InternalError as i32,
            code => code as i32,
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            ErrorCode::LexicalError => "LEXICAL ERROR",
            ErrorCode::SyntaxError => "SYNTAX ERROR",
            ErrorCode::UndefinedName => "UNDEFINED NAME",
            ErrorCode::TypeMismatch => "TYPE MISMATCH",
            ErrorCode::SemanticError => "SEMANTIC ERROR",
            ErrorCode::Interrupted => "INTERRUPTED",
            ErrorCode::InternalError => "INTERNAL ERROR",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else if self.line_number.is_some() {
            write!(f, "{} IN{}", code_str, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error;

    #[test]
    fn test_display() {
        let e = error!(SyntaxError, 12; "EXPECTED THEN");
        assert_eq!(e.to_string(), "SYNTAX ERROR IN 12; EXPECTED THEN");
        let e = error!(InternalError; "UNDERFLOW");
        assert_eq!(e.to_string(), "INTERNAL ERROR; UNDERFLOW");
        assert_eq!(error!(LexicalError).to_string(), "LEXICAL ERROR");
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(error!(LexicalError).exit_status(), 1);
        assert_eq!(error!(SyntaxError).exit_status(), 2);
        assert_eq!(error!(UndefinedName).exit_status(), 3);
        assert_eq!(error!(TypeMismatch).exit_status(), 4);
        assert_eq!(error!(SemanticError).exit_status(), 6);
        assert_eq!(error!(Interrupted).exit_status(), 99);
        assert_eq!(error!(InternalError).exit_status(), 99);
    }
}
