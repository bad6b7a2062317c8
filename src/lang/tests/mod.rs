use super::{CancelHandle, Constants, Error, Scanner, Token};


fn tokens(s: &str) -> (Vec<Token>, Constants) {
    match try_tokens(s) {
        (Ok(tokens), constants) => (tokens, constants),
        (Err(e), _) => panic!("{}", e),
    }
}

fn try_tokens(s: &str) -> (Result<Vec<Token>, Error>, Constants) {
    let constants = Constants::new();
    let mut scanner = Scanner::new(s.as_bytes(), constants.clone(), CancelHandle::new());
    let mut v = vec![];
    loop {
        match scanner.next_token() {
            Ok(Token::EndOfFile) => return (Ok(v), constants),
            Ok(t) => v.push(t),
            Err(e) => return (Err(e), constants),
        }
    }
}
