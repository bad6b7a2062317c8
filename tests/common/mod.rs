use basic::lang::Error;
use basic::mach::{compile, Options};

pub fn compile_str(s: &str) -> Result<String, Error> {
    compile(s.as_bytes(), &Options::default())
}

/// Generated lines after the header and frame directive.
pub fn body(s: &str) -> Vec<String> {
    match compile_str(s) {
        Ok(text) => {
            let mut lines = text.lines();
            assert_eq!(lines.next(), Some(".IFJcode17"));
            assert_eq!(lines.next(), Some("CREATEFRAME"));
            lines.map(String::from).collect()
        }
        Err(e) => panic!("{}", e),
    }
}

pub fn error(s: &str) -> Error {
    match compile_str(s) {
        Ok(text) => panic!("compiled without error:\n{}", text),
        Err(e) => e,
    }
}
