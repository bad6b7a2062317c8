use super::VarType;
use std::collections::{HashMap, HashSet};

/// Which function body a name is looked up in.
pub type FunctionId = usize;

/// The program's top level scope.
pub const MAIN: FunctionId = 0;

/// Name-definition queries the translator asks before emitting code.
pub trait Semantics {
    fn is_variable_defined(&self, function: FunctionId, name: &str) -> bool;
    fn is_function_defined(&self, name: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct Symbols {
    variables: HashMap<FunctionId, HashMap<String, VarType>>,
    functions: HashSet<String>,
}

impl Symbols {
    pub fn new() -> Symbols {
        Symbols::default()
    }

    /// Returns false if the name was already declared in that function.
    pub fn define_variable(&mut self, function: FunctionId, name: &str, var_type: VarType) -> bool {
        let scope = self.variables.entry(function).or_default();
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), var_type);
        true
    }

    pub fn variable_type(&self, function: FunctionId, name: &str) -> Option<VarType> {
        self.variables
            .get(&function)
            .and_then(|scope| scope.get(name))
            .copied()
    }

    /// Returns false if the function was already defined.
    pub fn define_function(&mut self, name: &str) -> bool {
        self.functions.insert(name.to_string())
    }
}

impl Semantics for Symbols {
    fn is_variable_defined(&self, function: FunctionId, name: &str) -> bool {
        self.variable_type(function, name).is_some()
    }

    fn is_function_defined(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_are_per_function() {
        let mut s = Symbols::new();
        assert!(s.define_variable(MAIN, "x", VarType::Integer));
        assert!(!s.define_variable(MAIN, "x", VarType::Double));
        assert!(s.define_variable(1, "x", VarType::String));
        assert!(s.is_variable_defined(MAIN, "x"));
        assert!(!s.is_variable_defined(MAIN, "y"));
        assert_eq!(s.variable_type(MAIN, "x"), Some(VarType::Integer));
        assert_eq!(s.variable_type(1, "x"), Some(VarType::String));
    }

    #[test]
    fn test_functions() {
        let mut s = Symbols::new();
        assert!(!s.is_function_defined("f"));
        assert!(s.define_function("f"));
        assert!(!s.define_function("f"));
        assert!(s.is_function_defined("f"));
    }
}
