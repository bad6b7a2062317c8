use parking_lot::Mutex;
use std::sync::Arc;

/// Index into the constant table. Stable for the whole compilation.
pub type ConstId = usize;

pub const DEFAULT_INTEGER: ConstId = 0;
pub const DEFAULT_DOUBLE: ConstId = 1;
pub const DEFAULT_STRING: ConstId = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer(i32),
    Double(f64),
    String(Vec<u8>),
}

impl Constant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Integer(_) => "int",
            Constant::Double(_) => "float",
            Constant::String(_) => "string",
        }
    }
}

/// ## Append-only literal store
///
/// Shared by the scanner thread, which interns literals, and the generator,
/// which reads them back by index. Cloning shares the same table.

#[derive(Debug, Clone)]
pub struct Constants {
    entries: Arc<Mutex<Vec<Constant>>>,
}

impl Default for Constants {
    fn default() -> Constants {
        Constants::new()
    }
}

impl Constants {
    pub fn new() -> Constants {
        Constants {
            entries: Arc::new(Mutex::new(vec![
                Constant::Integer(0),
                Constant::Double(0.0),
                Constant::String(vec![]),
            ])),
        }
    }

    pub fn insert(&self, constant: Constant) -> ConstId {
        let mut entries = self.entries.lock();
        entries.push(constant);
        entries.len() - 1
    }

    pub fn get(&self, id: ConstId) -> Option<Constant> {
        self.entries.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_defaults() {
        let c = Constants::new();
        assert_eq!(c.len(), 3);
        assert_eq!(c.get(DEFAULT_INTEGER), Some(Constant::Integer(0)));
        assert_eq!(c.get(DEFAULT_DOUBLE), Some(Constant::Double(0.0)));
        assert_eq!(c.get(DEFAULT_STRING), Some(Constant::String(vec![])));
    }

    #[test]
    fn test_indices_are_stable() {
        let c = Constants::new();
        let a = c.insert(Constant::Integer(7));
        let shared = c.clone();
        let b = shared.insert(Constant::String(b"seven".to_vec()));
        assert_eq!(a, 3);
        assert_eq!(b, 4);
        assert_eq!(c.get(a), Some(Constant::Integer(7)));
        assert_eq!(c.get(b), Some(Constant::String(b"seven".to_vec())));
        assert_eq!(c.get(5), None);
    }
}
