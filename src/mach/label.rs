use std::rc::Rc;

/// Branch target name.
pub type Label = Rc<str>;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const START_WIDTH: usize = 4;

/// ## Label name odometer
///
/// Counts through the alphabet like the wheels of an odometer. When every
/// wheel rolls over another wheel is added, so a name is never handed out
/// twice.

#[derive(Debug)]
pub struct LabelMaker {
    wheels: Vec<usize>,
}

impl Default for LabelMaker {
    fn default() -> LabelMaker {
        LabelMaker {
            wheels: vec![0; START_WIDTH],
        }
    }
}

impl LabelMaker {
    pub fn new() -> LabelMaker {
        LabelMaker::default()
    }

    pub fn next_label(&mut self) -> Label {
        let mut name = String::with_capacity(self.wheels.len() + 1);
        name.push('$');
        for wheel in &self.wheels {
            name.push(char::from(ALPHABET[*wheel]));
        }
        self.advance();
        name.into()
    }

    fn advance(&mut self) {
        for wheel in self.wheels.iter_mut().rev() {
            *wheel += 1;
            if *wheel < ALPHABET.len() {
                return;
            }
            *wheel = 0;
        }
        self.wheels.insert(0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequence() {
        let mut m = LabelMaker::new();
        assert_eq!(&*m.next_label(), "$aaaa");
        assert_eq!(&*m.next_label(), "$aaab");
        for _ in 2..26 {
            m.next_label();
        }
        assert_eq!(&*m.next_label(), "$aaba");
    }

    #[test]
    fn test_rollover_adds_a_wheel() {
        let mut m = LabelMaker {
            wheels: vec![25; START_WIDTH],
        };
        assert_eq!(&*m.next_label(), "$zzzz");
        assert_eq!(&*m.next_label(), "$aaaaa");
    }

    #[test]
    fn test_unique() {
        let mut m = LabelMaker::new();
        let names: HashSet<Label> = (0..2000).map(|_| m.next_label()).collect();
        assert_eq!(names.len(), 2000);
    }
}
