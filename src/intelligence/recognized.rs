use crate::recognizer::RecognizedChar;

/// Classified characters accepted for one plate candidate, left to right.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecognizedPlate {
    chars: Vec<RecognizedChar>,
}

impl RecognizedPlate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next accepted character.
    pub fn add_char(&mut self, chr: RecognizedChar) {
        self.chars.push(chr);
    }

    pub fn chars(&self) -> &[RecognizedChar] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Best label of every character, in order.
    pub fn best_string(&self) -> String {
        self.chars.iter().map(|c| c.best().label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::RecognizedPattern;

    fn rc(label: char) -> RecognizedChar {
        RecognizedChar::new(vec![
            RecognizedPattern::new('?', 9.0),
            RecognizedPattern::new(label, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_best_string_keeps_order() {
        let mut plate = RecognizedPlate::new();
        assert!(plate.is_empty());

        for label in ['B', 'A', '7'] {
            plate.add_char(rc(label));
        }

        assert_eq!(plate.len(), 3);
        assert_eq!(plate.best_string(), "BA7");
    }
}
