use bitvec::prelude::*;

use crate::error::CompileError;

type LetterSet = BitArr!(for 128, in u64, Lsb0);

/// The single-character names a formula may use as its free variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alphabet {
    letters: LetterSet,
}

impl Alphabet {
    /// Builds the alphabet from every character of `names`.
    ///
    /// Names must be ASCII letters. `e` is accepted but can never be matched,
    /// because it always reads as Euler's number.
    pub fn new(names: &str) -> Result<Self, CompileError> {
        let mut letters = LetterSet::ZERO;
        for name in names.chars() {
            if !name.is_ascii_alphabetic() {
                return Err(CompileError::InvalidParameterName(name));
            }
            if name == 'e' {
                log::warn!("parameter name `e` is shadowed by Euler's number");
            }
            letters.set(name as usize, true);
        }
        Ok(Self { letters })
    }

    pub fn contains(&self, name: char) -> bool {
        name.is_ascii() && self.letters[name as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter_ones().map(|index| char::from(index as u8))
    }

    pub fn is_empty(&self) -> bool {
        self.letters.not_any()
    }
}
