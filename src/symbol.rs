use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the coding alphabet: a byte value `0..=255`, or the
/// end-of-stream marker [`Symbol::END`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Symbol(u16);

impl Symbol {
    /// Reserved end-of-stream marker. Always present as a leaf.
    pub const END: Symbol = Symbol(256);

    /// Number of slots in the alphabet (256 bytes plus the marker).
    pub const ALPHABET: usize = 257;

    /// Builds a symbol from a raw slot index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the alphabet.
    pub fn from_index(index: usize) -> Self {
        assert!(
            index < Self::ALPHABET,
            "symbol index {} out of range",
            index
        );
        Symbol(index as u16)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_end(self) -> bool {
        self.0 == 256
    }

    /// The byte this symbol stands for, `None` for the end marker.
    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol(byte as u16)
    }
}

impl TryFrom<u16> for Symbol {
    type Error = String;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        if (raw as usize) < Self::ALPHABET {
            Ok(Symbol(raw))
        } else {
            Err(format!("symbol {} outside the alphabet", raw))
        }
    }
}

impl From<Symbol> for u16 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_byte() {
            Some(b) if b.is_ascii_graphic() || b == b' ' => write!(f, "{}", b as char),
            Some(b) => write!(f, "{:03o}", b),
            None => write!(f, "EOF"),
        }
    }
}
