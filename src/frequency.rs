use crate::error::{Error, Result};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Occurrence count per symbol.
///
/// Every byte value has a counter, and so does [`Symbol::END`]; the marker
/// can never be missing, even when its count is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<(Symbol, u64)>", from = "Vec<(Symbol, u64)>")]
pub struct FrequencyTable {
    counts: [u64; Symbol::ALPHABET],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; Symbol::ALPHABET],
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        for &b in bytes {
            table.record(b);
        }
        table
    }

    /// Counts bytes from `reader` until end of stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        for byte in BufReader::new(reader).bytes() {
            table.record(byte?);
        }
        Ok(table)
    }

    /// Counts the bytes of the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            bytes = table.total(),
            distinct = table.distinct(),
            "counted input"
        );
        Ok(table)
    }

    pub fn record(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
    }

    pub fn add(&mut self, symbol: Symbol, n: u64) {
        self.counts[symbol.index()] += n;
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Number of real bytes counted. The end marker is not included.
    pub fn total(&self) -> u64 {
        self.counts[..256].iter().sum()
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts[..256].iter().filter(|&&c| c > 0).count()
    }

    /// Symbols that get a leaf: every byte with a nonzero count, ascending,
    /// then the end marker unconditionally.
    pub fn eligible(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        (0..=255u8)
            .map(|b| (Symbol::from(b), self.counts[b as usize]))
            .filter(|&(_, c)| c > 0)
            .chain(std::iter::once((Symbol::END, self.count(Symbol::END))))
    }
}

impl From<FrequencyTable> for Vec<(Symbol, u64)> {
    fn from(table: FrequencyTable) -> Self {
        table.eligible().collect()
    }
}

impl From<Vec<(Symbol, u64)>> for FrequencyTable {
    fn from(entries: Vec<(Symbol, u64)>) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, n) in entries {
            table.add(symbol, n);
        }
        table
    }
}
