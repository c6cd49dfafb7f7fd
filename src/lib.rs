//! # huffpack
//!
//! Frequency-driven Huffman tree construction for byte streams.
//!
//! Counts bytes into a [`FrequencyTable`], always adding the end-of-stream
//! marker, merges the lightest nodes through a comparator-driven
//! [`PriorityQueue`] until one root remains, and derives per-symbol code
//! lengths and codewords from the finished [`HuffmanTree`]. A [`Packer`]
//! turns the tree and the source file into the compressed output.
//!
//! ```no_run
//! use huffpack::{BitPacker, Encoding};
//! use std::path::Path;
//!
//! let encoding = Encoding::from_path(Path::new("input.txt"))?;
//! encoding.report(std::io::stdout())?;
//! encoding.pack(Path::new("input.txt"), Path::new("input.huf"), &mut BitPacker)?;
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod error;
pub mod frequency;
pub mod pack;
pub mod pqueue;
pub mod report;
pub mod symbol;
pub mod tree;

pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use pack::{BitPacker, PackSummary, Packer};
pub use pqueue::PriorityQueue;
pub use symbol::Symbol;
pub use tree::{CodeTable, HuffmanTree};

use std::io::Write;
use std::path::Path;
use tracing::info;

/// Everything derived from one input: its counts, the merge tree, and the codes.
///
/// Each build owns its own state, so independent builds can run side by side.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub table: FrequencyTable,
    pub tree: HuffmanTree,
    pub codes: CodeTable,
}

impl Encoding {
    pub fn new(table: FrequencyTable) -> Self {
        let tree = HuffmanTree::build(&table);
        let codes = tree.codes();
        Self { table, tree, codes }
    }

    pub fn from_path(input: &Path) -> Result<Self> {
        let encoding = Self::new(FrequencyTable::from_path(input)?);
        info!(
            bytes = encoding.table.total(),
            symbols = encoding.tree.leaf_count(),
            encoded_bits = encoding.tree.encoded_bits(),
            "built codes"
        );
        Ok(encoding)
    }

    /// Prints one statistics line per byte value that occurred.
    pub fn report<W: Write>(&self, out: W) -> Result<()> {
        report::write_report(out, &self.table, &self.codes)?;
        Ok(())
    }

    pub fn pack<P: Packer>(
        &self,
        input: &Path,
        output: &Path,
        packer: &mut P,
    ) -> Result<PackSummary> {
        packer.pack(input, output, &self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_encodings_do_not_share_state() {
        let a = Encoding::new(FrequencyTable::from_bytes(b"aaaa"));
        let b = Encoding::new(FrequencyTable::from_bytes(b"xyz"));
        assert_eq!(a.tree.leaf_count(), 2);
        assert_eq!(b.tree.leaf_count(), 4);
        assert!(a.codes.get(Symbol::from(b'x')).is_none());
        assert_eq!(a.codes.length(Symbol::from(b'a')), 1);
    }
}
