// src/pack.rs

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::{Code, CodeTable, HuffmanTree};
use bitstream_io::{BigEndian, BitWrite, BitWriter};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

pub const MAGIC: [u8; 4] = *b"HUFP";
pub const FORMAT_VERSION: u8 = 1;

/// Consumes a finished tree and writes the compressed form of `src` to `dst`.
///
/// The layout of `dst` is entirely up to the implementation.
pub trait Packer {
    fn pack(&mut self, src: &Path, dst: &Path, tree: &HuffmanTree) -> Result<PackSummary>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackSummary {
    pub input_bytes: u64,
    pub header_bytes: u64,
    /// Codeword bits written, end marker included, before padding.
    pub payload_bits: u64,
    pub output_bytes: u64,
}

/// Leading block of a packed file: enough to rebuild the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub weights: FrequencyTable,
}

impl PackHeader {
    /// Recovers the leaf weights from the tree's leaf table.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut weights = FrequencyTable::new();
        for (index, leaf) in tree.leaves().iter().enumerate() {
            if let Some(id) = leaf {
                weights.add(Symbol::from_index(index), tree.node(*id).weight());
            }
        }
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            weights,
        }
    }
}

/// Writes a bincode [`PackHeader`] followed by the MSB-first codeword of every
/// source byte, then the end marker's codeword, zero-padded to a whole byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitPacker;

impl Packer for BitPacker {
    fn pack(&mut self, src: &Path, dst: &Path, tree: &HuffmanTree) -> Result<PackSummary> {
        let span = info_span!("pack", src = %src.display(), dst = %dst.display());
        let _enter = span.enter();

        let codes = tree.codes();
        let header = PackHeader::from_tree(tree);

        // Write next to the target, then move it into place.
        let temp_path = temp_path_for(dst);
        let packed = write_packed(src, &temp_path, &header, &codes).and_then(|summary| {
            fs::rename(&temp_path, dst)?;
            Ok(summary)
        });
        match packed {
            Ok(summary) => {
                info!(
                    input_bytes = summary.input_bytes,
                    output_bytes = summary.output_bytes,
                    payload_bits = summary.payload_bits,
                    "packed"
                );
                Ok(summary)
            }
            Err(e) => {
                discard_temp(&temp_path);
                Err(e)
            }
        }
    }
}

// The temp file may never have been created if the source failed to open.
fn discard_temp(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => debug!(path = %temp_path.display(), "removed temp file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %temp_path.display(),
            error = %e,
            "could not remove temp file"
        ),
    }
}

fn temp_path_for(dst: &Path) -> PathBuf {
    let mut name = OsString::from(dst.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_packed(
    src: &Path,
    out_path: &Path,
    header: &PackHeader,
    codes: &CodeTable,
) -> Result<PackSummary> {
    let input = File::open(src).map_err(|source| Error::Open {
        path: src.to_path_buf(),
        source,
    })?;
    let end = codes.get(Symbol::END).ok_or(Error::NoEndMarker)?;

    let mut out = BufWriter::new(File::create(out_path)?);
    let header_bytes = bincode::serialize(header)?;
    out.write_all(&header_bytes)?;
    debug!(len = header_bytes.len(), "wrote header");

    let mut summary = PackSummary {
        header_bytes: header_bytes.len() as u64,
        ..PackSummary::default()
    };
    {
        let mut bits = BitWriter::endian(&mut out, BigEndian);
        for byte in BufReader::new(input).bytes() {
            let byte = byte?;
            let code = codes
                .get(Symbol::from(byte))
                .ok_or(Error::MissingCode(byte))?;
            write_code(&mut bits, code)?;
            summary.input_bytes += 1;
            summary.payload_bits += u64::from(code.len());
        }
        write_code(&mut bits, end)?;
        summary.payload_bits += u64::from(end.len());
        bits.byte_align()?;
    }
    out.flush()?;

    summary.output_bytes = summary.header_bytes + summary.payload_bits.div_ceil(8);
    Ok(summary)
}

fn write_code<W: Write>(bits: &mut BitWriter<W, BigEndian>, code: &Code) -> io::Result<()> {
    for &bit in code.bits() {
        bits.write_bit(bit)?;
    }
    Ok(())
}
