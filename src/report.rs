use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::CodeTable;
use std::fmt;
use std::io::{self, Write};

/// One line of the human-readable statistics printed after a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine {
    pub byte: u8,
    pub count: u64,
    pub bits: u32,
}

impl ReportLine {
    pub fn total_bits(&self) -> u64 {
        self.count * u64::from(self.bits)
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} x {} bits = {} bits",
            Symbol::from(self.byte),
            self.count,
            self.bits,
            self.total_bits()
        )
    }
}

/// Lines for every byte value that occurred, in ascending byte order.
pub fn report_lines<'a>(
    table: &'a FrequencyTable,
    codes: &'a CodeTable,
) -> impl Iterator<Item = ReportLine> + 'a {
    (0..=255u8).filter_map(move |byte| {
        let symbol = Symbol::from(byte);
        let count = table.count(symbol);
        (count > 0).then(|| ReportLine {
            byte,
            count,
            bits: codes.length(symbol),
        })
    })
}

pub fn write_report<W: Write>(
    mut out: W,
    table: &FrequencyTable,
    codes: &CodeTable,
) -> io::Result<()> {
    for line in report_lines(table, codes) {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
