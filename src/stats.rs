//! Persisted code tables ("statistics" artifacts)
//!
//! The text format has one leaf per line, left to right across the tree:
//!
//! ```text
//! Node: 0x61 Freq: 5 Code: 0
//! Node: EOS Freq: 1 Code: 10
//! ```
//!
//! JSON and bincode carry the same records.

use crate::code_table::{Code, CodeTable};
use crate::config::TableFormat;
use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub symbol: Symbol,
    pub frequency: Option<u64>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTable {
    records: Vec<StatsRecord>,
}

impl StatsTable {
    /// Records for every entry of `table`, ordered by code (the tree's leaf
    /// order). Frequencies are attached when a histogram is supplied.
    pub fn from_tables(table: &CodeTable, frequencies: Option<&FrequencyTable>) -> Self {
        let mut entries: Vec<(Symbol, &Code)> = table.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(b.1));
        let records = entries
            .into_iter()
            .map(|(symbol, code)| StatsRecord {
                symbol,
                frequency: frequencies.map(|f| f.get(symbol)),
                code: code.to_string(),
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[StatsRecord] {
        &self.records
    }

    /// Validate and convert back into a code table.
    pub fn into_code_table(self) -> Result<CodeTable, CodecError> {
        let entries = self
            .records
            .into_iter()
            .map(|r| Ok((r.symbol, r.code.parse::<Code>()?)))
            .collect::<Result<Vec<_>, CodecError>>()?;
        CodeTable::from_codes(entries)
    }

    /// The stored histogram, or `None` if some byte record has no frequency.
    ///
    /// Each byte may appear once, with a non-zero count; a zero would drop
    /// the byte from the rebuilt table.
    pub fn frequencies(&self) -> Result<Option<FrequencyTable>, CodecError> {
        let mut seen = [false; 256];
        let mut counts = Vec::with_capacity(self.records.len());
        for r in &self.records {
            let Symbol::Byte(b) = r.symbol else {
                continue;
            };
            if std::mem::replace(&mut seen[b as usize], true) {
                return Err(CodecError::InvalidCodeTable(format!(
                    "symbol {} appears more than once",
                    r.symbol
                )));
            }
            match r.frequency {
                None => return Ok(None),
                Some(0) => {
                    return Err(CodecError::InvalidCodeTable(format!(
                        "symbol {} has a zero frequency",
                        r.symbol
                    )))
                }
                Some(f) => counts.push((b, f)),
            }
        }
        FrequencyTable::from_counts(counts).map(Some)
    }

    pub fn write<W: Write>(&self, format: TableFormat, mut writer: W) -> Result<(), CodecError> {
        match format {
            TableFormat::Text => {
                for r in &self.records {
                    match r.frequency {
                        Some(f) => writeln!(writer, "Node: {} Freq: {} Code: {}", r.symbol, f, r.code)?,
                        None => writeln!(writer, "Node: {} Freq: - Code: {}", r.symbol, r.code)?,
                    }
                }
            }
            TableFormat::Json => serde_json::to_writer_pretty(&mut writer, &self.records)
                .map_err(|e| CodecError::SerializationError(e.to_string()))?,
            TableFormat::Binary => bincode::serialize_into(&mut writer, &self.records)
                .map_err(|e| CodecError::SerializationError(e.to_string()))?,
        }
        writer.flush()?;
        debug!(%format, entries = self.records.len(), "wrote statistics");
        Ok(())
    }

    pub fn read<R: Read>(format: TableFormat, reader: R) -> Result<Self, CodecError> {
        let records = match format {
            TableFormat::Text => read_text(reader)?,
            TableFormat::Json => serde_json::from_reader(reader)
                .map_err(|e| CodecError::SerializationError(e.to_string()))?,
            TableFormat::Binary => bincode::deserialize_from(reader)
                .map_err(|e| CodecError::SerializationError(e.to_string()))?,
        };
        debug!(%format, entries = records.len(), "read statistics");
        Ok(Self { records })
    }
}

fn read_text<R: Read>(reader: R) -> Result<Vec<StatsRecord>, CodecError> {
    let mut records = Vec::new();
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(&line).map_err(|reason| CodecError::MalformedStats {
            line: i + 1,
            reason,
        })?);
    }
    Ok(records)
}

fn parse_line(line: &str) -> Result<StatsRecord, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let &[node, symbol, freq, frequency, code_label, code] = parts.as_slice() else {
        return Err(format!("expected 6 fields, found {}", parts.len()));
    };
    if node != "Node:" || freq != "Freq:" || code_label != "Code:" {
        return Err("expected `Node: <symbol> Freq: <n> Code: <bits>`".into());
    }
    let symbol = symbol.parse::<Symbol>().map_err(|e| e.to_string())?;
    let frequency = match frequency {
        "-" => None,
        n => Some(n.parse::<u64>().map_err(|e| format!("bad frequency {n:?}: {e}"))?),
    };
    Ok(StatsRecord {
        symbol,
        frequency,
        code: code.to_string(),
    })
}
