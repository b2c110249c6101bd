//! Entropy statistics for a compression run

use crate::code_table::CodeTable;
use crate::frequency::FrequencyTable;

/// Shannon entropy of the byte distribution, in bits per byte.
pub fn shannon_entropy(frequencies: &FrequencyTable) -> f64 {
    let total = frequencies.total();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for (symbol, f) in frequencies.iter() {
        if symbol.is_end_of_stream() {
            continue;
        }
        let p = f as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}

/// Mean code length per input byte under `table`, in bits. The
/// end-of-stream code is not counted.
pub fn average_code_length(frequencies: &FrequencyTable, table: &CodeTable) -> f64 {
    let total = frequencies.total();
    if total == 0 {
        return 0.0;
    }
    let weighted: u64 = frequencies
        .iter()
        .filter(|(symbol, _)| !symbol.is_end_of_stream())
        .map(|(symbol, f)| f * table.get(symbol).map_or(0, |c| c.len()) as u64)
        .sum();
    weighted as f64 / total as f64
}
