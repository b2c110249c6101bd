//! Configuration for huffpack

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// On-disk representation of a statistics artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// `Node: <symbol> Freq: <n> Code: <bits>` lines.
    #[default]
    Text,
    Json,
    Binary,
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableFormat::Text => "text",
            TableFormat::Json => "json",
            TableFormat::Binary => "binary",
        })
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(TableFormat::Text),
            "json" => Ok(TableFormat::Json),
            "binary" => Ok(TableFormat::Binary),
            other => Err(format!("unknown table format {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub max_input_size: usize,
    pub table_format: TableFormat,
    pub statistics_suffix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            table_format: TableFormat::Text,
            statistics_suffix: "-statistics.txt".to_string(),
        }
    }
}

impl CodecConfig {
    /// Load a JSON config; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, CodecError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| CodecError::SerializationError(e.to_string()))
    }
}
