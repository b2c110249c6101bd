//! Prefix codes derived from a Huffman tree.

use crate::error::CodecError;
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, NodeId, NodeKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A variable-length bit string, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        self.0.starts_with(&prefix.0)
    }

    fn extended(&self, bit: bool) -> Self {
        let mut code = self.clone();
        code.push(bit);
        code
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::InvalidCodeTable(format!(
                    "code {s:?} contains non-binary character {other:?}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Code)
    }
}

/// Bijection between symbols and their prefix-free codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Assign codes by walking the tree: left appends `0`, right appends `1`.
    /// A tree that is a single leaf gets the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        build_codes(tree, tree.root(), Code::new(), &mut codes);
        Self { codes }
    }

    /// Load a table from persisted `(symbol, code)` pairs, rejecting anything
    /// that is not a prefix-free bijection containing the end marker.
    pub fn from_codes<I>(entries: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (Symbol, Code)>,
    {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(CodecError::InvalidCodeTable(format!(
                    "symbol {symbol} has an empty code"
                )));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(CodecError::InvalidCodeTable(format!(
                    "symbol {symbol} appears more than once"
                )));
            }
        }
        if !codes.contains_key(&Symbol::EndOfStream) {
            return Err(CodecError::InvalidCodeTable(
                "missing end-of-stream entry".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (symbol, code) in &codes {
            if !seen.insert(code) {
                return Err(CodecError::InvalidCodeTable(format!(
                    "code {code} is assigned to more than one symbol (including {symbol})"
                )));
            }
        }

        let table = Self { codes };
        if let Some((shorter, longer)) = table.prefix_violation() {
            return Err(CodecError::InvalidCodeTable(format!(
                "code {shorter} is a prefix of {longer}"
            )));
        }
        Ok(table)
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    /// Reverse lookup used by the decoder.
    pub fn inverse(&self) -> HashMap<Code, Symbol> {
        self.codes.iter().map(|(&s, c)| (c.clone(), s)).collect()
    }

    // In lexicographic order a code's extensions follow it directly, so
    // checking neighbours is enough.
    fn prefix_violation(&self) -> Option<(&Code, &Code)> {
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted
            .windows(2)
            .find(|pair| pair[1].starts_with(pair[0]))
            .map(|pair| (pair[0], pair[1]))
    }
}

fn build_codes(tree: &HuffmanTree, id: NodeId, prefix: Code, codes: &mut BTreeMap<Symbol, Code>) {
    match tree.node(id).kind {
        NodeKind::Leaf(symbol) => {
            let code = if prefix.is_empty() {
                Code::from(vec![false])
            } else {
                prefix
            };
            codes.insert(symbol, code);
        }
        NodeKind::Internal { left, right } => {
            build_codes(tree, left, prefix.extended(false), codes);
            build_codes(tree, right, prefix.extended(true), codes);
        }
    }
}
