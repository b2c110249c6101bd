//! Huffman tree construction
//!
//! Nodes live in a flat arena and refer to each other by index, so the
//! optional parent link never participates in ownership.

use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// Index of a node inside a [`HuffmanTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Symbol),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the minimum-weight tree for a frequency table.
    ///
    /// Leaves enter the queue in symbol order (bytes ascending, end marker
    /// last). On equal weights the node that entered the queue first pops
    /// first, and each merge puts the first-popped node on the left.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self, CodecError> {
        Self::from_weights(frequencies.iter())
    }

    /// Build from arbitrary `(symbol, weight)` pairs in arrival order.
    /// Zero-weight entries are skipped.
    pub fn from_weights<I>(weights: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (Symbol, u64)>,
    {
        let mut nodes = Vec::new();
        // (weight, arrival sequence, arena index)
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        for (symbol, weight) in weights {
            if weight == 0 {
                continue;
            }
            let id = nodes.len();
            nodes.push(Node {
                weight,
                kind: NodeKind::Leaf(symbol),
                parent: None,
            });
            heap.push(Reverse((weight, seq, id)));
            seq += 1;
            trace!(%symbol, weight, "queued leaf");
        }

        if heap.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let leaves = nodes.len();

        while heap.len() > 1 {
            let Reverse((lw, _, left)) = heap.pop().ok_or(CodecError::EmptyInput)?;
            let Reverse((rw, _, right)) = heap.pop().ok_or(CodecError::EmptyInput)?;
            let id = nodes.len();
            let weight = lw.checked_add(rw).ok_or(CodecError::FrequencyOverflow)?;
            nodes.push(Node {
                weight,
                kind: NodeKind::Internal {
                    left: NodeId(left),
                    right: NodeId(right),
                },
                parent: None,
            });
            nodes[left].parent = Some(NodeId(id));
            nodes[right].parent = Some(NodeId(id));
            heap.push(Reverse((weight, seq, id)));
            seq += 1;
            trace!(left, right, weight, "merged nodes");
        }

        let Some(Reverse((_, _, root))) = heap.pop() else {
            return Err(CodecError::EmptyInput);
        };
        debug!(leaves, nodes = nodes.len(), "built huffman tree");
        Ok(Self {
            nodes,
            root: NodeId(root),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of a node, counted by following parent links to the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    /// Leaves in depth-first order, left subtree before right.
    pub fn leaves(&self) -> Vec<(NodeId, Symbol)> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id).kind {
                NodeKind::Leaf(symbol) => out.push((id, symbol)),
                NodeKind::Internal { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}
