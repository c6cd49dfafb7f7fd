use crate::frequency::FrequencyTable;
use crate::pqueue::PriorityQueue;
use crate::symbol::Symbol;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Index of a node inside its [`HuffmanTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Symbol),
    /// Both children are always present. `left` was extracted first.
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    weight: u64,
    kind: NodeKind,
}

impl Node {
    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }
}

/// Per-symbol leaf lookup, indexed by [`Symbol::index`]. `None` for symbols
/// that never got a leaf.
pub type LeafTable = [Option<NodeId>; Symbol::ALPHABET];

// What the queue orders on while the tree is being merged.
#[derive(Debug, Clone, Copy)]
struct Pending {
    weight: u64,
    id: NodeId,
}

/// A Huffman merge tree. All nodes live in one arena owned by the tree and are
/// released together when it is dropped.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
    leaves: LeafTable,
}

impl HuffmanTree {
    /// Builds the tree for every byte with a nonzero count plus the end marker.
    pub fn build(table: &FrequencyTable) -> Self {
        Self::from_weights(table.eligible())
    }

    /// Builds a tree with one leaf per `(symbol, weight)` pair.
    ///
    /// The two lightest pending nodes are merged until one remains; the node
    /// extracted first becomes the left child. Equal weights merge in whatever
    /// order the heap yields them, so only the total cost is guaranteed, not
    /// the exact shape.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty, names a symbol twice, or the weights
    /// overflow `u64` when summed.
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, u64)>,
    {
        let mut nodes: Vec<Node> = Vec::new();
        let mut leaves: LeafTable = [None; Symbol::ALPHABET];
        let mut queue = PriorityQueue::new(|a: &Pending, b: &Pending| a.weight.cmp(&b.weight));

        for (symbol, weight) in weights {
            assert!(
                leaves[symbol.index()].is_none(),
                "symbol {} given twice",
                symbol
            );
            let id = NodeId(nodes.len());
            nodes.push(Node {
                weight,
                kind: NodeKind::Leaf(symbol),
            });
            leaves[symbol.index()] = Some(id);
            queue.insert(Pending { weight, id });
        }
        assert!(
            !queue.is_empty(),
            "cannot build a Huffman tree without symbols"
        );
        let leaf_count = queue.len();

        while queue.len() > 1 {
            let a = queue.extract_min();
            let b = queue.extract_min();
            let weight = a
                .weight
                .checked_add(b.weight)
                .unwrap_or_else(|| panic!("total weight overflows u64"));
            let id = NodeId(nodes.len());
            nodes.push(Node {
                weight,
                kind: NodeKind::Internal {
                    left: a.id,
                    right: b.id,
                },
            });
            queue.insert(Pending { weight, id });
        }

        let root = queue.extract_min().id;
        debug!(
            leaves = leaf_count,
            nodes = nodes.len(),
            weight = nodes[root.0].weight,
            "built huffman tree"
        );

        HuffmanTree { nodes, root, leaves }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total weight, the sum of all leaf weights.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.iter().flatten().count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    pub fn leaf(&self, symbol: Symbol) -> Option<NodeId> {
        self.leaves[symbol.index()]
    }

    pub fn leaves(&self) -> &LeafTable {
        &self.leaves
    }

    /// Distance from the root for every leaf. The root itself is depth 0.
    pub fn depths(&self) -> [Option<u32>; Symbol::ALPHABET] {
        let mut depths = [None; Symbol::ALPHABET];
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id).kind {
                NodeKind::Leaf(symbol) => depths[symbol.index()] = Some(depth),
                NodeKind::Internal { left, right } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        depths
    }

    /// Code length of `symbol`, `None` if it has no leaf.
    pub fn depth(&self, symbol: Symbol) -> Option<u32> {
        self.leaf(symbol)?;
        self.depths()[symbol.index()]
    }

    /// Sum of weight times depth over all leaves: the encoded size in bits.
    pub fn encoded_bits(&self) -> u64 {
        self.depths()
            .iter()
            .zip(self.leaves.iter())
            .filter_map(|(depth, leaf)| {
                Some(self.node((*leaf)?).weight * u64::from((*depth)?))
            })
            .sum()
    }

    /// Codewords for every leaf: a left edge is `0`, a right edge is `1`.
    pub fn codes(&self) -> CodeTable {
        let mut table = CodeTable::default();
        let mut prefix = Vec::new();
        self.collect_codes(self.root, &mut prefix, &mut table);
        table
    }

    fn collect_codes(&self, id: NodeId, prefix: &mut Vec<bool>, table: &mut CodeTable) {
        match self.node(id).kind {
            NodeKind::Leaf(symbol) => {
                table.codes.insert(symbol, Code {
                    bits: prefix.clone(),
                });
            }
            NodeKind::Internal { left, right } => {
                prefix.push(false);
                self.collect_codes(left, prefix, table);
                prefix.pop();
                prefix.push(true);
                self.collect_codes(right, prefix, table);
                prefix.pop();
            }
        }
    }
}

/// A codeword, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> u32 {
        self.bits.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to codeword mapping extracted from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Bit length of `symbol`'s code, 0 when it has none.
    pub fn length(&self, symbol: Symbol) -> u32 {
        self.get(symbol).map_or(0, Code::len)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Bits needed to encode everything counted in `table`.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(s, c)| table.count(s) * u64::from(c.len()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn classic() -> HuffmanTree {
        // a..f
        let weights = [5, 9, 12, 13, 16, 45];
        HuffmanTree::from_weights((b'a'..).zip(weights).map(|(b, w)| (Symbol::from(b), w)))
    }

    // Every node except the root is somebody's child exactly once.
    fn assert_single_root(tree: &HuffmanTree) {
        let mut parents = vec![0usize; tree.node_count()];
        for i in 0..tree.node_count() {
            if let Some((l, r)) = tree.node(NodeId(i)).children() {
                parents[l.0] += 1;
                parents[r.0] += 1;
            }
        }
        let roots: Vec<_> = (0..parents.len()).filter(|&i| parents[i] == 0).collect();
        assert_eq!(roots, vec![tree.root().0]);
        assert!(parents.iter().all(|&p| p <= 1));
    }

    #[test]
    fn classic_distribution_costs_224_bits() {
        let tree = classic();
        assert_eq!(tree.encoded_bits(), 224);
        assert_eq!(tree.weight(), 100);
        assert_eq!(tree.depth(Symbol::from(b'f')), Some(1));
        assert_eq!(tree.depth(Symbol::from(b'a')), Some(4));
        assert_eq!(tree.depth(Symbol::from(b'e')), Some(3));

        let codes = tree.codes();
        let table = FrequencyTable::from(vec![
            (Symbol::from(b'a'), 5),
            (Symbol::from(b'b'), 9),
            (Symbol::from(b'c'), 12),
            (Symbol::from(b'd'), 13),
            (Symbol::from(b'e'), 16),
            (Symbol::from(b'f'), 45),
        ]);
        assert_eq!(codes.encoded_bits(&table), 224);
        // 45 is extracted before the 55 subtree, so it sits on the left
        assert_eq!(codes.get(Symbol::from(b'f')).unwrap().to_string(), "0");
    }

    #[test]
    fn only_end_marker_is_a_single_leaf() {
        let tree = HuffmanTree::build(&FrequencyTable::new());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.leaf(Symbol::END), Some(tree.root()));
        assert_eq!(tree.depth(Symbol::END), Some(0));
        assert_eq!(tree.weight(), 0);
        assert_eq!(tree.encoded_bits(), 0);

        let codes = tree.codes();
        assert_eq!(codes.len(), 1);
        assert!(codes.get(Symbol::END).unwrap().is_empty());
    }

    #[test]
    fn shape_and_weight_hold_for_random_tables() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut table = FrequencyTable::new();
            for _ in 0..rng.gen_range(0..40) {
                let byte: u8 = rng.gen_range(0..=255);
                table.add(Symbol::from(byte), rng.gen_range(1..500));
            }
            let tree = HuffmanTree::build(&table);
            let k = table.eligible().count();

            assert_eq!(tree.leaf_count(), k);
            assert_eq!(tree.internal_count(), k - 1);
            assert_eq!(tree.weight(), table.total());
            assert_single_root(&tree);

            let depths = tree.depths();
            for (symbol, _) in table.eligible() {
                assert!(depths[symbol.index()].is_some());
            }
            assert_eq!(tree.codes().encoded_bits(&table), tree.encoded_bits());
        }
    }

    #[test]
    fn codes_are_prefix_free_and_match_depths() {
        let table = FrequencyTable::from_bytes(b"she sells sea shells by the sea shore");
        let tree = HuffmanTree::build(&table);
        let codes = tree.codes();
        let list: Vec<_> = codes.iter().collect();
        for (i, (sa, a)) in list.iter().enumerate() {
            assert_eq!(Some(a.len()), tree.depth(*sa));
            for (j, (_, b)) in list.iter().enumerate() {
                if i != j {
                    assert!(
                        !b.bits().starts_with(a.bits()),
                        "{} is a prefix of {}",
                        a,
                        b
                    );
                }
            }
        }
        // a full binary tree saturates the Kraft inequality
        let kraft: f64 = list.iter().map(|(_, c)| 0.5f64.powi(c.len() as i32)).sum();
        assert!((kraft - 1.0).abs() < 1e-12);
    }

    #[test]
    fn leaf_table_covers_exactly_the_eligible_symbols() {
        let table = FrequencyTable::from_bytes(b"\x00\x00\xff");
        let tree = HuffmanTree::build(&table);
        for i in 0..Symbol::ALPHABET {
            let symbol = Symbol::from_index(i);
            let expected = i == 0 || i == 255 || symbol.is_end();
            assert_eq!(tree.leaves()[i].is_some(), expected, "slot {}", i);
            if let Some(id) = tree.leaf(symbol) {
                assert_eq!(tree.node(id).symbol(), Some(symbol));
                assert_eq!(tree.node(id).weight(), table.count(symbol));
            }
        }
    }

    #[test]
    fn end_marker_with_zero_count_is_merged_first() {
        let table = FrequencyTable::from_bytes(b"aaab");
        let tree = HuffmanTree::build(&table);
        // END (0) and b (1) merge first, then that pair with a (3)
        assert_eq!(tree.depth(Symbol::from(b'a')), Some(1));
        assert_eq!(tree.depth(Symbol::from(b'b')), Some(2));
        assert_eq!(tree.depth(Symbol::END), Some(2));
        let (left, _) = tree.node(tree.root()).children().unwrap();
        assert_eq!(tree.node(left).weight(), 1);
    }

    #[test]
    #[should_panic(expected = "without symbols")]
    fn empty_weights_panic() {
        HuffmanTree::from_weights(std::iter::empty());
    }

    #[test]
    #[should_panic(expected = "given twice")]
    fn duplicate_symbol_panics() {
        HuffmanTree::from_weights([(Symbol::END, 1), (Symbol::END, 2)]);
    }
}
