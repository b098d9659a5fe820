use std::fmt;
use serde::Deserialize;
use crate::corpus::tree::{NodeId, Tree};
use crate::error::{Error, Result};

/// Labels of synthetic nodes that group the pieces of a chain or split span.
pub const PLACEHOLDER_LABELS: [&str; 2] = ["*CHAIN*", "*SPLIT*"];

/// Word number of a leaf plus the number of levels to climb from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TreeAddress {
    pub wordnum: usize,
    pub height: usize,
}

/// Reference to a span of the sentence tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPointer {
    Simple(TreeAddress),
    Chain(Vec<SpanPointer>),
    Split(Vec<SpanPointer>),
}

impl SpanPointer {
    pub fn simple(wordnum: usize, height: usize) -> Self {
        SpanPointer::Simple(TreeAddress { wordnum, height })
    }

    /// Follow the leftmost piece of composite pointers down to a simple address.
    pub fn anchor(&self) -> Result<TreeAddress> {
        let mut current = self;
        loop {
            match current {
                SpanPointer::Simple(address) => return Ok(*address),
                SpanPointer::Chain(pieces) | SpanPointer::Split(pieces) => {
                    current = pieces.first().ok_or_else(|| {
                        Error::resolution(format!("pointer `{}` has no pieces", self))
                    })?;
                }
            }
        }
    }

    /// Word number of the leftmost word the pointer covers.
    pub fn resolve_word_index(&self) -> Result<usize> {
        self.anchor().map(|address| address.wordnum)
    }

    /// The constituent the pointer designates. Placeholder nodes are skipped
    /// by descending into their first child.
    pub fn resolve_node(&self, tree: &Tree) -> Result<NodeId> {
        let mut id = select(self.anchor()?, tree)?;
        loop {
            let node = tree.node(id)?;
            if !PLACEHOLDER_LABELS.contains(&node.label()) {
                return Ok(id);
            }
            id = *node.children().first().ok_or_else(|| {
                Error::resolution(format!("placeholder `{}` has no children", node.label()))
            })?;
        }
    }
}

impl fmt::Display for SpanPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pieces, sep) = match self {
            SpanPointer::Simple(address) => {
                return write!(f, "{}:{}", address.wordnum, address.height)
            }
            SpanPointer::Chain(pieces) => (pieces, "*"),
            SpanPointer::Split(pieces) => (pieces, ","),
        };
        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}

fn select(address: TreeAddress, tree: &Tree) -> Result<NodeId> {
    let leaf = tree.leaf(address.wordnum).ok_or_else(|| {
        Error::resolution(format!(
            "word {} is out of range for a sentence of {} words",
            address.wordnum,
            tree.leaves().len()
        ))
    })?;
    let chain = tree.ancestors(leaf)?;
    chain.get(address.height).copied().ok_or_else(|| {
        Error::resolution(format!(
            "height {} exceeds the depth {} of word {}",
            address.height,
            chain.len() - 1,
            address.wordnum
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // (S (NP-SBJ (DT the) (NN cat)) (VP (VBD sat) (PP (IN on) (NP (DT the) (NN mat)))))
    fn sentence() -> Tree {
        let mut tree = Tree::new("S");
        let root = tree.root();
        let np = tree.add_child(root, "NP-SBJ");
        tree.add_leaf(np, "DT", "the");
        tree.add_leaf(np, "NN", "cat");
        let vp = tree.add_child(root, "VP");
        tree.add_leaf(vp, "VBD", "sat");
        let pp = tree.add_child(vp, "PP");
        tree.add_leaf(pp, "IN", "on");
        let obj = tree.add_child(pp, "NP");
        tree.add_leaf(obj, "DT", "the");
        tree.add_leaf(obj, "NN", "mat");
        tree
    }

    fn label(tree: &Tree, id: NodeId) -> &str {
        tree.node(id).unwrap().label()
    }

    #[test]
    fn simple_pointer_climbs_height_levels() {
        let tree = sentence();
        let np = SpanPointer::simple(0, 1).resolve_node(&tree).unwrap();
        assert_eq!(label(&tree, np), "NP-SBJ");
        let pp = SpanPointer::simple(3, 1).resolve_node(&tree).unwrap();
        assert_eq!(label(&tree, pp), "PP");
        let verb = SpanPointer::simple(2, 0).resolve_node(&tree).unwrap();
        assert_eq!(label(&tree, verb), "VBD");
    }

    #[test]
    fn composite_pointers_use_leftmost_piece() {
        let tree = sentence();
        let split = SpanPointer::Split(vec![
            SpanPointer::Chain(vec![SpanPointer::simple(3, 1), SpanPointer::simple(0, 1)]),
            SpanPointer::simple(4, 0),
        ]);
        assert_eq!(split.resolve_word_index().unwrap(), 3);
        let node = split.resolve_node(&tree).unwrap();
        assert_eq!(label(&tree, node), "PP");
        assert_eq!(split.to_string(), "3:1*0:1,4:0");
    }

    #[test]
    fn placeholder_nodes_are_skipped() {
        let mut tree = Tree::new("S");
        let root = tree.root();
        let chain = tree.add_child(root, "*CHAIN*");
        let split = tree.add_child(chain, "*SPLIT*");
        tree.add_leaf(split, "NN", "x");
        let node = SpanPointer::simple(0, 2).resolve_node(&tree).unwrap();
        assert_eq!(label(&tree, node), "NN");
    }

    #[test]
    fn malformed_pointers_fail_with_resolution_error() {
        let tree = sentence();
        let out_of_range = SpanPointer::simple(42, 0);
        assert!(matches!(out_of_range.resolve_node(&tree), Err(Error::Resolution(_))));
        let too_high = SpanPointer::simple(0, 9);
        assert!(matches!(too_high.resolve_node(&tree), Err(Error::Resolution(_))));
        let empty = SpanPointer::Chain(vec![SpanPointer::Split(vec![])]);
        assert!(matches!(empty.resolve_word_index(), Err(Error::Resolution(_))));
    }

    #[test]
    fn pointers_decode_from_json() {
        let pointer: SpanPointer = serde_json::from_str(
            r#"{"chain":[{"simple":{"wordnum":5,"height":2}},{"simple":{"wordnum":1,"height":0}}]}"#,
        )
        .unwrap();
        assert_eq!(pointer.resolve_word_index().unwrap(), 5);
    }
}
