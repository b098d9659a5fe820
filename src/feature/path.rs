use crate::corpus::{NodeId, Tree};
use crate::error::{Error, Result};
use crate::feature::label::normalize;

/// Marker appended to a node passed on the way up from the argument.
pub const UP: char = '^';
/// Marker appended to a node passed on the way down to the predicate.
pub const DOWN: char = '!';

/// Syntactic path from `argument` to `predicate` through their lowest common
/// ancestor, e.g. `NP^VP` for an object-less subject. Neither the ancestor
/// nor the predicate node appears in the path.
pub fn tree_path(tree: &Tree, argument: NodeId, predicate: NodeId) -> Result<String> {
    let seq_a = tree.ancestors(argument)?;
    let seq_b = tree.ancestors(predicate)?;
    let (joint_a, joint_b) = seq_a
        .iter()
        .enumerate()
        .find_map(|(i, node)| seq_b.iter().position(|other| other == node).map(|j| (i, j)))
        .ok_or_else(|| {
            Error::resolution(format!(
                "nodes {} and {} share no ancestor",
                argument.index(),
                predicate.index()
            ))
        })?;

    let mut path = String::new();
    for id in &seq_a[..joint_a] {
        path.push_str(normalize(tree.node(*id)?.label()));
        path.push(UP);
    }
    for i in (1..joint_b).rev() {
        path.push_str(normalize(tree.node(seq_b[i])?.label()));
        path.push(DOWN);
    }
    path.pop();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_to_verb() {
        // (S (NP x) (VP (V y)))
        let mut tree = Tree::new("S");
        let root = tree.root();
        let np = tree.add_leaf(root, "NP", "x");
        let vp = tree.add_child(root, "VP");
        let v = tree.add_leaf(vp, "V", "y");
        assert_eq!(tree_path(&tree, np, v).unwrap(), "NP^VP");
    }

    #[test]
    fn deeper_path_normalizes_labels() {
        // (S (NP-SBJ-1 (DT the) (NN cat)) (VP (MD will) (VP-2 (VB sit) (PP-LOC (IN on) (NP it)))))
        let mut tree = Tree::new("S");
        let root = tree.root();
        let subj = tree.add_child(root, "NP-SBJ-1");
        tree.add_leaf(subj, "DT", "the");
        let noun = tree.add_leaf(subj, "NN", "cat");
        let vp = tree.add_child(root, "VP");
        tree.add_leaf(vp, "MD", "will");
        let inner = tree.add_child(vp, "VP-2");
        let verb = tree.add_leaf(inner, "VB", "sit");
        let pp = tree.add_child(inner, "PP-LOC");
        tree.add_leaf(pp, "IN", "on");
        tree.add_leaf(pp, "NP", "it");

        assert_eq!(tree_path(&tree, subj, verb).unwrap(), "NP^VP!VP");
        assert_eq!(tree_path(&tree, noun, verb).unwrap(), "NN^NP^VP!VP");
        assert_eq!(tree_path(&tree, pp, verb).unwrap(), "PP");
    }

    #[test]
    fn identical_or_dominating_nodes_give_empty_path() {
        let mut tree = Tree::new("S");
        let root = tree.root();
        let vp = tree.add_child(root, "VP");
        let v = tree.add_leaf(vp, "V", "go");
        assert_eq!(tree_path(&tree, v, v).unwrap(), "");
        assert_eq!(tree_path(&tree, vp, v).unwrap(), "");
        assert_eq!(tree_path(&tree, v, vp).unwrap(), "V");
    }

    #[test]
    fn lowest_common_ancestor_is_unique_in_a_tree() {
        let mut tree = Tree::new("S");
        let root = tree.root();
        let a = tree.add_child(root, "A");
        let b = tree.add_child(a, "B");
        let c = tree.add_leaf(b, "C", "c");
        let d = tree.add_leaf(a, "D", "d");
        tree.check_single_parent().unwrap();
        let seq_c = tree.ancestors(c).unwrap();
        let seq_d = tree.ancestors(d).unwrap();
        let shared: Vec<_> = seq_c.iter().filter(|n| seq_d.contains(n)).collect();
        // shared ancestors form a suffix of both chains, the first is the LCA
        assert_eq!(shared, vec![&a, &root]);
        assert_eq!(tree_path(&tree, c, d).unwrap(), "C^B");
    }

    #[test]
    fn disconnected_nodes_fail() {
        let mut tree = Tree::new("S");
        let root = tree.root();
        let a = tree.add_leaf(root, "A", "a");
        let b = tree.add_leaf(root, "B", "b");
        tree.set_parent(b, None);
        assert!(matches!(tree_path(&tree, a, b), Err(Error::Resolution(_))));
    }
}
