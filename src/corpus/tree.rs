use serde::Deserialize;
use crate::error::{Error, Result};

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    token: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Constituency tree stored as an arena. Children are owned by position in
/// the arena, parents are plain indices used only to walk upwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "NodeSpec")]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Nested form of a tree as it appears in the instance corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub label: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl From<NodeSpec> for Tree {
    fn from(spec: NodeSpec) -> Self {
        let mut tree = Tree::new(&spec.label);
        tree.nodes[0].token = spec.token;
        let root = tree.root();
        let mut stack: Vec<(NodeId, Vec<NodeSpec>)> = vec![(root, spec.children)];
        while let Some((parent, children)) = stack.pop() {
            for child in children {
                let id = tree.push(parent, child.label, child.token);
                if !child.children.is_empty() {
                    stack.push((id, child.children));
                }
            }
        }
        tree
    }
}

impl Tree {
    pub fn new(root_label: &str) -> Self {
        Self {
            nodes: vec![Node {
                label: root_label.to_string(),
                token: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    fn push(&mut self, parent: NodeId, label: String, token: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label,
            token,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an inner node labelled `label` as last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, label: &str) -> NodeId {
        self.push(parent, label.to_string(), None)
    }

    /// Append a preterminal carrying `token` as last child of `parent`.
    pub fn add_leaf(&mut self, parent: NodeId, label: &str, token: &str) -> NodeId {
        self.push(parent, label.to_string(), Some(token.to_string()))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id)
            .ok_or_else(|| Error::resolution(format!("node {} is not part of the tree", id.0)))
    }

    /// Childless nodes in left-to-right order; position is the word number.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.children.is_empty() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }

    pub fn leaf(&self, wordnum: usize) -> Option<NodeId> {
        self.leaves().get(wordnum).copied()
    }

    /// `[id, parent(id), ..., root]`. Fails if the parent chain loops.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            if chain.len() > self.nodes.len() {
                return Err(Error::resolution(format!(
                    "parent chain of node {} does not terminate",
                    id.0
                )));
            }
            chain.push(parent);
            current = self.node(parent)?;
        }
        Ok(chain)
    }

    /// Every non-root node is listed by exactly one parent, and that parent is
    /// the one it points back to. Lowest-common-ancestor search depends on it.
    pub fn check_single_parent(&self) -> Result<()> {
        let mut owners = vec![0usize; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                let child_node = self.node(*child)?;
                if child_node.parent != Some(NodeId(index)) {
                    return Err(Error::resolution(format!(
                        "node {} is listed under {} but points to {:?}",
                        child.0, index, child_node.parent
                    )));
                }
                owners[child.0] += 1;
            }
        }
        for (index, count) in owners.iter().enumerate() {
            let expected = if index == 0 { 0 } else { 1 };
            if *count != expected {
                return Err(Error::resolution(format!(
                    "node {} has {} parents",
                    index, count
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }
}
