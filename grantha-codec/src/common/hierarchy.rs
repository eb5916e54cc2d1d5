//! Builds a nested tree from a flat, ref-keyed passage list.
//!
//! # The High-Level Concept
//!
//! Passages are stored flat, each carrying a dotted ref such as `3.1.12`.
//! Markdown needs them nested: one heading per level of the structure
//! schema, with the passage body under the deepest heading. Splitting every
//! ref on `.` and descending one tree level per component recovers that
//! nesting with a single algorithm for any schema depth.
//!
//! # The Arena
//!
//! Nodes live in a flat `Vec` and refer to their children by index. Each
//! node keeps its children in a `BTreeMap` keyed by the integer value of the
//! ref component, so iteration is numeric (`9` before `10`) without a
//! separate sort. The root is always index 0 and carries no passages.
//!
//! ```text
//! refs: 1.1  1.2  2.1          arena:
//!                                0 root ─┬─ 1 "1" ─┬─ 2 "1.1" [p]
//!                                        │         └─ 3 "1.2" [p]
//!                                        └─ 4 "2" ─── 5 "2.1" [p]
//! ```
//!
//! # Invariant
//!
//! Every ref must have exactly `schema_depth` positive-integer components,
//! each written in canonical decimal form (`1.2`, never `1.02`). Building
//! fails otherwise; a shallower or deeper ref would otherwise land under a
//! heading whose level name does not describe it, and headings carry the
//! rebuilt canonical ref, not the source text.

use crate::error::{ConvertError, Result};
use crate::model::{schema_depth, Passage, StructureLevel};
use std::collections::BTreeMap;

/// Index of a node within a [`HierarchyTree`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<'a> {
    /// Integer value of this node's own ref component (0 for the root).
    pub key: u64,
    /// 0-indexed schema depth; the root is `None`.
    pub depth: Option<usize>,
    /// Full dotted ref of this node, e.g. `1.2`.
    pub reference: String,
    pub passages: Vec<&'a Passage>,
    pub children: BTreeMap<u64, NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyTree<'a> {
    nodes: Vec<TreeNode<'a>>,
}

impl<'a> HierarchyTree<'a> {
    pub const ROOT: NodeId = 0;

    fn new() -> Self {
        HierarchyTree {
            nodes: vec![TreeNode {
                key: 0,
                depth: None,
                reference: String::new(),
                passages: Vec::new(),
                children: BTreeMap::new(),
            }],
        }
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<'a> {
        &self.nodes[id]
    }

    /// Children of `id` in ascending numeric order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id].children.values().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }

    fn child_or_insert(&mut self, parent: NodeId, key: u64, depth: usize) -> NodeId {
        if let Some(&id) = self.nodes[parent].children.get(&key) {
            return id;
        }
        let reference = match self.nodes[parent].depth {
            None => key.to_string(),
            Some(_) => format!("{}.{key}", self.nodes[parent].reference),
        };
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            key,
            depth: Some(depth),
            reference,
            passages: Vec::new(),
            children: BTreeMap::new(),
        });
        self.nodes[parent].children.insert(key, id);
        id
    }
}

/// Parse a dotted ref into its integer components.
///
/// Components must be written canonically: no sign and no leading zeros.
pub fn parse_ref(reference: &str) -> Result<Vec<u64>> {
    reference
        .split('.')
        .map(|part| match part.parse::<u64>() {
            Ok(n) if n > 0 && part == n.to_string() => Ok(n),
            _ => Err(ConvertError::InvalidRef(reference.to_string())),
        })
        .collect()
}

/// Build the hierarchy tree for `passages` under `levels`.
pub fn build_hierarchy_tree<'a>(
    levels: &[StructureLevel],
    passages: &'a [Passage],
) -> Result<HierarchyTree<'a>> {
    let expected = schema_depth(levels);
    let mut tree = HierarchyTree::new();

    for passage in passages {
        let components = parse_ref(&passage.reference)?;
        if components.len() != expected {
            return Err(ConvertError::RefDepth {
                reference: passage.reference.clone(),
                expected,
                found: components.len(),
            });
        }

        let mut current = HierarchyTree::ROOT;
        for (depth, key) in components.into_iter().enumerate() {
            current = tree.child_or_insert(current, key, depth);
        }
        tree.nodes[current].passages.push(passage);
    }

    Ok(tree)
}
