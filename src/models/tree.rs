//! Ordered tree with slot-addressed children.
//!
//! Deleting a node tombstones its whole subtree: the ids stay allocated but every operation
//! on them fails with [`AlgonimError::InvalidHandle`].

use crate::foundation::core::{Point, Size};
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::border::Border;
use crate::gfx::drawer::Drawer;
use crate::gfx::styles::{FontStyle, FontStyleOverrides, LineStyleOverrides, TextAlign};
use crate::models::graph::{EdgeEnd, draw_labeled_node, draw_trimmed_edge};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeNodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Parent {
    Root,
    Node(TreeNodeId),
}

#[derive(Clone, Debug)]
struct TreeNode {
    value: String,
    /// `None` once tombstoned.
    parent: Option<Parent>,
    children: Vec<Option<TreeNodeId>>,
}

#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: Option<TreeNodeId>,
    pub border: Border,
    pub font: FontStyleOverrides,
    pub edge_line: LineStyleOverrides,
    /// Vertical distance between depth levels.
    pub level_height: f64,
}

impl Default for Tree {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            border: Border::default(),
            font: FontStyleOverrides::default(),
            edge_line: LineStyleOverrides::default(),
            level_height: 64.0,
        }
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<TreeNodeId> {
        self.root
    }

    /// Replaces the root with a fresh node; the previous tree is tombstoned.
    pub fn set_root(&mut self, value: impl Into<String>) -> TreeNodeId {
        if let Some(old) = self.root.take() {
            self.invalidate(old);
        }
        let id = self.alloc(value.into(), Parent::Root);
        self.root = Some(id);
        id
    }

    pub fn is_valid(&self, id: TreeNodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.parent.is_some())
    }

    pub fn value(&self, id: TreeNodeId) -> AlgonimResult<&str> {
        Ok(&self.valid(id)?.value)
    }

    pub fn set_value(&mut self, id: TreeNodeId, value: impl Into<String>) -> AlgonimResult<()> {
        self.valid_mut(id)?.value = value.into();
        Ok(())
    }

    /// `None` for the root.
    pub fn parent(&self, id: TreeNodeId) -> AlgonimResult<Option<TreeNodeId>> {
        match self.valid(id)?.parent {
            Some(Parent::Node(p)) => Ok(Some(p)),
            _ => Ok(None),
        }
    }

    pub fn children(&self, id: TreeNodeId) -> AlgonimResult<&[Option<TreeNodeId>]> {
        Ok(&self.valid(id)?.children)
    }

    pub fn child(&self, id: TreeNodeId, index: usize) -> AlgonimResult<Option<TreeNodeId>> {
        Ok(self.valid(id)?.children.get(index).copied().flatten())
    }

    /// Appends a child in a new slot.
    pub fn add_child(&mut self, parent: TreeNodeId, value: impl Into<String>) -> AlgonimResult<TreeNodeId> {
        self.valid(parent)?;
        let id = self.alloc(value.into(), Parent::Node(parent));
        self.nodes[parent.0].children.push(Some(id));
        Ok(id)
    }

    /// Appends an empty slot and returns its index.
    pub fn add_empty_slot(&mut self, parent: TreeNodeId) -> AlgonimResult<usize> {
        let node = self.valid_mut(parent)?;
        node.children.push(None);
        Ok(node.children.len() - 1)
    }

    /// Puts a fresh child into slot `index`, growing the slot list with empty slots as
    /// needed. A node already in that slot is tombstoned.
    pub fn set_child(
        &mut self,
        parent: TreeNodeId,
        index: usize,
        value: impl Into<String>,
    ) -> AlgonimResult<TreeNodeId> {
        self.valid(parent)?;
        let id = self.alloc(value.into(), Parent::Node(parent));
        let children = &mut self.nodes[parent.0].children;
        if children.len() <= index {
            children.resize(index + 1, None);
        }
        if let Some(old) = children[index].replace(id) {
            self.invalidate(old);
        }
        Ok(id)
    }

    /// Removes slot `index`; a child in it is tombstoned with its subtree.
    pub fn remove_slot(&mut self, parent: TreeNodeId, index: usize) -> AlgonimResult<()> {
        let node = self.valid(parent)?;
        if index >= node.children.len() {
            return Err(AlgonimError::validation(format!(
                "slot {index} out of range ({} slots)",
                node.children.len()
            )));
        }
        if let Some(child) = self.nodes[parent.0].children.remove(index) {
            self.invalidate(child);
        }
        Ok(())
    }

    /// Detaches and tombstones `id` with its subtree. With `keep_slot` the parent's slot
    /// stays as an empty placeholder, otherwise it is removed. Deleting an already
    /// tombstoned node does nothing.
    pub fn delete(&mut self, id: TreeNodeId, keep_slot: bool) -> AlgonimResult<()> {
        let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) else {
            if id.0 < self.nodes.len() {
                return Ok(());
            }
            return Err(AlgonimError::invalid_handle(format!("tree node {} does not exist", id.0)));
        };

        match parent {
            Parent::Root => self.root = None,
            Parent::Node(p) => {
                let children = &mut self.nodes[p.0].children;
                let slot = children.iter().position(|c| *c == Some(id)).ok_or_else(|| {
                    AlgonimError::invalid_handle(format!(
                        "tree node {} is not among its parent's children",
                        id.0
                    ))
                })?;
                if keep_slot {
                    children[slot] = None;
                } else {
                    children.remove(slot);
                }
            }
        }
        self.invalidate(id);
        Ok(())
    }

    fn alloc(&mut self, value: String, parent: Parent) -> TreeNodeId {
        self.nodes.push(TreeNode {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        TreeNodeId(self.nodes.len() - 1)
    }

    fn invalidate(&mut self, id: TreeNodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = &mut self.nodes[n.0];
            node.parent = None;
            stack.extend(node.children.iter().flatten());
        }
    }

    fn valid(&self, id: TreeNodeId) -> AlgonimResult<&TreeNode> {
        self.nodes
            .get(id.0)
            .filter(|n| n.parent.is_some())
            .ok_or_else(|| AlgonimError::invalid_handle(format!("tree node {} has become invalid", id.0)))
    }

    fn valid_mut(&mut self, id: TreeNodeId) -> AlgonimResult<&mut TreeNode> {
        self.nodes
            .get_mut(id.0)
            .filter(|n| n.parent.is_some())
            .ok_or_else(|| AlgonimError::invalid_handle(format!("tree node {} has become invalid", id.0)))
    }

    /// Node centers in pane-local coordinates.
    ///
    /// Each node gets horizontal room proportional to its number of leaves (an empty slot
    /// counts as one leaf), depth levels are `level_height` apart.
    pub fn layout(&self, width: f64) -> Vec<(TreeNodeId, Point)> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        // Pre-order walk; children are pushed reversed so they pop in slot order.
        let mut order = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            order.push((id, depth));
            for child in self.nodes[id.0].children.iter().rev().flatten() {
                stack.push((*child, depth + 1));
            }
        }

        let mut leaves = vec![0usize; self.nodes.len()];
        for &(id, _) in order.iter().rev() {
            let children = &self.nodes[id.0].children;
            leaves[id.0] = if children.is_empty() {
                1
            } else {
                children
                    .iter()
                    .map(|c| c.map_or(1, |c| leaves[c.0]))
                    .sum()
            };
        }

        let unit = width / leaves[root.0] as f64;
        let mut start = vec![0usize; self.nodes.len()];
        let mut out = Vec::with_capacity(order.len());
        for &(id, depth) in &order {
            let x = (start[id.0] as f64 + leaves[id.0] as f64 / 2.0) * unit;
            let y = depth as f64 * self.level_height + self.level_height / 2.0;
            out.push((id, Point::new(x, y)));

            let mut next = start[id.0];
            for slot in &self.nodes[id.0].children {
                match slot {
                    Some(c) => {
                        start[c.0] = next;
                        next += leaves[c.0];
                    }
                    None => next += 1,
                }
            }
        }
        out
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>) {
        let align = TextAlign::default();
        let style = FontStyle::resolve(&self.font);
        let positions = self.layout(drawer.local_region().width());

        let mut at = vec![None; self.nodes.len()];
        for &(id, p) in &positions {
            let m = drawer.measure_text_with(&self.nodes[id.0].value, &align, &style);
            at[id.0] = Some((p, Size::new(m.width, m.height())));
        }

        for &(id, p) in &positions {
            let Some((_, content)) = at[id.0] else { continue };
            for child in self.nodes[id.0].children.iter().flatten() {
                let Some((cp, child_content)) = at[child.0] else {
                    continue;
                };
                draw_trimmed_edge(
                    drawer,
                    EdgeEnd {
                        center: p,
                        content,
                        border: &self.border,
                    },
                    EdgeEnd {
                        center: cp,
                        content: child_content,
                        border: &self.border,
                    },
                    false,
                    &self.edge_line,
                    None,
                );
            }
            draw_labeled_node(
                drawer,
                p,
                &self.nodes[id.0].value,
                content,
                &self.border,
                &align,
                &style,
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/tree.rs"]
mod tests;
