use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::entities::MemberId;
use crate::domain::error::{DomainError, DomainResult};

/// Per-node expand/collapse flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Expanded,
    Collapsed,
}

impl ExpansionState {
    pub fn flipped(self) -> Self {
        match self {
            ExpansionState::Expanded => ExpansionState::Collapsed,
            ExpansionState::Collapsed => ExpansionState::Expanded,
        }
    }
}

/// What the renderer draws on a node's expansion control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleGlyph {
    /// Collapsed node, shows "+"
    Expand,
    /// Expanded node, shows "−"
    Collapse,
    /// Leaf, no control at all
    None,
}

/// Tree node in the arena-based member hierarchy.
#[derive(Debug)]
pub struct TreeNode {
    /// Backing member, None for the synthetic root
    pub member: Option<MemberId>,
    /// Index of parent node in the arena, None for the synthetic root
    pub parent: Option<Index>,
    /// Indices of child nodes in sibling order
    pub children: Vec<Index>,
    pub expansion: ExpansionState,
}

impl TreeNode {
    pub fn is_synthetic_root(&self) -> bool {
        self.member.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion == ExpansionState::Expanded
    }
}

/// Arena-based member tree with a synthetic root unifying all lords.
///
/// Nodes are addressed by generational [`Index`] internally and by
/// [`MemberId`] from the outside. Structure is fixed after build; only
/// expansion flags change during a session.
#[derive(Debug)]
pub struct MemberTree {
    arena: Arena<TreeNode>,
    root: Index,
    by_id: HashMap<MemberId, Index>,
}

impl Default for MemberTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            member: None,
            parent: None,
            children: Vec::new(),
            expansion: ExpansionState::Expanded,
        });
        Self {
            arena,
            root,
            by_id: HashMap::new(),
        }
    }

    /// Insert a member under `parent`, or under the synthetic root when None.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, member: MemberId, parent: Option<Index>) -> Index {
        let parent_idx = parent.unwrap_or(self.root);
        let node_idx = self.arena.insert(TreeNode {
            member: Some(member.clone()),
            parent: Some(parent_idx),
            children: Vec::new(),
            expansion: ExpansionState::Expanded,
        });
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.push(node_idx);
        }
        self.by_id.insert(member, node_idx);
        node_idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &MemberId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &MemberId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of member nodes (the synthetic root is not counted).
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Member id of the parent, None for lords (parent is the synthetic root).
    pub fn parent_id(&self, id: &MemberId) -> Option<&MemberId> {
        let node = self.node(id)?;
        let parent = self.get_node(node.parent?)?;
        parent.member.as_ref()
    }

    pub fn children_ids(&self, id: &MemberId) -> Vec<&MemberId> {
        self.node(id)
            .map(|node| self.member_ids(&node.children))
            .unwrap_or_default()
    }

    /// Top-level members (children of the synthetic root) in input order.
    pub fn lords(&self) -> Vec<&MemberId> {
        self.get_node(self.root)
            .map(|root| self.member_ids(&root.children))
            .unwrap_or_default()
    }

    fn member_ids(&self, indices: &[Index]) -> Vec<&MemberId> {
        indices
            .iter()
            .filter_map(|&idx| self.get_node(idx))
            .filter_map(|node| node.member.as_ref())
            .collect()
    }

    /// Member ancestors, nearest first; the synthetic root is not yielded.
    pub fn ancestors<'a>(&'a self, id: &MemberId) -> impl Iterator<Item = &'a MemberId> + 'a {
        let mut current = self.node(id).and_then(|node| node.parent);
        std::iter::from_fn(move || {
            let node = self.get_node(current?)?;
            current = node.parent;
            node.member.as_ref()
        })
    }

    /// Depth below the synthetic root; lords are at depth 0.
    pub fn depth(&self, id: &MemberId) -> Option<usize> {
        self.node(id)?;
        Some(self.ancestors(id).count())
    }

    /// Pre-order traversal of every node, synthetic root first.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, false)
    }

    /// Pre-order traversal of visible member nodes.
    ///
    /// A node is visible iff every ancestor is expanded. Collapsed nodes are
    /// yielded themselves but their subtree is skipped. The synthetic root is
    /// never yielded.
    pub fn visible_nodes(&self) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        TreeIterator::new(self, true).filter(|(_, node)| !node.is_synthetic_root())
    }

    pub fn visible_ids(&self) -> Vec<MemberId> {
        self.visible_nodes()
            .filter_map(|(_, node)| node.member.clone())
            .collect()
    }

    pub fn is_visible(&self, id: &MemberId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let mut current = node.parent;
        while let Some(idx) = current {
            match self.get_node(idx) {
                Some(ancestor) if ancestor.is_expanded() => current = ancestor.parent,
                _ => return false,
            }
        }
        true
    }

    /// Closest visible ancestor of a hidden member; None for visible members.
    pub fn nearest_visible_ancestor(&self, id: &MemberId) -> Option<&MemberId> {
        if self.is_visible(id) {
            return None;
        }
        self.ancestors(id).find(|ancestor| self.is_visible(ancestor))
    }

    pub fn has_toggle(&self, id: &MemberId) -> bool {
        self.node(id).is_some_and(|node| !node.is_leaf())
    }

    pub fn toggle_glyph(&self, id: &MemberId) -> ToggleGlyph {
        match self.node(id) {
            Some(node) if node.is_leaf() => ToggleGlyph::None,
            Some(node) if node.is_expanded() => ToggleGlyph::Collapse,
            Some(_) => ToggleGlyph::Expand,
            None => ToggleGlyph::None,
        }
    }

    /// Flip a node between expanded and collapsed.
    ///
    /// Returns `Ok(false)` for leaves, which have no toggle. Descendant flags
    /// are left untouched so re-expanding restores the previous shape.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: &MemberId) -> DomainResult<bool> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| DomainError::UnknownMember(id.clone()))?;
        let Some(node) = self.arena.get_mut(idx) else {
            return Err(DomainError::UnknownMember(id.clone()));
        };
        if node.is_leaf() {
            trace!("toggle on leaf is a no-op");
            return Ok(false);
        }
        node.expansion = node.expansion.flipped();
        debug!(state = ?node.expansion, "toggled");
        Ok(true)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn expand_all(&mut self) {
        for (_, node) in self.arena.iter_mut() {
            node.expansion = ExpansionState::Expanded;
        }
    }

    /// Collapse every member with children; the synthetic root stays expanded.
    #[instrument(level = "debug", skip(self))]
    pub fn collapse_all(&mut self) {
        for (_, node) in self.arena.iter_mut() {
            if !node.is_synthetic_root() && !node.is_leaf() {
                node.expansion = ExpansionState::Collapsed;
            }
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a MemberTree,
    stack: Vec<Index>,
    prune_collapsed: bool,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a MemberTree, prune_collapsed: bool) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
            prune_collapsed,
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !self.prune_collapsed || node.is_expanded() {
                    // Push children in reverse order for left-to-right traversal
                    for &child in node.children.iter().rev() {
                        self.stack.push(child);
                    }
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> MemberTree {
        let mut tree = MemberTree::new();
        let a = tree.insert_node(MemberId::from("a"), None);
        let b = tree.insert_node(MemberId::from("b"), Some(a));
        tree.insert_node(MemberId::from("c"), Some(b));
        tree
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let tree = chain();
        let ancestors: Vec<_> = tree.ancestors(&MemberId::from("c")).cloned().collect();
        assert_eq!(ancestors, vec![MemberId::from("b"), MemberId::from("a")]);
        assert_eq!(tree.depth(&MemberId::from("c")), Some(2));
        assert_eq!(tree.depth(&MemberId::from("a")), Some(0));
    }

    #[test]
    fn iter_includes_synthetic_root_first() {
        let tree = chain();
        let (_, first) = tree.iter().next().unwrap();
        assert!(first.is_synthetic_root());
        assert_eq!(tree.iter().count(), 4);
    }

    #[test]
    fn toggle_unknown_member_errors() {
        let mut tree = chain();
        let result = tree.toggle(&MemberId::from("ghost"));
        assert_eq!(result, Err(DomainError::UnknownMember(MemberId::from("ghost"))));
    }

    #[test]
    fn nearest_visible_ancestor_skips_hidden_levels() {
        let mut tree = chain();
        tree.toggle(&MemberId::from("b")).unwrap();
        tree.toggle(&MemberId::from("a")).unwrap();
        assert_eq!(
            tree.nearest_visible_ancestor(&MemberId::from("c")),
            Some(&MemberId::from("a"))
        );
        assert_eq!(tree.nearest_visible_ancestor(&MemberId::from("a")), None);
    }

    #[test]
    fn glyph_follows_state() {
        let mut tree = chain();
        assert_eq!(tree.toggle_glyph(&MemberId::from("a")), ToggleGlyph::Collapse);
        tree.toggle(&MemberId::from("a")).unwrap();
        assert_eq!(tree.toggle_glyph(&MemberId::from("a")), ToggleGlyph::Expand);
        assert_eq!(tree.toggle_glyph(&MemberId::from("c")), ToggleGlyph::None);
    }
}
