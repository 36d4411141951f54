//! Reconciler: diffs the previous frame against a new layout by member id.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::MemberTree;
use crate::domain::entities::{MemberId, NodeKind};
use crate::domain::geometry::{EdgePath, Placement, Point};
use crate::domain::layout::Layout;

/// How a node or edge takes part in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Entering,
    Updating,
    Exiting,
}

/// Set-level classification of two visible id sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdDiff {
    /// In `next` order
    pub entering: Vec<MemberId>,
    /// In `next` order
    pub updating: Vec<MemberId>,
    /// In `previous` order
    pub exiting: Vec<MemberId>,
}

pub fn diff_ids(previous: &[MemberId], next: &[MemberId]) -> IdDiff {
    let before: HashSet<&MemberId> = previous.iter().collect();
    let after: HashSet<&MemberId> = next.iter().collect();

    let (updating, entering): (Vec<MemberId>, Vec<MemberId>) =
        next.iter().cloned().partition(|id| before.contains(id));
    let exiting = previous
        .iter()
        .filter(|id| !after.contains(id))
        .cloned()
        .collect();

    IdDiff {
        entering,
        updating,
        exiting,
    }
}

/// Last rendered placement per member, carried from one pass to the next.
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    order: Vec<MemberId>,
    placements: HashMap<MemberId, Placement>,
    kinds: HashMap<MemberId, NodeKind>,
}

impl PositionCache {
    pub fn get(&self, id: &MemberId) -> Option<Placement> {
        self.placements.get(id).copied()
    }

    pub fn kind(&self, id: &MemberId) -> Option<NodeKind> {
        self.kinds.get(id).copied()
    }

    /// Ids of the last frame, in its visible order.
    pub fn ids(&self) -> &[MemberId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Replace the cache with the placements of `layout`; exited ids drop out.
    pub fn stash(&mut self, layout: &Layout) {
        self.order = layout.ids().cloned().collect();
        self.placements = layout
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), node.placement))
            .collect();
        self.kinds = layout
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), node.kind))
            .collect();
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.placements.clear();
        self.kinds.clear();
    }
}

/// Start and end frame of one node for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransition {
    pub id: MemberId,
    pub kind: NodeKind,
    pub role: Role,
    pub start: Placement,
    pub end: Placement,
}

/// Start and end shape of one connector, keyed by its child id.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTransition {
    pub id: MemberId,
    pub source: MemberId,
    pub role: Role,
    pub start: EdgePath,
    pub end: EdgePath,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub nodes: Vec<NodeTransition>,
    pub edges: Vec<EdgeTransition>,
}

impl Reconciliation {
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &NodeTransition> {
        self.nodes.iter().filter(move |t| t.role == role)
    }

    pub fn ids_with_role(&self, role: Role) -> Vec<&MemberId> {
        self.with_role(role).map(|t| &t.id).collect()
    }

    pub fn node(&self, id: &MemberId) -> Option<&NodeTransition> {
        self.nodes.iter().find(|t| &t.id == id)
    }

    pub fn edge(&self, id: &MemberId) -> Option<&EdgeTransition> {
        self.edges.iter().find(|t| &t.id == id)
    }
}

/// Classify every node and edge of `next` against the previous frame.
///
/// Entering nodes start at the nearest ancestor that had a previous
/// placement (their parent, or the expanded ancestor that revealed them);
/// exiting nodes travel to the nearest ancestor still present in `next`.
/// Without such an ancestor both fall back to [`Point::ORIGIN`]. Pure: the
/// caller stashes `next` into the cache afterwards.
#[instrument(level = "debug", skip_all, fields(previous = previous.len(), next = next.len()))]
pub fn reconcile(tree: &MemberTree, previous: &PositionCache, next: &Layout) -> Reconciliation {
    let next_ids: Vec<MemberId> = next.ids().cloned().collect();
    let diff = diff_ids(previous.ids(), &next_ids);

    let entering_anchor = |id: &MemberId| -> Point {
        tree.ancestors(id)
            .find_map(|ancestor| previous.get(ancestor))
            .map(|p| p.position)
            .unwrap_or(Point::ORIGIN)
    };
    let exiting_anchor = |id: &MemberId| -> Point {
        tree.nearest_visible_ancestor(id)
            .and_then(|ancestor| next.placement(ancestor))
            .map(|p| p.position)
            .unwrap_or(Point::ORIGIN)
    };

    let mut nodes = Vec::with_capacity(next.len() + diff.exiting.len());
    let mut edges = Vec::with_capacity(next.edges().len() + diff.exiting.len());
    let entering: HashSet<&MemberId> = diff.entering.iter().collect();

    for node in next.nodes() {
        let (role, start) = if entering.contains(&node.id) {
            let anchor = entering_anchor(&node.id);
            (Role::Entering, node.placement.moved_to(anchor))
        } else {
            let start = previous.get(&node.id).unwrap_or(node.placement);
            (Role::Updating, start)
        };
        nodes.push(NodeTransition {
            id: node.id.clone(),
            kind: node.kind,
            role,
            start,
            end: node.placement,
        });
    }

    for edge in next.edges() {
        let (role, start) = if entering.contains(&edge.id) {
            (
                Role::Entering,
                EdgePath::degenerate(entering_anchor(&edge.id)),
            )
        } else {
            let start = match (previous.get(&edge.source), previous.get(&edge.id)) {
                (Some(parent), Some(child)) => EdgePath::between(&parent, &child),
                _ => edge.path,
            };
            (Role::Updating, start)
        };
        edges.push(EdgeTransition {
            id: edge.id.clone(),
            source: edge.source.clone(),
            role,
            start,
            end: edge.path,
        });
    }

    for id in &diff.exiting {
        let Some(start) = previous.get(id) else {
            continue;
        };
        let anchor = exiting_anchor(id);
        nodes.push(NodeTransition {
            id: id.clone(),
            kind: previous.kind(id).unwrap_or(NodeKind::Regular),
            role: Role::Exiting,
            start,
            end: start.moved_to(anchor),
        });

        if let Some(source) = tree.parent_id(id) {
            if let Some(parent) = previous.get(source) {
                edges.push(EdgeTransition {
                    id: id.clone(),
                    source: source.clone(),
                    role: Role::Exiting,
                    start: EdgePath::between(&parent, &start),
                    end: EdgePath::degenerate(anchor),
                });
            }
        }
    }

    debug!(
        entering = diff.entering.len(),
        updating = diff.updating.len(),
        exiting = diff.exiting.len(),
        "reconciled"
    );
    Reconciliation { nodes, edges }
}
