//! Layout engine: positions visible nodes top-down with variable footprints.
//!
//! Depth runs along y, siblings along x. Every node owns a horizontal span
//! wide enough for its own footprint plus the gutter and for all of its
//! visible children; spans of neighbours never intersect, so nodes of
//! different sizes at the same depth cannot overlap. Parents sit midway
//! between their first and last visible child, clamped inside their span.

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::MemberTree;
use crate::domain::entities::{MemberId, NodeKind};
use crate::domain::geometry::{Bounds, EdgePath, Placement, Point, Size};
use crate::domain::store::RecordStore;

/// Sizing and spacing rules for the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub regular: Size,
    pub veteran: Size,
    pub lord: Size,
    /// Attended years needed for the veteran footprint
    pub veteran_years: usize,
    /// Minimum free space between neighbouring footprints
    pub sibling_gutter: f64,
    /// Free space between the deepest point of one level and the next
    pub level_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            regular: Size::new(160.0, 72.0),
            veteran: Size::new(180.0, 80.0),
            lord: Size::new(200.0, 96.0),
            veteran_years: 5,
            sibling_gutter: 20.0,
            level_gap: 60.0,
        }
    }
}

impl LayoutConfig {
    pub fn footprint(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Lord => self.lord,
            NodeKind::Veteran => self.veteran,
            NodeKind::Regular => self.regular,
        }
    }

    /// Distance between consecutive depth levels.
    pub fn level_spacing(&self) -> f64 {
        let tallest = self
            .lord
            .height
            .max(self.veteran.height)
            .max(self.regular.height);
        tallest + self.level_gap
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: MemberId,
    /// Parent member, None for lords
    pub parent: Option<MemberId>,
    pub kind: NodeKind,
    pub depth: usize,
    pub placement: Placement,
}

/// Connector between a visible parent and child, keyed by the child id.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: MemberId,
    pub source: MemberId,
    pub path: EdgePath,
}

/// Connector from the undisplayed club root to one lord.
///
/// Kept apart from [`LayoutEdge`] so a renderer can style or skip them.
#[derive(Debug, Clone, PartialEq)]
pub struct LordLink {
    pub lord: MemberId,
    pub path: EdgePath,
}

/// Result of one layout pass; nodes in visible pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    nodes: Vec<LayoutNode>,
    index: HashMap<MemberId, usize>,
    edges: Vec<LayoutEdge>,
    lord_links: Vec<LordLink>,
}

impl Layout {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Lord links in lord order; not part of [`Layout::bounds`].
    pub fn lord_links(&self) -> &[LordLink] {
        &self.lord_links
    }

    pub fn get(&self, id: &MemberId) -> Option<&LayoutNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn placement(&self, id: &MemberId) -> Option<Placement> {
        self.get(id).map(|node| node.placement)
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &MemberId> {
        self.nodes.iter().map(|node| &node.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of every node's own footprint, None when nothing is visible.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| node.placement.bounds())
            .reduce(Bounds::union)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn kind_of(&self, store: &RecordStore, id: &MemberId) -> NodeKind {
        store
            .get(id)
            .map(|record| NodeKind::classify(record, self.config.veteran_years))
            .unwrap_or(NodeKind::Regular)
    }

    /// Lay out every currently visible node of `tree`.
    #[instrument(level = "debug", skip_all)]
    pub fn layout(&self, tree: &MemberTree, store: &RecordStore) -> Layout {
        let pass = Pass {
            engine: self,
            tree,
            store,
        };

        let mut spans = HashMap::new();
        let total = pass.span(tree.root(), &mut spans);

        let mut layout = Layout::default();
        if let Some(root) = tree.get_node(tree.root()) {
            let mut cursor = -total / 2.0;
            for &lord in &root.children {
                pass.place(lord, None, 0, cursor, &spans, &mut layout);
                cursor += spans.get(&lord).copied().unwrap_or(0.0);
            }
        }

        // Re-sort into visible pre-order so consumers get a stable sequence
        let order: HashMap<MemberId, usize> = tree
            .visible_ids()
            .into_iter()
            .enumerate()
            .map(|(pos, id)| (id, pos))
            .collect();
        layout
            .nodes
            .sort_by_key(|node| order.get(&node.id).copied().unwrap_or(usize::MAX));
        layout.index = layout
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id.clone(), pos))
            .collect();

        layout.edges = layout
            .nodes
            .iter()
            .filter_map(|child| {
                let parent_id = child.parent.as_ref()?;
                let parent = layout.get(parent_id)?;
                Some(LayoutEdge {
                    id: child.id.clone(),
                    source: parent_id.clone(),
                    path: EdgePath::between(&parent.placement, &child.placement),
                })
            })
            .collect();

        // Club root sits one level above the lords, centered on the forest
        let club_root = Placement::new(
            Point::new(0.0, -self.config.level_spacing()),
            Size::new(0.0, 0.0),
        );
        layout.lord_links = layout
            .nodes
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|lord| LordLink {
                lord: lord.id.clone(),
                path: EdgePath::between(&club_root, &lord.placement),
            })
            .collect();

        debug!(
            nodes = layout.len(),
            edges = layout.edges.len(),
            lord_links = layout.lord_links.len(),
            "layout pass"
        );
        layout
    }
}

/// Borrowed state for one layout pass.
struct Pass<'a> {
    engine: &'a LayoutEngine,
    tree: &'a MemberTree,
    store: &'a RecordStore,
}

impl Pass<'_> {
    fn visible_children(&self, idx: Index) -> &[Index] {
        match self.tree.get_node(idx) {
            Some(node) if node.is_expanded() => &node.children,
            _ => &[],
        }
    }

    fn own_width(&self, idx: Index) -> f64 {
        let Some(id) = self.tree.get_node(idx).and_then(|n| n.member.as_ref()) else {
            return 0.0;
        };
        let kind = self.engine.kind_of(self.store, id);
        self.engine.config.footprint(kind).width + self.engine.config.sibling_gutter
    }

    fn span(&self, idx: Index, spans: &mut HashMap<Index, f64>) -> f64 {
        let children: f64 = self
            .visible_children(idx)
            .iter()
            .map(|&child| self.span(child, spans))
            .sum();
        let span = self.own_width(idx).max(children);
        spans.insert(idx, span);
        span
    }

    fn place(
        &self,
        idx: Index,
        parent: Option<&MemberId>,
        depth: usize,
        left: f64,
        spans: &HashMap<Index, f64>,
        layout: &mut Layout,
    ) -> Option<f64> {
        let id = self.tree.get_node(idx)?.member.as_ref()?;
        let span = spans.get(&idx).copied().unwrap_or(0.0);
        let children = self.visible_children(idx);
        let children_total: f64 = children
            .iter()
            .map(|child| spans.get(child).copied().unwrap_or(0.0))
            .sum();

        let mut cursor = left + (span - children_total) / 2.0;
        let mut first_center = None;
        let mut last_center = None;
        for &child in children {
            let child_span = spans.get(&child).copied().unwrap_or(0.0);
            if let Some(center) = self.place(child, Some(id), depth + 1, cursor, spans, layout) {
                first_center.get_or_insert(center);
                last_center = Some(center);
            }
            cursor += child_span;
        }

        let own = self.own_width(idx);
        let x = match (first_center, last_center) {
            (Some(first), Some(last)) => {
                let lo = left + own / 2.0;
                let hi = left + span - own / 2.0;
                ((first + last) / 2.0).clamp(lo, hi.max(lo))
            }
            _ => left + span / 2.0,
        };

        let kind = self.engine.kind_of(self.store, id);
        let y = depth as f64 * self.engine.config.level_spacing();
        layout.nodes.push(LayoutNode {
            id: id.clone(),
            parent: parent.cloned(),
            kind,
            depth,
            placement: Placement::new(Point::new(x, y), self.engine.config.footprint(kind)),
        });
        Some(x)
    }
}
