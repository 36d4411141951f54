//! Domain layer: the tree state & reconciliation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod reconcile;
pub mod search;
pub mod store;
pub mod viewport;

pub use arena::{ExpansionState, MemberTree, ToggleGlyph, TreeNode};
pub use builder::HierarchyBuilder;
pub use entities::{MemberId, MemberRecord, NodeKind};
pub use error::{DomainError, DomainResult};
pub use geometry::{Bounds, EdgePath, Placement, Point, Size};
pub use layout::{Layout, LayoutConfig, LayoutEdge, LayoutEngine, LayoutNode, LordLink};
pub use reconcile::{
    diff_ids, reconcile, EdgeTransition, IdDiff, NodeTransition, PositionCache, Reconciliation,
    Role,
};
pub use search::{classify, classify_by_year, Highlight};
pub use store::{Annotation, MemberDetail, RecordStore};
pub use viewport::{fit_to_view, Transform, ViewportConfig, ViewportController, ViewportSize};
