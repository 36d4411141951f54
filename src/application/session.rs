//! Tree session: the explicit context every engine operation runs against.
//!
//! Owns the record store, the member tree with its expansion flags, the
//! previous-position cache and the viewport controller. Each state-changing
//! call runs layout + reconcile to completion and stashes the new positions
//! before returning, so shared state always reflects the last finished pass.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::application::error::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    classify, classify_by_year, reconcile, DomainError, HierarchyBuilder, Highlight, Layout,
    LayoutEngine, MemberDetail, MemberId, MemberRecord, MemberTree, NodeKind, PositionCache,
    Reconciliation, RecordStore, Role, Transform, ViewportController, ViewportSize,
};

/// Everything the renderer needs after one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub reconciliation: Reconciliation,
    /// Current search and year classification, merged
    pub highlights: BTreeMap<MemberId, Highlight>,
    /// Set when a fit is owed once transitions settle
    pub fit_pending: bool,
    pub transform: Transform,
    pub transition_ms: u64,
}

#[derive(Debug)]
pub struct TreeSession {
    store: RecordStore,
    tree: MemberTree,
    engine: LayoutEngine,
    positions: PositionCache,
    layout: Layout,
    viewport: ViewportController,
    query: String,
    year: Option<i32>,
    fit_pending: bool,
}

impl TreeSession {
    /// Build the session; fails on dangling sponsors, duplicate ids or cycles.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn new(
        records: Vec<MemberRecord>,
        settings: &Settings,
        size: ViewportSize,
    ) -> ApplicationResult<Self> {
        settings.validate()?;
        let tree = HierarchyBuilder::new().build(&records)?;
        let store = RecordStore::new(records)?;
        info!(members = store.len(), lords = tree.lords().len(), "session ready");

        Ok(Self {
            store,
            tree,
            engine: LayoutEngine::new(settings.layout.clone()),
            positions: PositionCache::default(),
            layout: Layout::default(),
            viewport: ViewportController::new(settings.viewport.clone(), size),
            query: String::new(),
            year: None,
            fit_pending: false,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn tree(&self) -> &MemberTree {
        &self.tree
    }

    /// Layout of the last completed pass.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn positions(&self) -> &PositionCache {
        &self.positions
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    pub fn kind_of(&self, id: &MemberId) -> NodeKind {
        self.engine.kind_of(&self.store, id)
    }

    pub fn is_fit_pending(&self) -> bool {
        self.fit_pending
    }

    /// Lay out the current state and reconcile it against the last frame.
    #[instrument(level = "debug", skip(self))]
    pub fn render(&mut self) -> Frame {
        let layout = self.engine.layout(&self.tree, &self.store);
        let reconciliation = reconcile(&self.tree, &self.positions, &layout);
        self.positions.stash(&layout);

        let visible_changed = reconciliation
            .nodes
            .iter()
            .any(|t| t.role != Role::Updating);
        self.layout = layout;
        if visible_changed {
            self.fit_pending = true;
        }
        if self.fit_pending && self.viewport.config().fit_immediately {
            self.run_fit();
        }

        Frame {
            reconciliation,
            highlights: self.highlights(),
            fit_pending: self.fit_pending,
            transform: self.viewport.transform(),
            transition_ms: self.viewport.config().transition_ms,
        }
    }

    /// Flip a node; leaves have no toggle and yield None.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: &MemberId) -> ApplicationResult<Option<Frame>> {
        if !self.tree.toggle(id)? {
            return Ok(None);
        }
        Ok(Some(self.render()))
    }

    pub fn expand_all(&mut self) -> Frame {
        self.tree.expand_all();
        self.render()
    }

    pub fn collapse_all(&mut self) -> Frame {
        self.tree.collapse_all();
        self.render()
    }

    /// Set the free-text query; returns the merged highlights.
    pub fn search(&mut self, query: &str) -> BTreeMap<MemberId, Highlight> {
        self.query = query.to_string();
        debug!(query = %self.query, "search");
        self.highlights()
    }

    /// Set or clear the year filter; returns the merged highlights.
    pub fn filter_year(&mut self, year: Option<i32>) -> BTreeMap<MemberId, Highlight> {
        self.year = year;
        debug!(?year, "year filter");
        self.highlights()
    }

    /// Search and year classifications over the current visible set, merged.
    pub fn highlights(&self) -> BTreeMap<MemberId, Highlight> {
        let visible = self.tree.visible_ids();
        let mut merged = classify(&self.query, &visible, &self.store);
        if let Some(year) = self.year {
            for (id, by_year) in classify_by_year(year, &visible, &self.store) {
                merged
                    .entry(id)
                    .and_modify(|h| *h = h.combine(by_year))
                    .or_insert(by_year);
            }
        }
        merged
    }

    /// Node activation: full record plus resolved sponsor name.
    pub fn activate(&self, id: &MemberId) -> ApplicationResult<MemberDetail<'_>> {
        self.store
            .detail(id)
            .ok_or_else(|| DomainError::UnknownMember(id.clone()).into())
    }

    /// Presentation reports that the last transition finished; runs the owed fit.
    pub fn transitions_settled(&mut self) -> Option<Transform> {
        if !self.fit_pending {
            return None;
        }
        Some(self.run_fit())
    }

    /// Explicit fit request (e.g. the "fit" control).
    pub fn fit(&mut self) -> Transform {
        self.run_fit()
    }

    pub fn resize(&mut self, size: ViewportSize) -> Transform {
        self.fit_pending = false;
        self.viewport.resize(size, &self.layout)
    }

    pub fn zoom_in(&mut self) -> Transform {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Transform {
        self.viewport.zoom_out()
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Transform {
        self.viewport.pan_by(dx, dy)
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.viewport.set_transform(transform)
    }

    fn run_fit(&mut self) -> Transform {
        self.fit_pending = false;
        self.viewport.fit(&self.layout)
    }
}
