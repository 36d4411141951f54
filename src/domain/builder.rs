//! Hierarchy builder: turns the flat sponsor-linked member list into a tree.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::domain::arena::MemberTree;
use crate::domain::entities::{MemberId, MemberRecord};
use crate::domain::error::{DomainError, DomainResult};

/// Walk state for cycle detection over sponsor chains.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Constructs a [`MemberTree`] from member records.
///
/// Siblings keep input order, unsponsored members hang off the synthetic
/// root, and malformed input (unknown sponsor, duplicate id, sponsor cycle)
/// is rejected before any traversal.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    children_cache: HashMap<MemberId, Vec<MemberId>>,
    roots: Vec<MemberId>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&mut self, records: &[MemberRecord]) -> DomainResult<MemberTree> {
        // Reset state for a fresh build
        self.children_cache.clear();
        self.roots.clear();

        let sponsors = Self::index_sponsors(records)?;
        Self::detect_cycles(records, &sponsors)?;

        for record in records {
            match &record.sponsor_id {
                Some(sponsor) => self
                    .children_cache
                    .entry(sponsor.clone())
                    .or_default()
                    .push(record.id.clone()),
                None => self.roots.push(record.id.clone()),
            }
        }

        let tree = self.insert_breadth_first()?;
        debug!(members = tree.len(), lords = self.roots.len(), "hierarchy built");
        Ok(tree)
    }

    /// Map every id to its sponsor, rejecting duplicates and unknown sponsors.
    fn index_sponsors(
        records: &[MemberRecord],
    ) -> DomainResult<HashMap<&MemberId, Option<&MemberId>>> {
        let mut sponsors = HashMap::with_capacity(records.len());
        for record in records {
            if sponsors
                .insert(&record.id, record.sponsor_id.as_ref())
                .is_some()
            {
                return Err(DomainError::DuplicateMember(record.id.clone()));
            }
        }
        for record in records {
            if let Some(sponsor) = &record.sponsor_id {
                if !sponsors.contains_key(sponsor) {
                    return Err(DomainError::DanglingReference {
                        member: record.id.clone(),
                        sponsor: sponsor.clone(),
                    });
                }
            }
        }
        Ok(sponsors)
    }

    /// Follow each sponsor chain upwards; revisiting an in-progress id is a cycle.
    fn detect_cycles(
        records: &[MemberRecord],
        sponsors: &HashMap<&MemberId, Option<&MemberId>>,
    ) -> DomainResult<()> {
        let mut marks: HashMap<&MemberId, Mark> = HashMap::with_capacity(records.len());

        for record in records {
            let mut chain = Vec::new();
            let mut current = Some(&record.id);
            while let Some(id) = current {
                match marks.get(id) {
                    Some(Mark::Done) => break,
                    Some(Mark::InProgress) => return Err(DomainError::CycleDetected(id.clone())),
                    None => {}
                }
                marks.insert(id, Mark::InProgress);
                chain.push(id);
                current = sponsors.get(id).copied().flatten();
            }
            for id in chain {
                marks.insert(id, Mark::Done);
            }
        }
        Ok(())
    }

    fn insert_breadth_first(&self) -> DomainResult<MemberTree> {
        let mut tree = MemberTree::new();
        let mut visited: HashSet<&MemberId> = HashSet::new();
        let mut queue: VecDeque<(&MemberId, Option<_>)> =
            self.roots.iter().map(|id| (id, None)).collect();

        while let Some((current, parent_idx)) = queue.pop_front() {
            if !visited.insert(current) {
                return Err(DomainError::CycleDetected(current.clone()));
            }
            let current_idx = tree.insert_node(current.clone(), parent_idx);

            if let Some(children) = self.children_cache.get(current) {
                for child in children {
                    queue.push_back((child, Some(current_idx)));
                }
            }
        }

        Ok(tree)
    }
}
