//! Search/filter overlay: display classification only, never touches the tree.

use std::collections::BTreeMap;

use crate::domain::entities::{MemberId, MemberRecord};
use crate::domain::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Match,
    Dimmed,
    Neutral,
}

impl Highlight {
    /// Merge two independent classifications: dimmed wins, then match.
    pub fn combine(self, other: Highlight) -> Highlight {
        match (self, other) {
            (Highlight::Dimmed, _) | (_, Highlight::Dimmed) => Highlight::Dimmed,
            (Highlight::Match, _) | (_, Highlight::Match) => Highlight::Match,
            _ => Highlight::Neutral,
        }
    }

    fn from_match(hit: bool) -> Highlight {
        if hit {
            Highlight::Match
        } else {
            Highlight::Dimmed
        }
    }
}

fn matches_query(record: &MemberRecord, needle: &str) -> bool {
    let hit = |field: &str| field.to_lowercase().contains(needle);
    hit(&record.name)
        || record.nickname.as_deref().is_some_and(hit)
        || record.hometown.as_deref().is_some_and(hit)
}

/// Case-insensitive substring match on name, nickname and hometown.
///
/// A blank query leaves every node neutral.
pub fn classify<'a>(
    query: &str,
    visible: impl IntoIterator<Item = &'a MemberId>,
    store: &RecordStore,
) -> BTreeMap<MemberId, Highlight> {
    let needle = query.trim().to_lowercase();
    visible
        .into_iter()
        .map(|id| {
            let highlight = if needle.is_empty() {
                Highlight::Neutral
            } else {
                Highlight::from_match(store.get(id).is_some_and(|r| matches_query(r, &needle)))
            };
            (id.clone(), highlight)
        })
        .collect()
}

/// Match members who attended `year`, dim everyone else.
pub fn classify_by_year<'a>(
    year: i32,
    visible: impl IntoIterator<Item = &'a MemberId>,
    store: &RecordStore,
) -> BTreeMap<MemberId, Highlight> {
    visible
        .into_iter()
        .map(|id| {
            let hit = store.get(id).is_some_and(|r| r.attended(year));
            (id.clone(), Highlight::from_match(hit))
        })
        .collect()
}
