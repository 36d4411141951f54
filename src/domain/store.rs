//! Record store: id lookup plus derived, read-only annotations.

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::entities::{MemberId, MemberRecord};
use crate::domain::error::{DomainError, DomainResult};

/// Values derived from a record once after load, kept apart from the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    /// Sponsor's display name; falls back to the raw sponsor id
    pub sponsor_name: Option<String>,
}

/// What node activation hands to the detail collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDetail<'a> {
    pub record: &'a MemberRecord,
    pub sponsor_name: Option<&'a str>,
}

impl MemberDetail<'_> {
    /// Attended years, ascending.
    pub fn years_sorted(&self) -> Vec<i32> {
        self.record.years_attended.iter().copied().collect()
    }

    pub fn tenure(&self) -> usize {
        self.record.tenure()
    }
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<MemberRecord>,
    index: HashMap<MemberId, usize>,
    annotations: HashMap<MemberId, Annotation>,
}

impl RecordStore {
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn new(records: Vec<MemberRecord>) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), pos).is_some() {
                return Err(DomainError::DuplicateMember(record.id.clone()));
            }
        }

        let annotations = records
            .iter()
            .map(|record| {
                let sponsor_name = record.sponsor_id.as_ref().map(|sponsor| {
                    index
                        .get(sponsor)
                        .map(|&pos| records[pos].name.clone())
                        .unwrap_or_else(|| sponsor.to_string())
                });
                (record.id.clone(), Annotation { sponsor_name })
            })
            .collect();

        Ok(Self {
            records,
            index,
            annotations,
        })
    }

    /// Records in input order.
    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    pub fn get(&self, id: &MemberId) -> Option<&MemberRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn annotation(&self, id: &MemberId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    pub fn detail(&self, id: &MemberId) -> Option<MemberDetail<'_>> {
        let record = self.get(id)?;
        let sponsor_name = self
            .annotation(id)
            .and_then(|a| a.sponsor_name.as_deref());
        Some(MemberDetail {
            record,
            sponsor_name,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
