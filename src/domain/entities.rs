//! Domain entities: member records and node classification

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable member identity, used as the key everywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One club member as loaded from the data source.
///
/// Read-only for the whole session. Derived values (resolved sponsor name,
/// node kind) live elsewhere, keyed by [`MemberId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub hometown: Option<String>,
    /// Sponsor id; an empty string in the data file means "no sponsor"
    #[serde(default, rename = "sponsor", deserialize_with = "empty_as_none")]
    pub sponsor_id: Option<MemberId>,
    #[serde(default)]
    pub lord: bool,
    #[serde(default)]
    pub years_attended: BTreeSet<i32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub funny_story: Option<String>,
    #[serde(default, rename = "photo")]
    pub photo_url: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<MemberId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(MemberId::new))
}

impl MemberRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
            nickname: None,
            hometown: None,
            sponsor_id: None,
            lord: false,
            years_attended: BTreeSet::new(),
            wins: 0,
            funny_story: None,
            photo_url: None,
        }
    }

    pub fn sponsored_by(mut self, sponsor: impl Into<String>) -> Self {
        self.sponsor_id = Some(MemberId::new(sponsor));
        self
    }

    pub fn as_lord(mut self) -> Self {
        self.lord = true;
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_hometown(mut self, hometown: impl Into<String>) -> Self {
        self.hometown = Some(hometown.into());
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years_attended = years.into_iter().collect();
        self
    }

    /// Number of distinct years attended.
    pub fn tenure(&self) -> usize {
        self.years_attended.len()
    }

    pub fn attended(&self, year: i32) -> bool {
        self.years_attended.contains(&year)
    }
}

/// Visual tier of a member node; drives footprint and badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Lord,
    Veteran,
    Regular,
}

impl NodeKind {
    /// Lords win regardless of tenure; otherwise tenure decides.
    pub fn classify(record: &MemberRecord, veteran_years: usize) -> Self {
        if record.lord {
            NodeKind::Lord
        } else if record.tenure() >= veteran_years {
            NodeKind::Veteran
        } else {
            NodeKind::Regular
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Lord => "lord",
            NodeKind::Veteran => "veteran",
            NodeKind::Regular => "regular",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sponsor_deserializes_as_none() {
        let json = r#"{"id": "a", "name": "Ali", "sponsor": ""}"#;
        let record: MemberRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sponsor_id, None);
    }

    #[test]
    fn duplicate_years_collapse() {
        let json = r#"{"id": "a", "name": "Ali", "years_attended": [2020, 2021, 2020]}"#;
        let record: MemberRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tenure(), 2);
    }

    #[test]
    fn lord_kind_ignores_tenure() {
        let lord = MemberRecord::new("l", "Lord").as_lord();
        assert_eq!(NodeKind::classify(&lord, 5), NodeKind::Lord);
    }
}
