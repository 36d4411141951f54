//! Member data sources
//!
//! The engine only needs a flat list of records; where it comes from (a file,
//! an embedded constant, a test fixture) is hidden behind [`MemberSource`].

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::domain::MemberRecord;
use crate::infrastructure::error::{InfraError, InfraResult};

/// Source of member records, loaded once per session.
pub trait MemberSource {
    fn load(&self) -> InfraResult<Vec<MemberRecord>>;

    /// Human-readable origin for logs and error messages.
    fn describe(&self) -> String;
}

/// `members.json`-style file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MemberSource for JsonFileSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> InfraResult<Vec<MemberRecord>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| InfraError::io(format!("read {}", self.path.display()), e))?;
        parse_members(&content, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Records already in memory (embedded data, fixtures).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<MemberRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<MemberRecord>) -> Self {
        Self { records }
    }
}

impl MemberSource for StaticSource {
    fn load(&self) -> InfraResult<Vec<MemberRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} embedded records", self.records.len())
    }
}

/// Parse a JSON array of member records; `origin` is only used in errors.
pub fn parse_members(content: &str, origin: &Path) -> InfraResult<Vec<MemberRecord>> {
    let records: Vec<MemberRecord> =
        serde_json::from_str(content).map_err(|source| InfraError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    debug!(count = records.len(), "parsed members");
    Ok(records)
}
