//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::MemberId;

/// Domain errors represent data-integrity violations in the member list.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("member {member} references unknown sponsor: {sponsor}")]
    DanglingReference { member: MemberId, sponsor: MemberId },

    #[error("cycle detected in sponsor chain: {0}")]
    CycleDetected(MemberId),

    #[error("duplicate member id: {0}")]
    DuplicateMember(MemberId),

    #[error("unknown member: {0}")]
    UnknownMember(MemberId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
