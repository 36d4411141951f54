//! Infrastructure layer: I/O implementations
//!
//! This layer loads member data from its external source.

pub mod error;
pub mod source;

pub use error::{InfraError, InfraResult};
pub use source::{parse_members, JsonFileSource, MemberSource, StaticSource};
