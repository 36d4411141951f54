//! Application layer: the session context and its use cases
//!
//! This layer orchestrates domain logic; it performs no I/O.

pub mod error;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use session::{Frame, TreeSession};
