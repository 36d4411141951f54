//! Sponsor tree engine for club members.
//!
//! Layers, innermost first:
//! - [`domain`]: hierarchy, expansion state, layout, reconciliation, viewport, search
//! - [`application`]: [`application::TreeSession`], the context every operation runs against
//! - [`infrastructure`]: member data sources
//! - [`cli`]: argument parsing, command dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
