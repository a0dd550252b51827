//! tickstrat — event-driven trading strategy core.
//!
//! Hexagonal architecture: strategies and their data model in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
