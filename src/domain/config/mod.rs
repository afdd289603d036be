//! Configuration domain module
//!
//! Domain value objects for configuration, kept apart from the
//! environment-loading code in `crate::config`.

pub mod ranking_tables;

pub use ranking_tables::{RankingTables, RankingTablesError, StableMarker};
