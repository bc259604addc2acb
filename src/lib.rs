//! Migrate open projects and tasks from a hosted task service into a
//! productivity-app backup file.
//!
//! The pipeline is fetch ([`source`]) → map ([`mapper`]) → merge ([`merge`])
//! → write ([`store::backup`]). Target ids are derived from source ids
//! ([`ids`]), so a migration can be re-run on its own output without
//! duplicating anything.

pub mod build_info;
pub mod commands;
pub mod document;
pub mod error;
pub mod ids;
pub mod logging;
pub mod mapper;
pub mod merge;
pub mod model;
pub mod output;
pub mod records;
pub mod source;
pub mod store;
pub mod tags;
pub mod timestamp;
