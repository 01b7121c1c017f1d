//! # Domain Models
//!
//! Plain data shared across the workspace: configuration, table names, catalog
//! events and the slice registry. Only `serde` is allowed here.

pub mod config;
pub mod constants;
pub mod events;
pub mod registry;
