//! Mosaic domain logic.
//!
//! This crate holds the pure parts of the layout engine — target and
//! condition matching, rule resolution, collection result building, and
//! parameter validation — with zero internal deps so it can be used by the
//! API, the persistence layer, and any future CLI tooling.

pub mod collection;
pub mod conditions;
pub mod context;
pub mod error;
pub mod items;
pub mod parameters;
pub mod resolver;
pub mod targets;
pub mod types;
