//! External content repository integration.
//!
//! Collections reference values living in an external CMS. This crate
//! defines the narrow traits the rest of the system talks through
//! (value loaders, converters, URL generators, query runners), a per
//! value-type registry with fail-loud lookups, and a reqwest-backed client
//! for a remote CMS REST API.

pub mod error;
pub mod registry;
pub mod remote;
pub mod service;

pub use error::ContentError;
pub use registry::{ContentRegistry, QueryRunner, ValueConverter, ValueLoader, ValueUrlGenerator};
pub use service::ContentService;
