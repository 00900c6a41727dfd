//! HTTP handlers, one module per resource.

pub mod collections;
pub mod layouts;
pub mod rules;
