//! Entity models and request DTOs.

pub mod collection;
pub mod layout;
pub mod rule;
