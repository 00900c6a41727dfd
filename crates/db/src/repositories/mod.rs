//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod collection_repo;
pub mod item_repo;
pub mod layout_repo;
pub mod rule_repo;

pub use collection_repo::CollectionRepo;
pub use item_repo::ItemRepo;
pub use layout_repo::LayoutRepo;
pub use rule_repo::RuleRepo;
