//! Evaluation records for coalition associates.
//!
//! Domain types, category-score parsing and the store interface the
//! analytics pipeline reads from.

pub mod schema;
pub mod category;
pub mod store;
pub mod memory;

pub use schema::*;
pub use category::*;
pub use store::{EvaluationStore, StoreError};
pub use memory::InMemoryStore;
