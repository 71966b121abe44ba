//! Document store boundary.
//!
//! One store per collection, records referenced across collections by id.
//! Nothing here knows about products; the services compose records.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{DocumentStore, StoreError, StoreResult};
