//! Checks for the dependencies the web application relies on.
//!
//! Each check receives its connection settings at construction; a missing
//! setting means the dependency is not part of this deployment and the check
//! answers `not_configured` without touching the network.

mod cache;
mod datastore;
mod job_store;
mod search_index;

pub use cache::{CacheCheck, WRITE_FAILED};
pub use datastore::DatastoreCheck;
pub use job_store::{JobStoreCheck, TABLES_NOT_FOUND};
pub use search_index::SearchIndexCheck;
