//! Expiring key/value storage for revoked sessions.

mod memory;

pub use memory::InMemoryCache;
