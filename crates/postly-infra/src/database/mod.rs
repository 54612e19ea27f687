//! Persistence: the PostgreSQL repositories and the in-memory store.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_posts;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};
#[cfg(feature = "postgres")]
pub use postgres_posts::PostgresPostRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresActivityLogRepository, PostgresPlatformRepository, PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
