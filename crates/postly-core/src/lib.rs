//! # Postly Core
//!
//! The domain layer of the Postly scheduling backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the ports infrastructure must implement, and the services that
//! drive the post lifecycle and the scheduled publish sweep.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldErrors, RepoError};
