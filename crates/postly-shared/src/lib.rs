//! # Postly Shared
//!
//! Wire types shared by the server and its clients: request/response DTOs
//! and the JSON response envelope.

pub mod dto;
pub mod response;

pub use response::ApiResponse;
