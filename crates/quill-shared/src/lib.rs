//! # Quill Shared
//!
//! Wire types shared by the API server and its clients: request/response
//! DTOs and the `{success, data, error, message}` envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
