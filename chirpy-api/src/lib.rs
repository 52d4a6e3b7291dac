//! # chirpy-api
//!
//! Shared API types for the chirpy service.
//! This crate only depends on serde and can be used by both the backend
//! and any client (native or WASM) talking to it.
//!
//! ## Features
//!
//! - Request bodies (`CredentialsRequest`, `LoginRequest`, `ValidateChirpRequest`,
//!   `PolkaWebhookRequest`)
//! - Response bodies (`UserResponse`, `LoginResponse`, `RefreshTokenResponse`, ...)
//! - Error body (`ErrorResponse`)
//!
//! ## Example
//!
//! ```rust
//! use chirpy_api::LoginRequest;
//!
//! let request = LoginRequest {
//!     email: "user@example.com".to_string(),
//!     password: "password123".to_string(),
//! };
//! assert_eq!(request.email, "user@example.com");
//! ```

pub mod error;
pub mod requests;
pub mod responses;

// Re-exports for convenient access
pub use error::ErrorResponse;
pub use requests::*;
pub use responses::*;
