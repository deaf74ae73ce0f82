//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated definitions for the identity
//! authority (`auth.Auth`): token resolution, role binding, token issuance
//! and the role catalogue.

/// Identity authority definitions.
pub mod auth {
    tonic::include_proto!("auth");
}

// Re-export commonly used items
pub use auth::auth_client::AuthClient;
pub use auth::auth_server::{Auth, AuthServer};
