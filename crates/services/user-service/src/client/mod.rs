//! gRPC clients for external services.

mod identity_client;

pub use identity_client::{GrpcIdentityClient, IdentityAuthority};

#[cfg(any(test, feature = "test-utils"))]
pub use identity_client::MockIdentityAuthority;
