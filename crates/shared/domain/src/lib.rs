//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod access;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod password;
pub mod policy;
pub mod user;

pub use access::EndpointPolicy;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::Page;
pub use password::{CredentialHasher, Password};
pub use policy::PasswordPolicy;
pub use user::{
    compact_date, Credential, RequestFilters, ResolvedIdentity, ResponseUser, RestoreRequest,
    Session, TokenPair, UserFilter, UserPage,
};
