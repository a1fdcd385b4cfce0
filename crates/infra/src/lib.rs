//! # Mantle Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP client wrapper and centralized body decoding
//! - The HTTP Digest authenticator (challenge parsing, MD5 chain, retry)
//! - The App Services admin client (bearer token) implementing the
//!   dependency, apps, and functions ports
//! - The Atlas admin client (Digest) implementing the containers port
//!
//! ## Architecture
//! - Implements traits defined in `mantle-core`
//! - Depends on `mantle-domain` and `mantle-core`
//! - Contains all "impure" code (network I/O)

pub mod admin;
pub mod appservices;
pub mod http;

// Re-export commonly used items
pub use admin::AtlasAdminClient;
pub use appservices::{login, AppServicesClient};
pub use http::{DigestAuthenticator, DigestChallenge, HttpClient, HttpClientBuilder};
