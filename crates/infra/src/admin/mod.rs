//! Atlas admin API client (Digest authentication)
//!
//! The `cloud.mongodb.com` admin endpoints do not accept bearer tokens;
//! every call goes through the hand-rolled Digest handshake in
//! [`crate::http::digest`].

pub mod containers;

pub use containers::AtlasAdminClient;
