//! HTTP plumbing shared by the API clients

pub mod body;
pub mod client;
pub mod digest;

pub use client::{HttpClient, HttpClientBuilder};
pub use digest::{DigestAuthenticator, DigestChallenge};
