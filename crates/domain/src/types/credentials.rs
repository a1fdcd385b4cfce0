//! API credentials

use std::fmt;

/// Atlas programmatic API key pair.
///
/// The public key doubles as the username and the private key as the secret,
/// whether the call path is the bearer login exchange or the Digest handshake.
/// Credentials are owned by the caller and passed by value into every
/// operation; nothing in the client caches or mutates them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Opaque public identifier.
    pub public_key: String,
    /// Secret half of the key pair.
    pub private_key: String,
}

impl Credentials {
    /// Bundle a key pair.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self { public_key: public_key.into(), private_key: private_key.into() }
    }
}

// Manual Debug so the private key never lands in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Remote scope a management operation acts on: an App Services app inside an
/// Atlas project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    /// Atlas project (group) identifier.
    pub project_id: String,
    /// App Services app identifier.
    pub app_id: String,
}

impl AppTarget {
    /// Bind a project/app pair.
    pub fn new(project_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), app_id: app_id.into() }
    }
}

impl fmt::Display for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project_id, self.app_id)
    }
}
