//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// HTTP configuration
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// Dependency management polling
pub const POLL_INTERVAL_SECS: u64 = 5;
pub const MAX_POLL_ATTEMPTS: usize = 240;

// API endpoints
pub const SERVICES_API_BASE_URL: &str = "https://services.cloud.mongodb.com/api/admin/v3.0";
pub const ATLAS_API_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v2";

// The Atlas admin API versions responses through the Accept header
pub const ATLAS_VERSIONED_ACCEPT: &str = "application/vnd.atlas.2023-01-01+json";
pub const JSON_ACCEPT: &str = "application/json";
