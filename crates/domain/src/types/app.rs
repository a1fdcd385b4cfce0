//! App Services and Atlas admin entities

use std::fmt;

/// An App Services app as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppServicesApp {
    /// App identifier (`_id` on the wire).
    pub id: String,
    /// App name.
    pub name: String,
}

/// Result of resolving an app by name: the app id plus the id of the linked
/// data source service named after the backing cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLookup {
    /// App identifier.
    pub app_id: String,
    /// Linked data source service identifier.
    pub service_id: String,
}

/// An App Services function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFunction {
    /// Function identifier (`_id` on the wire).
    pub id: String,
    /// Function name.
    pub name: String,
    /// JavaScript source.
    pub source: String,
}

/// Cloud providers the cluster container endpoint is supported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    /// Amazon Web Services.
    Aws,
    /// Microsoft Azure.
    Azure,
}

impl CloudProvider {
    /// Value the Atlas admin API expects in `providerName` query parameters
    /// and reports in container records.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "AZURE",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// A network container backing an Atlas cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContainer {
    /// Container identifier.
    pub id: String,
    /// Cloud provider the container lives in.
    pub provider: CloudProvider,
    /// Provider region, normalized across the provider-specific wire fields.
    pub region: String,
    /// CIDR block Atlas allocated for the container.
    pub atlas_cidr_block: String,
}
