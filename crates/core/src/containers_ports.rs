//! Atlas admin port interfaces

use async_trait::async_trait;
use mantle_domain::{CloudProvider, ClusterContainer, Result};

/// Network container queries against the Digest-authenticated Atlas admin
/// API.
#[async_trait]
pub trait ContainersApi: Send + Sync {
    /// List the project's network containers for one cloud provider.
    async fn containers(
        &self,
        project_id: &str,
        provider: CloudProvider,
    ) -> Result<Vec<ClusterContainer>>;
}
