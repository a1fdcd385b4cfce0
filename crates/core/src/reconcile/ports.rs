//! Dependency management port

use async_trait::async_trait;
use mantle_domain::{AppTarget, DependencyOperation, DependencySet, ManagementStatus, Result};

/// Wire-level dependency management operations, implemented by the
/// infrastructure layer against the App Services admin API.
#[async_trait]
pub trait DependencyApi: Send + Sync {
    /// Read the dependencies currently installed on the target app. This is
    /// the remote source of truth, not whatever the caller last recorded.
    async fn installed_dependencies(&self, target: &AppTarget) -> Result<DependencySet>;

    /// Read the shared management-status channel for the target app.
    async fn management_status(&self, target: &AppTarget) -> Result<ManagementStatus>;

    /// Issue one add or remove call. Success means the API accepted the
    /// operation (no-content); completion is observed separately through
    /// [`DependencyApi::management_status`].
    async fn manage_dependency(
        &self,
        target: &AppTarget,
        operation: &DependencyOperation,
    ) -> Result<()>;
}
