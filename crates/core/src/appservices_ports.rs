//! App Services admin port interfaces
//!
//! One-shot CRUD surface around apps and functions. These calls have no
//! polling contract; success or failure is known from the HTTP response
//! alone.

use std::time::Duration;

use async_trait::async_trait;
use mantle_domain::{AppFunction, AppLookup, AppServicesApp, Result};

/// App lifecycle operations.
#[async_trait]
pub trait AppsApi: Send + Sync {
    /// Create an app linked to `cluster_name` as its default data source.
    async fn create_app(
        &self,
        project_id: &str,
        cluster_name: &str,
        app_name: &str,
    ) -> Result<AppServicesApp>;

    /// Resolve an app by name, including the id of the data source service
    /// named after the backing cluster. Apps created through Atlas triggers
    /// only appear under a `product=atlas` listing, so the lookup falls back
    /// to that listing before reporting the app missing.
    async fn find_app(
        &self,
        project_id: &str,
        app_name: &str,
        cluster_name: &str,
    ) -> Result<AppLookup>;

    /// Delete an app by id.
    async fn delete_app(&self, project_id: &str, app_id: &str) -> Result<()>;
}

/// Function lifecycle and execution operations.
#[async_trait]
pub trait FunctionsApi: Send + Sync {
    /// Create a function and return its id.
    async fn create_function(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
        source: &str,
    ) -> Result<String>;

    /// Resolve a function by name, including its source.
    async fn function_by_name(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
    ) -> Result<AppFunction>;

    /// Fetch a function by id.
    async fn function_by_id(
        &self,
        project_id: &str,
        app_id: &str,
        function_id: &str,
    ) -> Result<AppFunction>;

    /// Execute a function as the system user. A `None` (or zero) timeout
    /// falls back to the 10-second default.
    async fn execute_function(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
        arguments: &[String],
        timeout: Option<Duration>,
    ) -> Result<()>;

    /// Delete a function by id.
    async fn delete_function(&self, project_id: &str, app_id: &str, function_id: &str)
        -> Result<()>;
}
