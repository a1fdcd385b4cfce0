//! Function lifecycle and execution endpoints

use std::time::Duration;

use async_trait::async_trait;
use mantle_core::FunctionsApi;
use mantle_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use mantle_domain::{AppFunction, MantleError, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::AppServicesClient;

#[derive(Debug, Deserialize)]
struct FunctionSummary {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct FunctionDetail {
    name: String,
    source: String,
}

#[derive(Debug, Deserialize)]
struct CreatedFunction {
    #[serde(rename = "_id")]
    id: String,
}

#[async_trait]
impl FunctionsApi for AppServicesClient {
    async fn create_function(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
        source: &str,
    ) -> Result<String> {
        let request_body = serde_json::json!({
            "name": function_name,
            "private": false,
            "source": source,
            "run_as_system": true,
        });

        let path = format!("/groups/{project_id}/apps/{app_id}/functions");
        let response =
            self.send(self.request(Method::POST, &path).json(&request_body)).await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("unable to create app function {function_name}"),
            });
        }

        let bytes = response.bytes().await.map_err(crate::http::client::request_error)?;
        let created: CreatedFunction = crate::http::body::decode(&bytes)?;
        info!(function = %function_name, function_id = %created.id, "created app function");
        Ok(created.id)
    }

    async fn function_by_name(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
    ) -> Result<AppFunction> {
        let path = format!("/groups/{project_id}/apps/{app_id}/functions");
        let functions: Vec<FunctionSummary> = self
            .send_decoding(self.request(Method::GET, &path), || {
                format!("listing functions for app {app_id}")
            })
            .await?;

        let summary = functions
            .into_iter()
            .find(|function| function.name == function_name)
            .ok_or_else(|| {
                MantleError::NotFound(format!("app function {function_name} does not exist"))
            })?;

        self.function_by_id(project_id, app_id, &summary.id).await
    }

    async fn function_by_id(
        &self,
        project_id: &str,
        app_id: &str,
        function_id: &str,
    ) -> Result<AppFunction> {
        let path = format!("/groups/{project_id}/apps/{app_id}/functions/{function_id}");
        let detail: FunctionDetail = self
            .send_decoding(self.request(Method::GET, &path), || {
                format!("fetching app function {function_id}")
            })
            .await?;

        Ok(AppFunction { id: function_id.to_string(), name: detail.name, source: detail.source })
    }

    async fn execute_function(
        &self,
        project_id: &str,
        app_id: &str,
        function_name: &str,
        arguments: &[String],
        timeout: Option<Duration>,
    ) -> Result<()> {
        let request_body = serde_json::json!({
            "name": function_name,
            "arguments": arguments,
        });

        // Function execution can legitimately outlast the 10s transport
        // default; a caller-provided timeout overrides it per request, with
        // zero treated the same as unset.
        let timeout = timeout
            .filter(|value| !value.is_zero())
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        let path = format!(
            "/groups/{project_id}/apps/{app_id}/debug/execute_function?run_as_system=true"
        );
        let request = self.request(Method::POST, &path).timeout(timeout).json(&request_body);
        let response = self.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("unable to execute app function {function_name}"),
            });
        }
        debug!(function = %function_name, "executed app function");
        Ok(())
    }

    async fn delete_function(
        &self,
        project_id: &str,
        app_id: &str,
        function_id: &str,
    ) -> Result<()> {
        let path = format!("/groups/{project_id}/apps/{app_id}/functions/{function_id}");
        let response = self.send(self.request(Method::DELETE, &path)).await?;

        // This endpoint answers 200, not 204.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("failed to delete app function {function_id}"),
            });
        }
        info!(%function_id, "deleted app function");
        Ok(())
    }
}
