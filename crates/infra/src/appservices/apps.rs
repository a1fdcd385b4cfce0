//! App lifecycle endpoints

use async_trait::async_trait;
use mantle_core::AppsApi;
use mantle_domain::{AppLookup, AppServicesApp, MantleError, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::AppServicesClient;

#[derive(Debug, Deserialize)]
struct AppRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ServiceRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

impl AppServicesClient {
    /// Resolve the data source service the app links to its backing
    /// cluster. Creating an app provisions a service named after the
    /// cluster.
    async fn linked_data_source(
        &self,
        project_id: &str,
        app_id: &str,
        cluster_name: &str,
    ) -> Result<String> {
        let path = format!("/groups/{project_id}/apps/{app_id}/services");
        let services: Vec<ServiceRecord> = self
            .send_decoding(self.request(Method::GET, &path), || {
                format!("listing services for app {app_id}")
            })
            .await?;

        services
            .into_iter()
            .find(|service| service.name == cluster_name)
            .map(|service| service.id)
            .ok_or_else(|| {
                MantleError::NotFound(format!(
                    "linked data source service {cluster_name} does not exist on app {app_id}"
                ))
            })
    }
}

#[async_trait]
impl AppsApi for AppServicesClient {
    async fn create_app(
        &self,
        project_id: &str,
        cluster_name: &str,
        app_name: &str,
    ) -> Result<AppServicesApp> {
        let request_body = serde_json::json!({
            "name": app_name,
            "data_source": {
                "name": cluster_name,
                "type": "mongodb-atlas",
                "config": {"clusterName": cluster_name},
            },
        });

        let path = format!("/groups/{project_id}/apps");
        let response =
            self.send(self.request(Method::POST, &path).json(&request_body)).await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("unable to create app services app {app_name}"),
            });
        }

        let bytes = response.bytes().await.map_err(crate::http::client::request_error)?;
        let record: AppRecord = crate::http::body::decode(&bytes)?;
        info!(app = %record.name, app_id = %record.id, "created app services app");
        Ok(AppServicesApp { id: record.id, name: record.name })
    }

    async fn find_app(
        &self,
        project_id: &str,
        app_name: &str,
        cluster_name: &str,
    ) -> Result<AppLookup> {
        // Apps created by Atlas triggers only show up under product=atlas,
        // so a miss on the plain listing retries there before giving up.
        let listings =
            [format!("/groups/{project_id}/apps"), format!("/groups/{project_id}/apps?product=atlas")];

        for listing in &listings {
            let apps: Vec<AppRecord> = self
                .send_decoding(self.request(Method::GET, listing), || {
                    format!("listing app services apps in project {project_id}")
                })
                .await?;

            if let Some(app) = apps.into_iter().find(|app| app.name == app_name) {
                debug!(app = %app_name, app_id = %app.id, "resolved app services app");
                let service_id =
                    self.linked_data_source(project_id, &app.id, cluster_name).await?;
                return Ok(AppLookup { app_id: app.id, service_id });
            }
        }

        Err(MantleError::NotFound(format!("app services app {app_name} does not exist")))
    }

    async fn delete_app(&self, project_id: &str, app_id: &str) -> Result<()> {
        let path = format!("/groups/{project_id}/apps/{app_id}");
        let response = self.send(self.request(Method::DELETE, &path)).await?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("failed to delete app services app {app_id}"),
            });
        }
        info!(%app_id, "deleted app services app");
        Ok(())
    }
}
