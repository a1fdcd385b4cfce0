//! Dependency management endpoints
//!
//! The wire surface the reconciler drives: list installed dependencies, read
//! the shared management status, and issue one PUT/DELETE per package. The
//! management calls answer 204 when accepted; completion is only visible
//! through the status endpoint.

use async_trait::async_trait;
use mantle_core::reconcile::DependencyApi;
use mantle_domain::{
    AppTarget, Dependency, DependencyOperation, DependencySet, ManagementStatus, MantleError,
    OperationKind, Result,
};
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use super::client::AppServicesClient;

#[derive(Debug, Deserialize)]
struct DependenciesListResponse {
    dependencies_list: Vec<DependencyRecord>,
}

#[derive(Debug, Deserialize)]
struct DependencyRecord {
    name: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    status_message: String,
}

#[async_trait]
impl DependencyApi for AppServicesClient {
    async fn installed_dependencies(&self, target: &AppTarget) -> Result<DependencySet> {
        let path =
            format!("/groups/{}/apps/{}/dependencies", target.project_id, target.app_id);
        let listing: DependenciesListResponse = self
            .send_decoding(self.request(Method::GET, &path), || {
                format!("listing installed dependencies for {target}")
            })
            .await?;

        listing
            .dependencies_list
            .into_iter()
            .map(|record| {
                Dependency::new(record.name, record.version).map_err(|err| {
                    MantleError::Decode(format!("invalid dependency in listing: {err}"))
                })
            })
            .collect()
    }

    async fn management_status(&self, target: &AppTarget) -> Result<ManagementStatus> {
        let path = format!(
            "/groups/{}/apps/{}/dependencies/status",
            target.project_id, target.app_id
        );
        let status: StatusResponse = self
            .send_decoding(self.request(Method::GET, &path), || {
                format!("reading dependency management status for {target}")
            })
            .await?;

        Ok(ManagementStatus::from_wire(&status.status, status.status_message))
    }

    async fn manage_dependency(
        &self,
        target: &AppTarget,
        operation: &DependencyOperation,
    ) -> Result<()> {
        let method = match operation.kind() {
            OperationKind::Add => Method::PUT,
            OperationKind::Remove => Method::DELETE,
        };
        let path = format!(
            "/groups/{}/apps/{}/dependencies/{}?version={}",
            target.project_id,
            target.app_id,
            urlencoding::encode(operation.name()),
            operation.version()
        );

        let response = self.send(self.request(method, &path)).await?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!(
                    "unable to manage app function dependency {} : {} ({})",
                    operation.name(),
                    operation.version(),
                    operation.kind()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mantle_domain::ClientConfig;
    use mantle_domain::ManagementState;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(mock_server: &MockServer) -> AppServicesClient {
        let config = ClientConfig::new().with_services_base_url(mock_server.uri());
        AppServicesClient::new(&config, "test-token").unwrap()
    }

    fn target() -> AppTarget {
        AppTarget::new("632a41e0f2a45b6e1c1a0000", "632a41e0f2a45b6e1c1a0001")
    }

    #[tokio::test]
    async fn lists_installed_dependencies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(
                "/groups/632a41e0f2a45b6e1c1a0000/apps/632a41e0f2a45b6e1c1a0001/dependencies",
            ))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "dependencies_list": [
                    {"name": "uuidv1", "version": "1.6.14"},
                    {"name": "simple-test-package", "version": "0.2.2"},
                ]
            })))
            .mount(&mock_server)
            .await;

        let installed =
            client(&mock_server).await.installed_dependencies(&target()).await.unwrap();

        assert_eq!(installed.len(), 2);
        assert_eq!(installed.version_of("uuidv1"), Some("1.6.14"));
        assert_eq!(installed.version_of("simple-test-package"), Some("0.2.2"));
    }

    #[tokio::test]
    async fn listing_with_missing_field_is_a_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "dependencies_list": [{"name": "uuidv1"}]
            })))
            .mount(&mock_server)
            .await;

        let err =
            client(&mock_server).await.installed_dependencies(&target()).await.unwrap_err();

        assert!(matches!(err, MantleError::Decode(_)));
    }

    #[tokio::test]
    async fn reads_management_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(
                "/groups/632a41e0f2a45b6e1c1a0000/apps/632a41e0f2a45b6e1c1a0001/dependencies/status",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "failed",
                "status_message": "package does not exist",
            })))
            .mount(&mock_server)
            .await;

        let status = client(&mock_server).await.management_status(&target()).await.unwrap();

        assert_eq!(status.state, ManagementState::Failed);
        assert_eq!(status.message, "package does not exist");
    }

    #[tokio::test]
    async fn put_manages_an_addition() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(
                "/groups/632a41e0f2a45b6e1c1a0000/apps/632a41e0f2a45b6e1c1a0001/dependencies/uuidv1",
            ))
            .and(query_param("version", "1.6.14"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let operation =
            DependencyOperation::add(Dependency::new("uuidv1", "1.6.14").unwrap());
        client(&mock_server).await.manage_dependency(&target(), &operation).await.unwrap();
    }

    #[tokio::test]
    async fn delete_manages_a_removal_with_escaped_name() {
        let mock_server = MockServer::start().await;

        // Scoped package names contain characters that must be escaped in
        // the path segment.
        Mock::given(method("DELETE"))
            .and(path(
                "/groups/632a41e0f2a45b6e1c1a0000/apps/632a41e0f2a45b6e1c1a0001/dependencies/%40org%2Fpkg",
            ))
            .and(query_param("version", "2.0.0"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let operation =
            DependencyOperation::remove(Dependency::new("@org/pkg", "2.0.0").unwrap());
        client(&mock_server).await.manage_dependency(&target(), &operation).await.unwrap();
    }

    #[tokio::test]
    async fn non_204_management_response_is_fatal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let operation =
            DependencyOperation::add(Dependency::new("uuidv1", "1.6.14").unwrap());
        let err = client(&mock_server)
            .await
            .manage_dependency(&target(), &operation)
            .await
            .unwrap_err();

        match err {
            MantleError::UnexpectedStatus { got, context } => {
                assert_eq!(got, 400);
                assert!(context.contains("uuidv1"));
                assert!(context.contains("1.6.14"));
                assert!(context.contains("add"));
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }
}
