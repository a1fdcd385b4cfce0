//! Cluster network container queries

use async_trait::async_trait;
use mantle_core::ContainersApi;
use mantle_domain::constants::ATLAS_VERSIONED_ACCEPT;
use mantle_domain::{
    ClientConfig, CloudProvider, ClusterContainer, Credentials, MantleError, Result,
};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::http::client::HttpClient;
use crate::http::digest::DigestAuthenticator;

/// Client for the Digest-authenticated Atlas admin API.
pub struct AtlasAdminClient {
    digest: DigestAuthenticator,
    base_url: String,
    credentials: Credentials,
}

impl AtlasAdminClient {
    /// Build a client around an API key pair. The pair doubles as the
    /// Digest username/password on every call; no session survives between
    /// calls.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            digest: DigestAuthenticator::new(http),
            base_url: config.atlas_base_url.clone(),
            credentials,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ContainersPage {
    results: Vec<ContainerRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerRecord {
    id: String,
    atlas_cidr_block: String,
    // The region lives in a provider-specific field.
    region_name: Option<String>,
    region: Option<String>,
}

impl ContainerRecord {
    fn into_container(self, provider: CloudProvider) -> Result<ClusterContainer> {
        let region = match provider {
            CloudProvider::Aws => self.region_name,
            CloudProvider::Azure => self.region,
        }
        .ok_or_else(|| {
            MantleError::Decode(format!(
                "container {} is missing the {provider} region field",
                self.id
            ))
        })?;

        Ok(ClusterContainer {
            id: self.id,
            provider,
            region,
            atlas_cidr_block: self.atlas_cidr_block,
        })
    }
}

#[async_trait]
impl ContainersApi for AtlasAdminClient {
    async fn containers(
        &self,
        project_id: &str,
        provider: CloudProvider,
    ) -> Result<Vec<ClusterContainer>> {
        let url = format!(
            "{}/groups/{project_id}/containers?providerName={}",
            self.base_url,
            provider.as_query_value()
        );

        let document = self
            .digest
            .send(Method::GET, &url, &self.credentials, None, ATLAS_VERSIONED_ACCEPT)
            .await?
            .ok_or_else(|| {
                MantleError::Decode("container listing returned no body".to_string())
            })?;

        let page: ContainersPage = serde_json::from_value(document)
            .map_err(|err| MantleError::Decode(format!("unexpected container listing: {err}")))?;

        debug!(%project_id, %provider, count = page.results.len(), "listed cluster containers");
        page.results.into_iter().map(|record| record.into_container(provider)).collect()
    }
}
