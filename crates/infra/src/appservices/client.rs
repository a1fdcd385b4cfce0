//! App Services admin client

use mantle_domain::{ClientConfig, Credentials, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::http::body;
use crate::http::client::{request_error, HttpClient};

use super::auth;

/// Client for the App Services admin API, authenticated with a bearer token.
///
/// One instance serves every project and app; the target identifiers are
/// threaded through each call rather than bound at construction, which is
/// what lets a single client reconcile across a target change.
pub struct AppServicesClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl AppServicesClient {
    /// Client around an already-acquired bearer token.
    pub fn new(config: &ClientConfig, token: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, base_url: config.services_base_url.clone(), token: token.into() })
    }

    /// Perform the login exchange and build a client from the resulting
    /// token.
    pub async fn login(config: &ClientConfig, credentials: &Credentials) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        let token = auth::login(&http, &config.services_base_url, credentials).await?;
        Ok(Self { http, base_url: config.services_base_url.clone(), token })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        self.http.send(builder).await
    }

    /// Send and decode a 2xx response into the endpoint's wire type.
    pub(crate) async fn send_decoding<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: impl FnOnce() -> String,
    ) -> Result<T> {
        let response = self.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(mantle_domain::MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: context(),
            });
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        body::decode(&bytes)
    }
}
