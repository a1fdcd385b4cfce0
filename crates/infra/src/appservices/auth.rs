//! Bearer token acquisition
//!
//! A single stateless exchange: the Atlas API key pair goes in, an access
//! token comes out. Nothing is cached; callers own the token's lifetime.

use mantle_domain::{Credentials, MantleError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::http::body;
use crate::http::client::{request_error, HttpClient};

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// Exchange an API key pair for an App Services admin bearer token.
pub async fn login(
    http: &HttpClient,
    services_base_url: &str,
    credentials: &Credentials,
) -> Result<String> {
    let url = format!("{services_base_url}/auth/providers/mongodb-cloud/login");
    let request_body = serde_json::json!({
        "username": credentials.public_key,
        "apiKey": credentials.private_key,
    });

    let request =
        http.request(Method::POST, &url).header(CONTENT_TYPE, "application/json").json(&request_body);
    let response = http.send(request).await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(MantleError::Auth(format!(
            "login with public key {} was rejected with http status {}",
            credentials.public_key,
            status.as_u16()
        )));
    }

    let bytes = response.bytes().await.map_err(request_error)?;
    let auth: AuthResponse = body::decode(&bytes)?;
    debug!(public_key = %credentials.public_key, "obtained app services bearer token");
    Ok(auth.access_token)
}
