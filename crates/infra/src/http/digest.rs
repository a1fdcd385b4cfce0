//! HTTP Digest authentication
//!
//! The Atlas admin API does not accept pre-issued tokens; every call performs
//! the challenge/response handshake by hand: probe unauthenticated, parse the
//! 401 challenge, compute the MD5 chain, retry with the computed
//! `Authorization` header.
//!
//! Each handshake is independent. The nonce count is a constant because no
//! session ever spans more than one authenticated request; supporting
//! keep-alive sessions would be a deliberate extension, not a tweak here.

use md5::{Digest, Md5};
use mantle_domain::constants::JSON_ACCEPT;
use mantle_domain::{Credentials, MantleError, Result};
use rand::RngCore;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::body;
use super::client::{request_error, HttpClient};

const NONCE_COUNT: &str = "00000001";

/// Directives extracted from a 401 response's `WWW-Authenticate` header.
///
/// Constructed per request and discarded once the authenticated retry
/// completes. A missing or malformed header yields empty fields; the
/// recomputed digest then simply fails downstream. There is no
/// special-casing of a bad challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestChallenge {
    /// Protection realm.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Quality of protection.
    pub qop: String,
}

impl DigestChallenge {
    /// Scan the comma-separated directives for `nonce`, `realm` and `qop`,
    /// taking each value as the first double-quoted token after the
    /// directive name.
    pub fn parse(header: &str) -> Self {
        let mut challenge = Self::default();
        for directive in header.split(',') {
            if directive.contains("nonce") {
                challenge.nonce = quoted_token(directive);
            } else if directive.contains("realm") {
                challenge.realm = quoted_token(directive);
            } else if directive.contains("qop") {
                challenge.qop = quoted_token(directive);
            }
        }
        challenge
    }
}

fn quoted_token(directive: &str) -> String {
    directive.split('"').nth(1).unwrap_or_default().to_string()
}

fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// 8 random bytes, hex-encoded, truncated to 16 characters.
fn client_nonce() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut encoded = hex::encode(bytes);
    encoded.truncate(16);
    encoded
}

/// The RFC 2617 response hash:
/// `MD5(HA1:nonce:nc:cnonce:qop:HA2)` with `HA1 = MD5(username:realm:password)`
/// and `HA2 = MD5(method:uri)`, all lowercase hex.
pub fn digest_response(
    credentials: &Credentials,
    method: &str,
    uri: &str,
    challenge: &DigestChallenge,
    cnonce: &str,
    nonce_count: &str,
) -> String {
    let ha1 = md5_hex(&format!(
        "{}:{}:{}",
        credentials.public_key, challenge.realm, credentials.private_key
    ));
    let ha2 = md5_hex(&format!("{method}:{uri}"));
    md5_hex(&format!(
        "{ha1}:{}:{nonce_count}:{cnonce}:{}:{ha2}",
        challenge.nonce, challenge.qop
    ))
}

/// Build the full `Authorization: Digest ...` header value.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    uri: &str,
    challenge: &DigestChallenge,
    cnonce: &str,
    nonce_count: &str,
) -> String {
    let response = digest_response(credentials, method, uri, challenge, cnonce, nonce_count);
    format!(
        r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", cnonce="{}", nc="{}", qop="{}", response="{}""#,
        credentials.public_key,
        challenge.realm,
        challenge.nonce,
        uri,
        cnonce,
        nonce_count,
        challenge.qop,
        response
    )
}

/// Performs the two-phase Digest handshake for a single request.
#[derive(Clone)]
pub struct DigestAuthenticator {
    http: HttpClient,
}

impl DigestAuthenticator {
    /// Wrap an HTTP client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Issue `method url` with Digest authentication and return the
    /// normalized JSON document (see [`body::normalize`]); `DELETE` calls
    /// return no body.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        credentials: &Credentials,
        request_body: Option<&Value>,
        accept: &str,
    ) -> Result<Option<Value>> {
        // Phase one: unauthenticated probe. Anything but a 401 challenge is
        // a protocol error for this endpoint family.
        let mut probe = self.http.request(method.clone(), url);
        if let Some(json) = request_body {
            probe = probe.json(json);
        }
        let response = self.http.send(probe).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Err(MantleError::UnexpectedStatus {
                got: response.status().as_u16(),
                context: format!("expected a 401 challenge from digest authenticated endpoint {url}"),
            });
        }

        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(DigestChallenge::parse)
            .unwrap_or_default();
        debug!(realm = %challenge.realm, qop = %challenge.qop, %url, "received digest challenge");

        // The digest uri is the path (plus query) of the request line.
        let uri = request_uri(response.url());

        let authorization = authorization_header(
            credentials,
            method.as_str(),
            &uri,
            &challenge,
            &client_nonce(),
            NONCE_COUNT,
        );

        let mut retry = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, JSON_ACCEPT)
            .header(ACCEPT, accept);
        if let Some(json) = request_body {
            retry = retry.json(json);
        }

        let response = self.http.send(retry).await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MantleError::Auth(format!(
                "digest authentication against {url} was rejected"
            )));
        }
        if !status.is_success() {
            return Err(MantleError::UnexpectedStatus {
                got: status.as_u16(),
                context: format!("digest request {method} {url}"),
            });
        }

        if method == Method::DELETE {
            return Ok(None);
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        body::normalize(&bytes).map(Some)
    }
}

fn request_uri(url: &reqwest::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}
