//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{Backend, Method, TransportError};

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &!self.auth_header.is_empty())
            .finish()
    }
}

impl RestClient {
    /// Build a client with the configured timeout. The session token, when
    /// present, is sent as a bearer token on every request.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let auth_header = build_auth_headers(config.session.token.as_deref())?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn build_auth_headers(token: Option<&str>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::Config(format!("invalid session token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[async_trait]
impl Backend for RestClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        }
        .headers(self.auth_header.clone());

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(%method, %url, status = response.status().as_u16(), "response received");
        self.parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let client = RestClient::new(&ClientConfig::for_base_url("http://localhost:3000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/professor/1"), "http://localhost:3000/professor/1");
        assert_eq!(client.url("curso/1/secretaria"), "http://localhost:3000/curso/1/secretaria");
    }

    #[test]
    fn test_bearer_header() {
        let headers = build_auth_headers(Some("abc.def.ghi")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc.def.ghi");
        assert!(build_auth_headers(Some("  ")).unwrap().is_empty());
        assert!(build_auth_headers(Some("bad\ntoken")).is_err());
    }
}
