/*
[INPUT]:  HTTP configuration (timeouts) and tenant settings (service URL)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::{CollectorError, Result};
use crate::types::{TenantConfig, normalize_base_url};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the collector backend
#[derive(Debug, Clone)]
pub struct CollectorClient {
    http_client: Client,
    base_url: Option<String>,
}

impl CollectorClient {
    /// Create a client for the service URL stored in the tenant settings
    pub fn new(settings: &TenantConfig) -> Result<Self> {
        Self::with_config(ClientConfig::default(), settings)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig, settings: &TenantConfig) -> Result<Self> {
        Self::with_base_url(config, &settings.service_url)
    }

    /// Create a client for an explicit base URL. An empty URL is accepted here;
    /// every call then fails with a configuration error before touching the network.
    pub fn with_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let normalized = normalize_base_url(base_url);
        let base_url = if normalized.is_empty() {
            None
        } else {
            Url::parse(&normalized)?;
            Some(normalized)
        };

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Build full URL for an endpoint path under the configured base
    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(CollectorError::missing_service_url)?;
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }

    /// Build request builder for an endpoint under the configured base
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        Ok(self.request_url(method, url))
    }

    /// Build request builder for an absolute URL
    pub(crate) fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
    }

    /// Send a request and decode its JSON body. Non-success statuses are
    /// reported as communication failures.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let (status, body) = self.send(builder).await?;
        if !status.is_success() {
            return Err(CollectorError::http_status(status));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Like [`send_json`](Self::send_json), but an error status whose body still
    /// decodes as the `{Ok, MensErro}` envelope yields that envelope, so the
    /// backend's own message reaches the worker.
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let (status, body) = self.send(builder).await?;
        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }
        serde_json::from_slice(&body).map_err(|_| CollectorError::http_status(status))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let response = builder.send().await.map_err(|err| {
            warn!(error = %err, "request failed");
            CollectorError::Communication(err)
        })?;

        let status = response.status();
        let url = response.url().clone();
        debug!(%url, status = status.as_u16(), "response received");
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "backend returned error status");
        }

        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_fails_fast() {
        let client = CollectorClient::with_base_url(ClientConfig::default(), "").expect("client");
        assert!(client.base_url().is_none());
        let err = client
            .request(Method::GET, "/api/coletor/login")
            .expect_err("no base url");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let settings = TenantConfig::new("https://wms.example.com/", "ACME");
        let client = CollectorClient::new(&settings).expect("client");
        assert_eq!(client.base_url(), Some("https://wms.example.com"));
        let url = client.endpoint_url("/api/coletor/login").expect("url");
        assert_eq!(url.as_str(), "https://wms.example.com/api/coletor/login");
    }

    #[test]
    fn test_base_path_is_preserved() {
        let client =
            CollectorClient::with_base_url(ClientConfig::default(), "https://host/wms/").expect("client");
        let url = client.endpoint_url("/api/coletor/logout").expect("url");
        assert_eq!(url.as_str(), "https://host/wms/api/coletor/logout");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = CollectorClient::with_base_url(ClientConfig::default(), "not a url")
            .expect_err("invalid url");
        assert!(matches!(err, CollectorError::UrlParse(_)));
    }
}
