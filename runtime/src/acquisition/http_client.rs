//! HTTP document retrieval wrapping reqwest.
//!
//! One GET per document, sequential, no retry: a failed fetch is reported
//! to the caller, which decides whether it is fatal.

use crate::error::{Result, TaxonomyError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Anything that can retrieve the raw bytes of a sitemap document.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` and return its body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        let ua = concat!("sitemap-taxonomy/", env!("CARGO_PKG_VERSION"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TaxonomyError::fetch(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TaxonomyError::fetch(url, format!("HTTP {}", status.as_u16())));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TaxonomyError::fetch(url, e))?;
        debug!("fetched {} ({} bytes)", url, body.len());

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(10000);
        let _ = client;
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000);
        let body = client
            .fetch(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"<urlset/>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000);
        let err = client
            .fetch(&format!("{}/missing.xml", server.uri()))
            .await
            .unwrap_err();
        match err {
            TaxonomyError::Fetch { message, .. } => assert_eq!(message, "HTTP 404"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
