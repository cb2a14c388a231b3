//! Data Client
//!
//! Trait seam for the remote creature data service, plus the PokeAPI
//! implementation used by the terminal surface.
//!
//! # PokeAPI
//!
//! - `GET /pokemon/{name-or-id}` - one creature document
//! - `GET /pokemon?limit=1` - cheap reachability probe
//!
//! The controller only cares whether a lookup failed, not why; the error
//! variants exist for logging.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::record::CreatureRecord;

/// Default PokeAPI endpoint
pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";

/// Errors surfaced by a lookup
#[derive(Debug, Error)]
pub enum FetchError {
    /// Base URL could not be used to build request URLs
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS, or timeout failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service returned {status} for '{query}'")]
    Status {
        /// HTTP status code
        status: u16,
        /// Query that was sent
        query: String,
    },

    /// Body was not a creature document
    #[error("could not decode record: {0}")]
    Decode(#[from] serde_json::Error),

    /// Record decoded but carries no artwork to animate
    #[error("record for '{query}' has no sprites")]
    MissingSprites {
        /// Query that was sent
        query: String,
    },
}

/// Remote creature data service
///
/// Implement this trait to point the controller at a different service, or
/// at a scripted fake in tests.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Service name for logs
    fn name(&self) -> &str;

    /// Look up one creature by lowercase name or numeric id
    async fn fetch_by_name_or_id(&self, query: &str) -> Result<CreatureRecord, FetchError>;
}

/// PokeAPI client
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl PokeApiClient {
    /// Create a client for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`FetchError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// URL of the creature document for `query`
    ///
    /// The query is pushed as a single path segment, so characters such as
    /// `/` or `?` are percent-encoded rather than changing the route.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL has no path.
    pub fn creature_url(&self, query: &str) -> Result<Url, FetchError> {
        self.endpoint(&["pokemon", query])
    }

    /// Check that the service is reachable
    pub async fn health_check(&self) -> bool {
        let Ok(mut url) = self.endpoint(&["pokemon"]) else {
            return false;
        };
        url.set_query(Some("limit=1"));

        match self
            .http_client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl DataClient for PokeApiClient {
    fn name(&self) -> &'static str {
        "PokeAPI"
    }

    async fn fetch_by_name_or_id(&self, query: &str) -> Result<CreatureRecord, FetchError> {
        let url = self.creature_url(query)?;
        tracing::debug!(url = %url, "Fetching creature");

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                query: query.to_string(),
            });
        }

        let body = response.text().await?;
        let record: CreatureRecord = serde_json::from_str(&body)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> PokeApiClient {
        PokeApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_creature_url() {
        let url = client(DEFAULT_API_URL).creature_url("pikachu").unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon/pikachu");
    }

    #[test]
    fn test_creature_url_with_trailing_slash() {
        let url = client("http://localhost:8080/api/v2/")
            .creature_url("25")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/pokemon/25");
    }

    #[test]
    fn test_creature_url_encodes_query_as_one_segment() {
        let url = client(DEFAULT_API_URL)
            .creature_url("mr. mime/../x?y")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://pokeapi.co/api/v2/pokemon/mr.%20mime%2F..%2Fx%3Fy"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            PokeApiClient::new("ftp://example.com", Duration::from_secs(1)),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            PokeApiClient::new("not a url", Duration::from_secs(1)),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    /// Serve one canned HTTP response on a local port, returning the base URL
    /// and a handle resolving to the request line that was received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request_line = String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            request_line
        });

        (format!("http://{addr}/api/v2"), handle)
    }

    #[tokio::test]
    async fn test_fetch_decodes_record() {
        let body = r#"{
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "sprites": {"front_default": "a.png", "back_default": "b.png", "front_shiny": "s.png"},
            "cries": {"latest": "cry.ogg", "legacy": "old.ogg"}
        }"#;
        let (base, request) = serve_once("200 OK", body).await;

        let record = client(&base).fetch_by_name_or_id("pikachu").await.unwrap();

        assert_eq!(record.id, Some(25));
        assert_eq!(record.name.as_deref(), Some("pikachu"));
        assert_eq!(
            record.animation_frames(),
            Some(["a.png".to_string(), "b.png".to_string()])
        );
        assert_eq!(record.cry_url(), Some("cry.ogg"));
        assert_eq!(
            request.await.unwrap(),
            "GET /api/v2/pokemon/pikachu HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_not_found_to_status() {
        let (base, _request) = serve_once("404 Not Found", "Not Found").await;

        let err = client(&base)
            .fetch_by_name_or_id("missingno")
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, query } => {
                assert_eq!(status, 404);
                assert_eq!(query, "missingno");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_maps_malformed_body_to_decode() {
        let (base, _request) = serve_once("200 OK", "<html>not json</html>").await;

        let err = client(&base).fetch_by_name_or_id("pikachu").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_maps_refused_connection_to_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/api/v2"))
            .fetch_by_name_or_id("pikachu")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (base, request) = serve_once("200 OK", r#"{"count": 1, "results": []}"#).await;
        assert!(client(&base).health_check().await);
        assert_eq!(
            request.await.unwrap(),
            "GET /api/v2/pokemon?limit=1 HTTP/1.1"
        );

        let (base, _request) = serve_once("503 Service Unavailable", "").await;
        assert!(!client(&base).health_check().await);
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Status {
            status: 404,
            query: "missingno".to_string(),
        };
        assert_eq!(err.to_string(), "service returned 404 for 'missingno'");
    }
}
