//! Authenticated HTTP fetching for https-dwnld
//!
//! `HttpFetcher` is the seam between the download procedure and the network.
//! `ReqwestFetcher` is the one production implementation.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, ClientBuilder, Url};

use crate::core::error::{Error, Result};
use crate::core::stream::{create_http_stream, DownloadStream};

/// An open response: status, declared length and the body stream
///
/// Dropping it releases the underlying connection.
pub struct FetchResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub stream: DownloadStream,
}

/// Capability to perform an authenticated, streamed GET
pub trait HttpFetcher {
    /// Issue a GET with HTTP Basic Authentication
    ///
    /// Any status is returned as-is; only transport failures are errors.
    fn get(
        &self,
        url: &Url,
        user: &str,
        password: &str,
    ) -> impl Future<Output = Result<FetchResponse>> + Send;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Accept self-signed or otherwise unverified TLS certificates
    pub accept_invalid_certs: bool,

    /// Timeout for establishing the connection
    pub connect_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("https-dwnld/{}", env!("HTTPS_DWNLD_VERSION")),
        }
    }
}

/// reqwest-backed fetcher
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &Url, user: &str, password: &str) -> Result<FetchResponse> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .basic_auth(user, Some(password))
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        debug!("status: {status}, content-length: {content_length:?}");

        Ok(FetchResponse {
            status,
            content_length,
            stream: create_http_stream(response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_config_verifies_certificates() {
        let config = FetcherConfig::default();
        assert!(!config.accept_invalid_certs);
        assert!(config.user_agent.starts_with("https-dwnld/"));
    }

    #[test]
    fn test_insecure_client_builds() {
        let config = FetcherConfig {
            accept_invalid_certs: true,
            ..Default::default()
        };
        assert!(ReqwestFetcher::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_get_sends_basic_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/secret.txt"))
            .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"top secret".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = ReqwestFetcher::new(&FetcherConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/secret.txt", mock_server.uri())).unwrap();

        let mut response = fetcher.get(&url, "alice", "secret").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_length, Some(10));

        let mut body = Vec::new();
        response.stream.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"top secret");
    }

    #[tokio::test]
    async fn test_get_returns_non_200_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let fetcher = ReqwestFetcher::new(&FetcherConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/secret.txt", mock_server.uri())).unwrap();

        let response = fetcher.get(&url, "alice", "wrong").await.unwrap();
        assert_eq!(response.status, 401);
    }

    /// Serves one fixed 200 response over TLS with a freshly generated self-signed certificate
    async fn start_self_signed_server() -> u16 {
        use std::sync::Arc;
        use tokio::io::AsyncWriteExt;
        use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
        use tokio_rustls::rustls::{crypto::ring, ServerConfig};
        use tokio_rustls::TlsAcceptor;

        let certified =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
                .unwrap();
        let cert = certified.cert.der().clone();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert], key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                // Handshakes rejected by a verifying client just end here
                let Ok(mut tls) = acceptor.accept(socket).await else {
                    continue;
                };

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let _ = tls
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello")
                    .await;
                let _ = tls.shutdown().await;
            }
        });

        port
    }

    #[tokio::test]
    async fn test_self_signed_certificate_rejected_by_default() {
        let port = start_self_signed_server().await;
        let url = Url::parse(&format!("https://127.0.0.1:{port}/file.txt")).unwrap();

        let fetcher = ReqwestFetcher::new(&FetcherConfig::default()).unwrap();
        let err = match fetcher.get(&url, "u", "p").await {
            Err(e) => e,
            Ok(response) => panic!("expected TLS failure, got status {}", response.status),
        };

        assert_eq!(err.kind(), crate::core::error::ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_self_signed_certificate_accepted_when_insecure() {
        let port = start_self_signed_server().await;
        let url = Url::parse(&format!("https://127.0.0.1:{port}/file.txt")).unwrap();

        let config = FetcherConfig {
            accept_invalid_certs: true,
            ..Default::default()
        };
        let fetcher = ReqwestFetcher::new(&config).unwrap();

        let mut response = fetcher.get(&url, "u", "p").await.unwrap();
        assert_eq!(response.status, 200);

        let mut body = Vec::new();
        response.stream.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop a listener to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = ReqwestFetcher::new(&FetcherConfig::default()).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{port}/file.bin")).unwrap();

        let err = match fetcher.get(&url, "u", "p").await {
            Err(e) => e,
            Ok(_) => panic!("expected connection failure"),
        };
        assert!(matches!(err, Error::NetworkError(_)), "got {err:?}");
    }
}
