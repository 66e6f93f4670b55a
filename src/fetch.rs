//! HTTP retrieval of feed bodies

use crate::error::{Error, Result};
use futures::TryStreamExt;
use std::pin::Pin;
use tokio::io::AsyncBufRead;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Streaming reader over a feed's response body
///
/// Dropping it releases the underlying connection.
pub type FeedReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// User agent sent with every feed request
const USER_AGENT: &str = concat!("tldsgen/", env!("CARGO_PKG_VERSION"));

/// Retrieves feed bodies over HTTP
///
/// Uses the transport's default timeouts and performs exactly one request
/// per call. Cloning is cheap and shares the connection pool.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with a fresh HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Transport {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue a GET for `url` and return its body as a buffered reader
    ///
    /// Any status of 400 or above fails the same way a transport error does;
    /// an error page is never treated as feed content. The body is not read
    /// here: failures while reading it surface from the returned reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails and
    /// [`Error::HttpStatus`] for client or server error responses.
    pub async fn fetch(&self, url: &str) -> Result<FeedReader> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport {
                url: url.to_string(),
                reason: describe(&e),
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(
            url,
            status = status.as_u16(),
            content_length = ?response.content_length(),
            "feed response received"
        );

        let body = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(StreamReader::new(body)))
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn read_all(mut reader: FeedReader) -> String {
        let mut body = String::new();
        reader.read_to_string(&mut body).await.unwrap();
        body
    }

    #[tokio::test]
    async fn fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tlds.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("COM\nNET\n"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let reader = fetcher
            .fetch(&format!("{}/tlds.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(read_all(reader).await, "COM\nNET\n");
    }

    #[tokio::test]
    async fn fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let reader = fetcher.fetch(&server.uri()).await.unwrap();
        assert_eq!(read_all(reader).await, "");
    }

    #[tokio::test]
    async fn client_and_server_errors_fail_with_status() {
        for status in [400u16, 403, 404, 500, 503] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_string("<html>oops</html>"))
                .mount(&server)
                .await;

            let url = format!("{}/feed", server.uri());
            match Fetcher::new().unwrap().fetch(&url).await {
                Err(Error::HttpStatus { url: failed, status: got }) => {
                    assert_eq!(failed, url);
                    assert_eq!(got, status);
                }
                Err(other) => panic!("expected HttpStatus for {status}, got {other:?}"),
                Ok(_) => panic!("expected HttpStatus for {status}, got a body"),
            }
        }
    }

    #[tokio::test]
    async fn non_error_status_below_400_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(203).set_body_string("ORG\n"))
            .mount(&server)
            .await;

        let reader = Fetcher::new().unwrap().fetch(&server.uri()).await.unwrap();
        assert_eq!(read_all(reader).await, "ORG\n");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Bind then drop a listener so the port is very likely closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/tlds.txt", port);

        match Fetcher::new().unwrap().fetch(&url).await {
            Err(Error::Transport { url: failed, reason }) => {
                assert_eq!(failed, url);
                assert!(!reason.is_empty());
            }
            Err(other) => panic!("expected Transport, got {other:?}"),
            Ok(_) => panic!("expected Transport, got a body"),
        }
    }
}
