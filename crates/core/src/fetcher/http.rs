//! reqwest-backed fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use tracing::{debug, warn};

use super::config::FetcherConfig;
use super::error::FetchError;
use super::traits::Fetcher;
use super::types::Payload;
use crate::source::SourceRequest;

/// Fetcher that issues one HTTPS GET per request.
///
/// Redirects are not followed: a stale NYT cookie answers with a redirect to
/// the login page, and that must surface as a non-200 status.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Payload, FetchError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(url = %request.url, date = %request.date, "Downloading");

        let response = builder.send().await.map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if status != StatusCode::OK {
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
                && request.has_cookie()
            {
                warn!(
                    url = %request.url,
                    status = status.as_u16(),
                    "Download refused, the session cookie may have expired"
                );
            }
            debug!(url = %request.url, status = status.as_u16(), "Not yet available");
            return Err(FetchError::NotYetAvailable {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::from_reqwest)?;
        let payload = Payload::new(body.to_vec());

        if !payload.looks_like_pdf() {
            warn!(
                url = %request.url,
                bytes = payload.len(),
                cookie = request.has_cookie(),
                "Downloaded body is not a PDF, treating the puzzle as unavailable"
            );
            return Err(FetchError::NotPdf {
                bytes: payload.len(),
            });
        }

        debug!(url = %request.url, bytes = payload.len(), "Download complete");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PublishDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
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

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn request(url: String, headers: Vec<(String, String)>) -> SourceRequest {
        SourceRequest {
            url,
            headers,
            date: PublishDate::from_ymd(2024, 3, 15).unwrap(),
        }
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetcherConfig::default().with_timeout_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_returns_body_and_sends_headers() {
        let (base, server) = serve_once("200 OK", b"%PDF-1.7 body").await;
        let req = request(
            format!("{}/puzzle.pdf", base),
            vec![
                ("Referer".to_string(), "https://example.com/archive".to_string()),
                ("Cookie".to_string(), "NYT-S=abc".to_string()),
            ],
        );

        let payload = fetcher().fetch(&req).await.unwrap();
        assert_eq!(payload.as_bytes(), b"%PDF-1.7 body");

        let raw = server.await.unwrap().to_lowercase();
        assert!(raw.starts_with("get /puzzle.pdf http/1.1"));
        assert!(raw.contains("cookie: nyt-s=abc"));
        assert!(raw.contains("referer: https://example.com/archive"));
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_yet_available() {
        let (base, server) = serve_once("404 Not Found", b"missing").await;
        let err = fetcher()
            .fetch(&request(format!("{}/XWD03162024.pdf", base), vec![]))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::NotYetAvailable { status: 404 });
        assert!(err.is_benign());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_403_is_not_yet_available() {
        let (base, server) = serve_once("403 Forbidden", b"").await;
        let req = request(
            format!("{}/Mar1524.pdf", base),
            vec![("Cookie".to_string(), "stale".to_string())],
        );

        let err = fetcher().fetch(&req).await.unwrap_err();
        assert_eq!(err, FetchError::NotYetAvailable { status: 403 });
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_non_pdf_body_is_not_published() {
        let (base, server) = serve_once("200 OK", b"<html>login</html>").await;
        let err = fetcher()
            .fetch(&request(format!("{}/Mar1524.pdf", base), vec![]))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::NotPdf { bytes: 18 });
        assert!(err.is_benign());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_does_not_follow_login_redirect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // First connection redirects to a login page, a second would serve it.
        let server = tokio::spawn(async move {
            let mut served = 0;
            let responses: [&[u8]; 2] = [
                b"HTTP/1.1 302 Found\r\nLocation: /login\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                b"HTTP/1.1 200 OK\r\nContent-Length: 18\r\nConnection: close\r\n\r\n<html>login</html>",
            ];
            for response in responses {
                let Ok(Ok((mut socket, _))) =
                    tokio::time::timeout(Duration::from_millis(500), listener.accept()).await
                else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                socket.write_all(response).await.unwrap();
                socket.shutdown().await.ok();
                served += 1;
            }
            served
        });

        let req = request(
            format!("http://{}/Mar1524.pdf", addr),
            vec![("Cookie".to_string(), "NYT-S=stale".to_string())],
        );
        let err = fetcher().fetch(&req).await.unwrap_err();

        assert_eq!(err, FetchError::NotYetAvailable { status: 302 });
        assert_eq!(server.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher()
            .fetch(&request(format!("http://{}/a.pdf", addr), vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!err.is_benign());
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without answering.
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(3)).await;
            drop(socket);
        });

        let fetcher = HttpFetcher::new(&FetcherConfig::default().with_timeout_secs(1)).unwrap();
        let err = fetcher
            .fetch(&request(format!("http://{}/a.pdf", addr), vec![]))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout);
        server.abort();
    }
}
