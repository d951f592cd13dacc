use reqwest::{Client, StatusCode};

use crate::error::FetchError;

/// Browser User-Agent; some asset hosts reject requests without one.
pub fn get_user_agent() -> &'static str {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
}

/// Fetch raw image bytes from a remote URL.
///
/// Only a 200 response counts as success; any other status or transport
/// failure yields a `FetchError` and the caller skips the asset. No retries.
pub async fn fetch_image_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .header("User-Agent", get_user_agent())
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

    if response.status() != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        source: e,
    })?;

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a loopback port and return the
    /// URL to fetch it from.
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            stream.write_all(header.as_bytes()).await.unwrap();
            stream.write_all(body).await.unwrap();
        });

        format!("http://{}/asset.png", addr)
    }

    #[tokio::test]
    async fn ok_response_yields_body_bytes() {
        let url = serve_once("200 OK", b"\x89PNG pretend pixels").await;
        let client = Client::new();

        let bytes = fetch_image_bytes(&client, &url).await.unwrap();
        assert_eq!(bytes, b"\x89PNG pretend pixels");
    }

    #[tokio::test]
    async fn non_200_status_is_a_fetch_error() {
        let url = serve_once("404 Not Found", b"").await;
        let client = Client::new();

        let err = fetch_image_bytes(&client, &url).await.unwrap_err();
        match err {
            FetchError::Status { status, url: u } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(u, url);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Bind then drop the listener so the port is closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new();
        let err = fetch_image_bytes(&client, &format!("http://{}/gone.png", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
