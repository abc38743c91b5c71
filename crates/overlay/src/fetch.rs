//! Downloading attachment bytes.

use std::time::Duration;

use {
    async_trait::async_trait,
    overlaybot_config::FetchConfig,
    tracing::debug,
};

use crate::{Error, Result, types::Attachment};

/// Capability to load the bytes of a message attachment.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>>;
}

/// Fetches attachments over HTTP(S) with a request timeout and a size cap.
#[derive(Debug, Clone)]
pub struct HttpAttachmentFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpAttachmentFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("overlaybot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::fetch)?;
        Ok(Self::with_client(client, max_bytes))
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs), config.max_bytes)
    }

    pub fn with_client(client: reqwest::Client, max_bytes: u64) -> Self {
        Self { client, max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_bytes {
            return Err(Error::AttachmentTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttachmentFetcher for HttpAttachmentFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        if let Some(size) = attachment.size {
            self.check_size(size)?;
        }

        let mut response = self
            .client
            .get(&attachment.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(Error::fetch)?;

        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }

        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(Error::fetch)? {
            self.check_size((data.len() + chunk.len()) as u64)?;
            data.extend_from_slice(&chunk);
        }

        debug!(
            filename = %attachment.filename,
            bytes = data.len(),
            "downloaded attachment"
        );
        Ok(data)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(max_bytes: u64) -> HttpAttachmentFetcher {
        HttpAttachmentFetcher::new(Duration::from_secs(5), max_bytes).unwrap()
    }

    #[tokio::test]
    async fn downloads_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/attachments/photo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(b"\x89PNG fake bytes")
            .create_async()
            .await;

        let attachment =
            Attachment::new("photo.png", format!("{}/attachments/photo.png", server.url()));
        let data = fetcher(1024).fetch(&attachment).await.unwrap();

        assert_eq!(data, b"\x89PNG fake bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_a_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.png")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let attachment = Attachment::new("gone.png", format!("{}/gone.png", server.url()));
        let err = fetcher(1024).fetch(&attachment).await.unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }), "{err:?}");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/big.png")
            .with_status(200)
            .with_body(vec![0u8; 64])
            .create_async()
            .await;

        let attachment = Attachment::new("big.png", format!("{}/big.png", server.url()));
        let err = fetcher(16).fetch(&attachment).await.unwrap_err();

        assert!(
            matches!(err, Error::AttachmentTooLarge { limit: 16, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn announced_size_is_checked_before_download() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/big.png")
            .with_status(200)
            .with_body("x")
            .expect(0)
            .create_async()
            .await;

        let attachment =
            Attachment::new("big.png", format!("{}/big.png", server.url())).with_size(1_000);
        let err = fetcher(16).fetch(&attachment).await.unwrap_err();

        assert!(matches!(err, Error::AttachmentTooLarge {
            size: 1_000,
            limit: 16
        }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let attachment = Attachment::new("photo.png", "http://127.0.0.1:1/photo.png");
        let err = fetcher(1024).fetch(&attachment).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }

    #[test]
    fn from_config_uses_limits() {
        let config = FetchConfig {
            timeout_secs: 3,
            max_bytes: 99,
        };
        assert_eq!(
            HttpAttachmentFetcher::from_config(&config)
                .unwrap()
                .max_bytes(),
            99
        );
    }
}
