//! `overlaybot render`: run the overlay pipeline against a local file.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    overlaybot_config::OverlayBotConfig,
    overlaybot_overlay::{Attachment, AttachmentFetcher, Error, OverlayRequest, Reply},
    tracing::info,
};

/// Reads "attachments" from the local filesystem; the attachment URL is the
/// file path.
pub struct LocalFileFetcher {
    max_bytes: u64,
}

impl LocalFileFetcher {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl AttachmentFetcher for LocalFileFetcher {
    async fn fetch(&self, attachment: &Attachment) -> overlaybot_overlay::Result<Vec<u8>> {
        let data = tokio::fs::read(&attachment.url).await.map_err(Error::fetch)?;
        let size = data.len() as u64;
        if size > self.max_bytes {
            return Err(Error::AttachmentTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(data)
    }
}

fn local_attachment(input: &Path) -> Attachment {
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Attachment::new(filename, input.to_string_lossy().into_owned())
}

pub async fn handle_render(
    config: &OverlayBotConfig,
    overlay: &str,
    input: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let fetcher = LocalFileFetcher::new(config.fetch.max_bytes);
    let handler = crate::build_handler(config, Arc::new(fetcher))?;

    let request = OverlayRequest::new(Some(overlay.to_string()), vec![local_attachment(input)]);

    match handler.handle(&request).await {
        Reply::Image { filename, data } => {
            let output = output.unwrap_or_else(|| PathBuf::from(filename));
            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(path = %output.display(), bytes = data.len(), "overlay written");
            println!("{}", output.display());
            Ok(())
        },
        Reply::Text(message) => anyhow::bail!(message),
    }
}
