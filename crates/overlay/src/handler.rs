//! Orchestration of one overlay command: validate, download, composite,
//! reply.

use std::{sync::Arc, time::Instant};

use {
    overlaybot_media::{CompositeResult, Compositor},
    tracing::{debug, info, warn},
};

use crate::{
    Result,
    fetch::AttachmentFetcher,
    registry::OverlayRegistry,
    reply::{CommandSyntax, error_message, help_message},
    types::{OverlayRequest, Reply, output_filename},
    validate::validate,
};

/// Handles overlay commands. Shared between concurrent requests; holds no
/// mutable state of its own.
pub struct OverlayHandler {
    registry: Arc<OverlayRegistry>,
    compositor: Arc<Compositor>,
    fetcher: Arc<dyn AttachmentFetcher>,
    syntax: CommandSyntax,
}

impl OverlayHandler {
    pub fn new(
        registry: Arc<OverlayRegistry>,
        compositor: Arc<Compositor>,
        fetcher: Arc<dyn AttachmentFetcher>,
    ) -> Self {
        Self {
            registry,
            compositor,
            fetcher,
            syntax: CommandSyntax::default(),
        }
    }

    #[must_use]
    pub fn with_syntax(mut self, syntax: CommandSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn syntax(&self) -> &CommandSyntax {
        &self.syntax
    }

    /// Run the command and turn the outcome into exactly one reply.
    pub async fn handle(&self, request: &OverlayRequest) -> Reply {
        match self.process(request).await {
            Ok((filename, result)) => Reply::Image {
                filename,
                data: result.data,
            },
            Err(err) => {
                if err.is_validation() {
                    debug!(error = %err, "overlay request rejected");
                } else {
                    warn!(error = %err, "overlay request failed");
                }
                Reply::Text(error_message(&err, &self.syntax))
            },
        }
    }

    /// Typed variant of [`handle`](Self::handle): returns the reply file name
    /// and the composited image, or the reason the request failed.
    pub async fn process(&self, request: &OverlayRequest) -> Result<(String, CompositeResult)> {
        let started = Instant::now();
        let approved = validate(request, &self.registry, self.compositor.assets().as_ref())?;
        let selector = approved.selector().to_string();
        let location = approved.asset.location.clone();

        let source = self.fetcher.fetch(approved.attachment).await?;
        let fetched_ms = started.elapsed().as_millis() as u64;

        let compositor = Arc::clone(&self.compositor);
        let result =
            tokio::task::spawn_blocking(move || compositor.composite(&source, &location)).await??;

        info!(
            selector = %selector,
            filename = %approved.attachment.filename,
            width = result.width,
            height = result.height,
            bytes = result.data.len(),
            fetch_ms = fetched_ms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "overlay applied"
        );
        Ok((output_filename(&selector), result))
    }

    pub fn help(&self) -> Reply {
        Reply::Text(help_message(&self.registry, &self.syntax))
    }
}
