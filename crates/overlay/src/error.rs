use std::{error::Error as StdError, path::PathBuf};

use {image::ImageError, overlaybot_media as media};

/// Request-scoped failures of the overlay command.
///
/// Every variant is turned into a single text reply by the handler; none of
/// them is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no overlay option given")]
    MissingSelector { options: Vec<String> },

    #[error("unknown overlay option `{selector}`")]
    UnknownSelector {
        selector: String,
        options: Vec<String>,
    },

    #[error("the message has no attachment")]
    NoAttachment,

    #[error("overlay file `{}` is not readable", location.display())]
    OverlayAssetMissing { location: PathBuf },

    #[error("`{filename}` is not a supported image type")]
    UnsupportedImageType { filename: String },

    #[error("failed to download the attachment: {source}")]
    Fetch {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("the attachment is {size} bytes, the limit is {limit} bytes")]
    AttachmentTooLarge { size: u64, limit: u64 },

    #[error("could not decode the attached image: {source}")]
    SourceDecode {
        #[source]
        source: ImageError,
    },

    #[error("could not decode overlay `{}`: {source}", location.display())]
    OverlayDecode {
        location: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("could not encode the result image: {source}")]
    Encode {
        #[source]
        source: ImageError,
    },

    #[error("image worker failed: {message}")]
    Worker { message: String },
}

impl Error {
    #[must_use]
    pub fn fetch(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Fetch {
            source: Box::new(source),
        }
    }

    /// Whether the request was rejected before any download or decoding.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingSelector { .. }
                | Self::UnknownSelector { .. }
                | Self::NoAttachment
                | Self::OverlayAssetMissing { .. }
                | Self::UnsupportedImageType { .. }
        )
    }
}

impl From<media::Error> for Error {
    fn from(err: media::Error) -> Self {
        match err {
            media::Error::SourceDecode { source } => Self::SourceDecode { source },
            media::Error::OverlayDecode { location, source } => {
                Self::OverlayDecode { location, source }
            },
            media::Error::AssetUnreadable { location, .. } => Self::OverlayAssetMissing { location },
            media::Error::Encode { source } => Self::Encode { source },
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Problems building the selector table at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no overlays are configured")]
    Empty,

    #[error("overlay selector must not be empty")]
    EmptySelector,

    #[error("overlay selector `{selector}` is configured more than once (selectors ignore case)")]
    DuplicateSelector { selector: String },
}
