use std::{io, path::PathBuf};

use image::ImageError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
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

    #[error("overlay `{}` is not readable: {source}", location.display())]
    AssetUnreadable {
        location: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode the result image: {source}")]
    Encode {
        #[source]
        source: ImageError,
    },
}

impl Error {
    #[must_use]
    pub fn source_decode(source: ImageError) -> Self {
        Self::SourceDecode { source }
    }

    #[must_use]
    pub fn overlay_decode(location: impl Into<PathBuf>, source: ImageError) -> Self {
        Self::OverlayDecode {
            location: location.into(),
            source,
        }
    }

    #[must_use]
    pub fn encode(source: ImageError) -> Self {
        Self::Encode { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
