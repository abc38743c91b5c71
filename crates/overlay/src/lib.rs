//! The overlay command: selector registry, input validation, attachment
//! download and orchestration of the compositing pipeline.
//!
//! Nothing in this crate knows about a specific chat platform. A front end
//! turns its inbound message into an [`OverlayRequest`], calls
//! [`OverlayHandler::handle`] and delivers the returned [`Reply`].

pub mod error;
pub mod fetch;
pub mod handler;
pub mod registry;
pub mod reply;
pub mod types;
pub mod validate;

pub use {
    error::{Error, RegistryError, Result},
    fetch::{AttachmentFetcher, HttpAttachmentFetcher},
    handler::OverlayHandler,
    registry::{OverlayAsset, OverlayRegistry},
    reply::{CommandSyntax, processing_failed_message},
    types::{Attachment, OverlayRequest, Reply},
    validate::{ACCEPTED_EXTENSIONS, Approved, validate},
};
