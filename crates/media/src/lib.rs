//! Image pipeline: asset access, decode, overlay resize and placement,
//! alpha compositing and PNG encoding.

pub mod assets;
pub mod cache;
pub mod compose;
pub mod error;
pub mod image_ops;

pub use {
    assets::{AssetReader, FsAssetReader, StaticAssetReader},
    compose::{CompositeResult, Compositor},
    error::{Error, Result},
};
