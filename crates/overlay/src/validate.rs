//! Cheap precondition checks that run before any download or decoding.

use overlaybot_media::AssetReader;

use crate::{
    Error, Result,
    registry::{OverlayAsset, OverlayRegistry, normalize},
    types::{Attachment, OverlayRequest},
};

/// File name suffixes accepted for the user's image. Matched on the name
/// only; the content is verified when it is decoded.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];

/// A request that passed validation.
#[derive(Debug, Clone, Copy)]
pub struct Approved<'a> {
    pub asset: &'a OverlayAsset,
    /// The first attachment of the message.
    pub attachment: &'a Attachment,
}

impl Approved<'_> {
    pub fn selector(&self) -> &str {
        &self.asset.selector
    }
}

/// Check a request, in order: selector present, selector known, attachment
/// present, overlay asset readable, attachment extension accepted. The first
/// failing check decides the error.
pub fn validate<'a>(
    request: &'a OverlayRequest,
    registry: &'a OverlayRegistry,
    assets: &dyn AssetReader,
) -> Result<Approved<'a>> {
    let selector = request
        .selector
        .as_deref()
        .map(normalize)
        .filter(|selector| !selector.is_empty())
        .ok_or_else(|| Error::MissingSelector {
            options: registry.options(),
        })?;

    let asset = registry
        .resolve(&selector)
        .ok_or_else(|| Error::UnknownSelector {
            selector: selector.clone(),
            options: registry.options(),
        })?;

    let attachment = request.attachments.first().ok_or(Error::NoAttachment)?;

    if !assets.is_readable(&asset.location) {
        return Err(Error::OverlayAssetMissing {
            location: asset.location.clone(),
        });
    }

    if !has_accepted_extension(&attachment.filename) {
        return Err(Error::UnsupportedImageType {
            filename: attachment.filename.clone(),
        });
    }

    Ok(Approved { asset, attachment })
}

pub fn has_accepted_extension(filename: &str) -> bool {
    let filename = filename.to_lowercase();
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|extension| filename.ends_with(extension))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, overlaybot_media::StaticAssetReader, rstest::rstest};

    fn registry() -> OverlayRegistry {
        OverlayRegistry::new([
            ("common", "common_overlay.png"),
            ("epic", "epic_overlay.png"),
            ("rare", "rare_overlay.png"),
        ])
        .unwrap()
    }

    /// Every asset except `rare_overlay.png` is present.
    fn assets() -> StaticAssetReader {
        StaticAssetReader::new()
            .with_asset("common_overlay.png", vec![0])
            .with_asset("epic_overlay.png", vec![0])
    }

    fn request(selector: Option<&str>, files: &[&str]) -> OverlayRequest {
        OverlayRequest::new(
            selector.map(str::to_string),
            files
                .iter()
                .map(|name| Attachment::new(*name, format!("https://cdn.example/{name}")))
                .collect(),
        )
    }

    #[test]
    fn accepts_known_selector_with_image() {
        let registry = registry();
        let req = request(Some("Epic"), &["photo.png", "second.txt"]);

        let approved = validate(&req, &registry, &assets()).unwrap();
        assert_eq!(approved.selector(), "epic");
        assert_eq!(approved.attachment.filename, "photo.png");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn missing_selector_lists_options(#[case] selector: Option<&str>) {
        let registry = registry();
        let err = validate(&request(selector, &["photo.png"]), &registry, &assets()).unwrap_err();
        match err {
            Error::MissingSelector { options } => {
                assert_eq!(options, vec!["common", "epic", "rare"])
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_selector_lists_options() {
        let registry = registry();
        let err = validate(&request(Some("Mythic"), &["photo.png"]), &registry, &assets())
            .unwrap_err();
        match err {
            Error::UnknownSelector { selector, options } => {
                assert_eq!(selector, "mythic");
                assert_eq!(options, vec!["common", "epic", "rare"]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_selector_wins_over_missing_attachment() {
        let registry = registry();
        let err = validate(&request(Some("mythic"), &[]), &registry, &assets()).unwrap_err();
        assert!(matches!(err, Error::UnknownSelector { .. }));
    }

    #[test]
    fn no_attachment() {
        let registry = registry();
        let err = validate(&request(Some("epic"), &[]), &registry, &assets()).unwrap_err();
        assert!(matches!(err, Error::NoAttachment));
    }

    #[test]
    fn unreadable_asset_is_checked_before_extension() {
        let registry = registry();
        let err =
            validate(&request(Some("rare"), &["notes.txt"]), &registry, &assets()).unwrap_err();
        match err {
            Error::OverlayAssetMissing { location } => {
                assert_eq!(location, std::path::Path::new("rare_overlay.png"))
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_first_attachment_is_checked() {
        let registry = registry();
        let err = validate(
            &request(Some("epic"), &["notes.txt", "photo.png"]),
            &registry,
            &assets(),
        )
        .unwrap_err();
        match err {
            Error::UnsupportedImageType { filename } => assert_eq!(filename, "notes.txt"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case("photo.png", true)]
    #[case("PHOTO.PNG", true)]
    #[case("cat.Jpg", true)]
    #[case("cat.jpeg", true)]
    #[case("anim.GIF", true)]
    #[case("archive.png.zip", false)]
    #[case("image.webp", false)]
    #[case("png", false)]
    #[case("", false)]
    fn extension_matching(#[case] filename: &str, #[case] accepted: bool) {
        assert_eq!(has_accepted_extension(filename), accepted);
    }
}
