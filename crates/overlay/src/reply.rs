//! User-facing wording for every outcome of the overlay command.

use crate::{Error, registry::OverlayRegistry, validate::ACCEPTED_EXTENSIONS};

/// How the command is typed in chat, used to build usage hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSyntax {
    pub prefix: String,
    pub name: String,
}

impl CommandSyntax {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// `!overlay`
    pub fn invocation(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    pub fn help_invocation(&self) -> String {
        format!("{}help", self.prefix)
    }
}

impl Default for CommandSyntax {
    fn default() -> Self {
        Self::new("!", "overlay")
    }
}

/// Message sent back when a request fails.
pub fn error_message(err: &Error, syntax: &CommandSyntax) -> String {
    match err {
        Error::MissingSelector { options } => {
            let example = options.first().map(String::as_str).unwrap_or("<option>");
            format!(
                "Please specify an overlay option. Available options are: `{}`. For example: `{} {example}`",
                options.join(", "),
                syntax.invocation(),
            )
        },
        Error::UnknownSelector { options, .. } => format!(
            "Invalid overlay option. Available options are: `{}`.",
            options.join(", ")
        ),
        Error::NoAttachment => {
            "Please attach an image to your message to apply the overlay.".to_string()
        },
        Error::OverlayAssetMissing { location } => format!(
            "Oops! The overlay file `{}` wasn't found on the bot's server.",
            location.display()
        ),
        Error::UnsupportedImageType { .. } => format!(
            "The attached file is not a compatible image ({}).",
            accepted_extensions_label()
        ),
        Error::Fetch { .. }
        | Error::AttachmentTooLarge { .. }
        | Error::SourceDecode { .. }
        | Error::OverlayDecode { .. }
        | Error::Encode { .. }
        | Error::Worker { .. } => processing_failed_message(err),
    }
}

/// Generic failure text embedding `detail`; also used when delivering the
/// finished image fails.
pub fn processing_failed_message(detail: impl std::fmt::Display) -> String {
    format!("An error occurred while processing the image: `{detail}`. Please try again later.")
}

/// Usage text for the help command.
pub fn help_message(registry: &OverlayRegistry, syntax: &CommandSyntax) -> String {
    format!(
        "Applies an overlay to your attached image.\nUsage: `{} <option>` (attach an image)\nAvailable options: `{}`\nAccepted images: {}",
        syntax.invocation(),
        registry.options().join(", "),
        accepted_extensions_label(),
    )
}

/// `PNG, JPG, JPEG, GIF`
fn accepted_extensions_label() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}
