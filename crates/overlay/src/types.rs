/// A file attached to the triggering message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    /// Where the attachment bytes can be fetched from.
    pub url: String,
    /// Size announced by the platform, if any.
    pub size: Option<u64>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            size: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// One invocation of the overlay command, independent of the chat platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayRequest {
    /// The raw selector argument, as typed by the user.
    pub selector: Option<String>,
    /// All attachments of the message, in order. Only the first is processed.
    pub attachments: Vec<Attachment>,
}

impl OverlayRequest {
    pub fn new(selector: Option<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            selector,
            attachments,
        }
    }
}

/// What to send back for a request: exactly one file or exactly one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Image { filename: String, data: Vec<u8> },
    Text(String),
}

impl Reply {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    /// Text content, if this is a text reply.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image { .. } => None,
        }
    }
}

/// File name of a successful reply.
pub fn output_filename(selector: &str) -> String {
    format!("image_with_{selector}_overlay.png")
}
