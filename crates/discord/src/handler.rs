//! Discord event handler for serenity.
//!
//! Implements the EventHandler trait to receive messages and answer the
//! overlay command.

use std::sync::Arc;

use {
    overlaybot_overlay::{
        Attachment, OverlayHandler, OverlayRequest, Reply, processing_failed_message,
    },
    serenity::{
        all::{
            Attachment as DiscordAttachment, Context, CreateAttachment, CreateMessage,
            EventHandler, GatewayIntents, Message, Ready,
        },
        async_trait,
    },
    tracing::{debug, info, warn},
};

use crate::command::{ParsedCommand, parse_command};

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    overlay: Arc<OverlayHandler>,
}

impl DiscordHandler {
    pub fn new(overlay: Arc<OverlayHandler>) -> Self {
        Self { overlay }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn send(&self, ctx: &Context, msg: &Message, reply: Reply) {
        let is_image = reply.is_image();
        let mut builder = outgoing(reply);
        if is_image {
            builder = builder.reference_message(msg);
        }

        let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await else {
            return;
        };
        warn!(
            channel_id = %msg.channel_id,
            is_image,
            error = %e,
            "failed to send overlay reply"
        );

        if let Some(fallback) = delivery_fallback(is_image, &e) {
            if let Err(e) = msg.channel_id.send_message(&ctx.http, outgoing(fallback)).await {
                warn!(channel_id = %msg.channel_id, error = %e, "failed to send fallback reply");
            }
        }
    }
}

/// Message body for a reply; the caller attaches the message reference.
fn outgoing(reply: Reply) -> CreateMessage {
    match reply {
        Reply::Image { filename, data } => {
            CreateMessage::new().add_file(CreateAttachment::bytes(data, filename))
        },
        Reply::Text(text) => CreateMessage::new().content(text),
    }
}

/// Text sent in place of an image that could not be delivered, so the user
/// always gets an answer. A failed text reply has no fallback.
fn delivery_fallback(was_image: bool, error: &dyn std::fmt::Display) -> Option<Reply> {
    was_image.then(|| Reply::Text(processing_failed_message(error)))
}

/// Turn the message's attachments into platform-neutral ones, in order.
pub fn to_request(selector: Option<String>, attachments: &[DiscordAttachment]) -> OverlayRequest {
    let attachments = attachments
        .iter()
        .map(|a| Attachment::new(a.filename.clone(), a.url.clone()).with_size(u64::from(a.size)))
        .collect();
    OverlayRequest::new(selector, attachments)
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let registry = self.overlay.registry();
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            options = %registry.options().join(", "),
            usage = %format!("{} <option>", self.overlay.syntax().invocation()),
            "discord bot ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops
        if msg.author.bot {
            return;
        }

        let Some(command) = parse_command(&msg.content, self.overlay.syntax()) else {
            return;
        };

        debug!(
            channel_id = %msg.channel_id,
            user_id = %msg.author.id,
            attachments = msg.attachments.len(),
            ?command,
            "command received"
        );

        let reply = match command {
            ParsedCommand::Help => self.overlay.help(),
            ParsedCommand::Overlay { selector } => {
                if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
                    debug!(error = %e, "failed to send typing indicator");
                }
                let request = to_request(selector, &msg.attachments);
                self.overlay.handle(&request).await
            },
        };

        self.send(&ctx, &msg, reply).await;
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn discord_attachment(id: u64, filename: &str, size: u32) -> DiscordAttachment {
        serde_json::from_value(json!({
            "id": id.to_string(),
            "filename": filename,
            "size": size,
            "url": format!("https://cdn.discordapp.com/attachments/1/{id}/{filename}"),
            "proxy_url": format!("https://media.discordapp.net/attachments/1/{id}/{filename}"),
            "content_type": "image/png",
            "width": 10,
            "height": 10
        }))
        .expect("deserialize attachment")
    }

    #[test]
    fn intents_include_message_content() {
        let intents = DiscordHandler::intents();
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents.contains(GatewayIntents::GUILD_MESSAGES));
        assert!(intents.contains(GatewayIntents::DIRECT_MESSAGES));
    }

    #[test]
    fn request_keeps_attachment_order_and_size() {
        let request = to_request(Some("epic".into()), &[
            discord_attachment(11, "photo.png", 2048),
            discord_attachment(12, "second.jpg", 10),
        ]);

        assert_eq!(request.selector.as_deref(), Some("epic"));
        assert_eq!(request.attachments.len(), 2);
        let first = &request.attachments[0];
        assert_eq!(first.filename, "photo.png");
        assert_eq!(
            first.url,
            "https://cdn.discordapp.com/attachments/1/11/photo.png"
        );
        assert_eq!(first.size, Some(2048));
    }

    #[test]
    fn text_reply_carries_content() {
        let body = serde_json::to_value(outgoing(Reply::Text("hello".into()))).unwrap();
        assert_eq!(body["content"], "hello");
    }

    #[test]
    fn image_reply_has_no_text() {
        let body = serde_json::to_value(outgoing(Reply::Image {
            filename: "image_with_epic_overlay.png".into(),
            data: vec![1, 2, 3],
        }))
        .unwrap();
        assert!(body.get("content").is_none_or(serde_json::Value::is_null));
    }

    #[test]
    fn failed_image_upload_falls_back_to_error_text() {
        let fallback = delivery_fallback(true, &"Payload Too Large").unwrap();
        assert_eq!(
            fallback,
            Reply::Text(
                "An error occurred while processing the image: `Payload Too Large`. Please try again later."
                    .into()
            )
        );
    }

    #[test]
    fn failed_text_reply_has_no_fallback() {
        assert_eq!(delivery_fallback(false, &"Missing Permissions"), None);
    }

    #[test]
    fn request_without_attachments() {
        let request = to_request(None, &[]);
        assert_eq!(request, OverlayRequest::default());
    }
}
