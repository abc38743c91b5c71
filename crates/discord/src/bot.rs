use std::sync::Arc;

use {
    secrecy::{ExposeSecret, Secret},
    serenity::Client,
    tracing::{info, warn},
};

use crate::{Result, handler::DiscordHandler};

/// Connect to the Discord gateway and process messages until the connection
/// ends or the process receives Ctrl-C.
pub async fn run(token: &Secret<String>, handler: DiscordHandler) -> Result<()> {
    let mut client = Client::builder(token.expose_secret(), DiscordHandler::intents())
        .event_handler(handler)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested, closing discord shards");
                shard_manager.shutdown_all().await;
            },
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    info!("connecting to discord");
    client.start().await?;
    info!("discord client stopped");
    Ok(())
}
