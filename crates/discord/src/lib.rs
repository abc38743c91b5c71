//! Discord front end for the overlay command.
//!
//! Receives messages through serenity's gateway client, parses the prefix
//! command, hands the request to [`OverlayHandler`] and sends back the reply.
//!
//! [`OverlayHandler`]: overlaybot_overlay::OverlayHandler

pub mod bot;
pub mod command;
pub mod error;
pub mod handler;

pub use {
    bot::run,
    command::{ParsedCommand, parse_command},
    error::{Error, Result},
    handler::DiscordHandler,
};
