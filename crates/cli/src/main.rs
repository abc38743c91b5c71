mod check_commands;
mod render_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    overlaybot_config::{OverlayBotConfig, Severity},
    overlaybot_discord::DiscordHandler,
    overlaybot_media::{Compositor, FsAssetReader},
    overlaybot_overlay::{
        AttachmentFetcher, CommandSyntax, HttpAttachmentFetcher, OverlayHandler, OverlayRegistry,
    },
    secrecy::Secret,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "overlaybot", about = "Overlaybot: frame uploaded images with rarity overlays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of overlaybot.{toml,yaml,json}).
    #[arg(long, global = true, env = "OVERLAYBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Discord bot token (overrides the config file value).
    #[arg(long, global = true, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and answer overlay commands (default).
    Run,
    /// Validate the configuration and overlay assets.
    Check,
    /// List the configured overlays.
    List,
    /// Apply an overlay to a local image file.
    Render {
        /// Overlay selector, e.g. `epic`.
        #[arg(short, long)]
        overlay: String,
        /// Source image (.png, .jpg, .jpeg or .gif).
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (defaults to `image_with_<overlay>_overlay.png`).
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Where the config comes from: `--config` (or `OVERLAYBOT_CONFIG`) when
/// given, otherwise the first discovered file.
fn config_source(cli: &Cli) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(overlaybot_config::find_config_file)
}

/// Load the config and apply command-line overrides.
///
/// An explicit `--config` must load; discovered files fall back to defaults.
fn load_config(cli: &Cli) -> anyhow::Result<OverlayBotConfig> {
    let mut config = match cli.config {
        Some(ref path) => overlaybot_config::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => overlaybot_config::discover_and_load(),
    };

    if let Some(ref token) = cli.token {
        config.discord.token = Some(Secret::new(token.clone()));
    }

    Ok(config)
}

/// Assemble the overlay command from config, with the given attachment source.
fn build_handler(
    config: &OverlayBotConfig,
    fetcher: Arc<dyn AttachmentFetcher>,
) -> anyhow::Result<OverlayHandler> {
    let registry = OverlayRegistry::from_config(&config.overlays)
        .context("invalid overlay table")?;

    let mut compositor = Compositor::new(Arc::new(FsAssetReader));
    if config.overlays.cache_resized {
        compositor = compositor.with_overlay_cache();
    }

    let syntax = CommandSyntax::new(
        config.discord.command_prefix.clone(),
        config.discord.command_name.clone(),
    );

    Ok(
        OverlayHandler::new(Arc::new(registry), Arc::new(compositor), fetcher)
            .with_syntax(syntax),
    )
}

async fn run_bot(config: OverlayBotConfig) -> anyhow::Result<()> {
    let report = overlaybot_config::validate(&config, true);
    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Error => tracing::error!(path = %diagnostic.path, "{}", diagnostic.message),
            Severity::Warning => warn!(path = %diagnostic.path, "{}", diagnostic.message),
        }
    }
    if report.has_errors() {
        anyhow::bail!(
            "configuration has {} error(s), run `overlaybot check` for details",
            report.count(Severity::Error)
        );
    }

    let token = config
        .discord
        .token
        .clone()
        .context("no bot token configured (set DISCORD_BOT_TOKEN)")?;

    let fetcher = HttpAttachmentFetcher::from_config(&config.fetch)?;
    let handler = build_handler(&config, Arc::new(fetcher))?;
    info!(
        overlays = handler.registry().len(),
        cache_resized = config.overlays.cache_resized,
        "overlay handler ready"
    );

    overlaybot_discord::run(&token, DiscordHandler::new(Arc::new(handler))).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "overlaybot starting");

    let config = load_config(&cli)?;
    let source = config_source(&cli);

    match cli.command {
        // Default: run the bot when no subcommand is provided
        None | Some(Commands::Run) => run_bot(config).await,
        Some(Commands::Check) => check_commands::handle_check(&config, source.as_deref()),
        Some(Commands::List) => check_commands::handle_list(&config),
        Some(Commands::Render {
            overlay,
            input,
            output,
        }) => render_commands::handle_render(&config, &overlay, &input, output).await,
    }
}
