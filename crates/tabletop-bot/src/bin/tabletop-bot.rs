//! Tabletop Bot replay host
//!
//! Feeds JSON-lines events through the engine and prints the resulting
//! actions as JSON lines, applying membership changes to an in-memory roster.

use std::path::PathBuf;

use clap::Parser;
use tabletop_bot::{Action, BotConfig, BotEvent, Dispatcher, RosterGuild};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "tabletop-bot", version, about = "Replay chat events through the Tabletop engine")]
struct Args {
    /// Bot config file (defaults to $TABLETOP_CONFIG, then ./config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Guild roster: JSON array of {"user": id, "groups": [...]}
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Events as JSON lines (defaults to stdin)
    #[arg(long)]
    events: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabletop_bot=info,tabletop_roster=info,tabletop_throttle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::from_env()?,
    };
    let mut guild: RosterGuild = match &args.roster {
        Some(path) => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        None => RosterGuild::default(),
    };
    let mut bot = Dispatcher::new(config)?;

    let input: Box<dyn AsyncBufRead + Unpin> = match &args.events {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    tracing::info!("Starting Tabletop replay");

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: BotEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed event");
                continue;
            }
        };

        let actions = bot.handle(event, &guild)?;
        let mut stop = false;
        for action in &actions {
            guild.apply(action);
            println!("{}", serde_json::to_string(action)?);
            stop |= matches!(action, Action::Shutdown);
        }
        if stop {
            tracing::info!("Shutdown requested");
            break;
        }
    }

    Ok(())
}
