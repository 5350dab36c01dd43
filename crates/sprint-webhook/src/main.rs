//! sprint server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and either serves the webhook or runs one delivery
//! command. Scheduling is cron's job; every subcommand does its one thing
//! and exits.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sprint_store_sqlite::SqliteStore;
use sprint_telegram::TelegramClient;
use sprint_webhook::{deliver, seed, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Sprint spaced-practice bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the webhook server (the default).
  Serve,
  /// Start a quiz session and send its first prompt.
  DeliverQuiz,
  /// Deliver the daily spot-the-flaw poll.
  DeliverFlaw,
  /// Nudge the oldest missed problem for re-confirmation.
  DeliverGraveyard,
  /// Send the weekly error fingerprint.
  WeeklyReport,
  /// Import questions and flaw problems from a JSON file.
  Seed {
    /// Path to the seed JSON file.
    file: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SPRINT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  let transport = match &server_cfg.api_root {
    Some(root) => TelegramClient::with_api_root(&server_cfg.telegram_token, root)?,
    None => TelegramClient::new(&server_cfg.telegram_token)?,
  };

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      let state = AppState {
        store:     Arc::new(store),
        transport: Arc::new(transport),
        chat_id:   server_cfg.chat_id,
      };

      let app = sprint_webhook::router(state);
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
    Command::DeliverQuiz => {
      deliver::deliver_quiz(&store, &transport, server_cfg.chat_id, server_cfg.quiz_size)
        .await?;
    }
    Command::DeliverFlaw => {
      deliver::deliver_flaw(&store, &transport, server_cfg.chat_id).await?;
    }
    Command::DeliverGraveyard => {
      deliver::deliver_graveyard(&store, &transport, server_cfg.chat_id).await?;
    }
    Command::WeeklyReport => {
      deliver::weekly_report(&store, &transport, server_cfg.chat_id).await?;
    }
    Command::Seed { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {file:?}"))?;
      let parsed: seed::SeedFile =
        serde_json::from_str(&raw).context("failed to parse seed file")?;
      let (questions, items) = seed::apply(&store, parsed).await?;
      tracing::info!(questions, items, "seed imported");
    }
  }

  Ok(())
}
