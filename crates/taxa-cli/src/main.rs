//! `taxa` — terminal UI for the Taxa species catalog.
//!
//! # Usage
//!
//! ```
//! taxa --url http://localhost:8080 --user ada --password secret
//! taxa --config ~/.config/taxa/config.toml
//! ```

mod app;
mod client;
mod form;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result, bail};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use taxa_core::Error;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "taxa", about = "Terminal UI for the Taxa species catalog")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the taxa server (default: http://localhost:8080).
  #[arg(long, env = "TAXA_URL")]
  url: Option<String>,

  /// Account username.
  #[arg(long, env = "TAXA_USER")]
  user: Option<String>,

  /// Account password (plaintext).
  #[arg(long, env = "TAXA_PASSWORD")]
  password: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// Flag wins, then the config file, then `default`.
fn pick(flag: Option<String>, file: &str, default: &str) -> String {
  flag
    .or_else(|| (!file.is_empty()).then(|| file.to_string()))
    .unwrap_or_else(|| default.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url, "http://localhost:8080"),
    username: pick(args.user, &file_cfg.username, ""),
    password: pick(args.password, &file_cfg.password, ""),
  };

  let client = ApiClient::new(api_config)?;

  // No session, no UI.
  let session = match client.session().await {
    Ok(session) => session,
    Err(Error::Unauthenticated) => bail!("sign-in required"),
    Err(e) => return Err(e).context("contacting the taxa server"),
  };

  let mut app = App::new(client, session);
  app.load_me().await;
  app.load_species().await?;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    // Requests run on their own tasks; the UI keeps drawing meanwhile.
    app.apply_completions().await?;
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
