//! rewind - a year-end summary player behind a chat-like landing surface
//!
//! A Rust terminal app implementing a playback state machine: keyword-matched
//! chat responses with typewriter streaming, and a configurable slide deck
//! with count-up animations and keyboard/mouse navigation.

mod assets;
mod config;
mod player;
mod responder;
mod runtime;
mod state_machine;
mod tui;
mod typewriter;

use runtime::SharedSurface;
use state_machine::AppContext;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tui::model::UiModel;

const LOG_ENV: &str = "REWIND_LOG";
const DEFAULT_LOG_PATH: &str = "rewind.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Configuration: embedded defaults, overridable per document.
    let deck_override = std::env::var_os(assets::DECK_ENV).map(PathBuf::from);
    let chat_override = std::env::var_os(assets::CHAT_ENV).map(PathBuf::from);

    let deck = assets::load_deck(deck_override.as_deref())?;
    let chat = assets::load_chat(chat_override.as_deref())?;

    tracing::info!(
        slides = deck.total_slides(),
        rules = chat.rules.len(),
        year = %deck.year,
        "Content loaded"
    );

    let model = SharedSurface::new(UiModel::new(&deck, &chat));
    let context = AppContext::new(deck, chat);

    tui::run(context, model).await?;

    Ok(())
}

/// Logs go to a file so the alternate screen stays clean.
fn init_logging() -> std::io::Result<()> {
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rewind=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
