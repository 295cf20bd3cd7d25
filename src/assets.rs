//! Embedded default content for production builds.
//!
//! The default deck and chat tables ship inside the binary; either can be
//! replaced with an on-disk JSON file via the `REWIND_DECK` / `REWIND_CHAT`
//! environment variables.

use crate::config::{ChatConfig, ConfigError, ConfigResult, DeckConfig};
use rust_embed::Embed;
use std::path::Path;

#[derive(Embed)]
#[folder = "assets"]
struct Assets;

/// Env var naming an on-disk deck document that replaces the embedded one.
pub const DECK_ENV: &str = "REWIND_DECK";
/// Env var naming an on-disk chat document that replaces the embedded one.
pub const CHAT_ENV: &str = "REWIND_CHAT";

fn embedded(name: &str) -> ConfigResult<String> {
    let file = Assets::get(name).ok_or_else(|| ConfigError::Validation {
        origin: format!("embedded:{name}"),
        reason: "asset not embedded in this build".to_string(),
    })?;
    String::from_utf8(file.data.to_vec()).map_err(|_| ConfigError::Validation {
        origin: format!("embedded:{name}"),
        reason: "asset is not valid UTF-8".to_string(),
    })
}

/// Load the deck, preferring `override_path` when given.
pub fn load_deck(override_path: Option<&Path>) -> ConfigResult<DeckConfig> {
    match override_path {
        Some(path) => DeckConfig::load(path),
        None => DeckConfig::from_json(&embedded("deck.json")?, "embedded:deck.json"),
    }
}

/// Load the chat table, preferring `override_path` when given.
pub fn load_chat(override_path: Option<&Path>) -> ConfigResult<ChatConfig> {
    match override_path {
        Some(path) => ChatConfig::load(path),
        None => ChatConfig::from_json(&embedded("chat.json")?, "embedded:chat.json"),
    }
}
