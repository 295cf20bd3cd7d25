//! Content model: deck configuration and the chat rule table.
//!
//! Both documents are loaded once at startup and treated as immutable
//! afterwards. Unknown slide types are a deserialization error, not a
//! silently empty render.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration in {origin}: {reason}")]
    Validation { origin: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Deck-level settings plus the ordered slide sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Shown on the intro slide under the year.
    pub team_name: String,
    pub year: String,
    /// How long the loading overlay stays up before the player opens, in
    /// milliseconds.
    #[serde(default = "default_loading_duration_ms")]
    pub loading_duration_ms: u64,
    /// Autoplay period in milliseconds; `0` disables autoplay.
    #[serde(default)]
    pub auto_play_interval_ms: u64,
    pub slides: Vec<Slide>,
}

fn default_loading_duration_ms() -> u64 {
    1500
}

impl DeckConfig {
    /// Parse and validate a deck document. `origin` names the source for
    /// error messages (a path or "embedded").
    pub fn from_json(json: &str, origin: &str) -> ConfigResult<Self> {
        let deck: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        deck.validate(origin)?;
        Ok(deck)
    }

    /// Load a deck document from a file on disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, &path.display().to_string())
    }

    fn validate(&self, origin: &str) -> ConfigResult<()> {
        if self.slides.is_empty() {
            return Err(ConfigError::Validation {
                origin: origin.to_string(),
                reason: "deck has no slides".to_string(),
            });
        }
        Ok(())
    }

    pub fn total_slides(&self) -> usize {
        self.slides.len()
    }
}

/// One unit of the summary presentation. The set of variants is closed;
/// renderers match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Slide {
    /// Opening page: the year and team name, with a subtitle.
    Intro { title: String, subtitle: String },
    /// A single statistic with a count-up animation on entry.
    Stat {
        icon: String,
        label: String,
        /// Kept as a string so grouping separators ("23,000,000") survive
        /// round-trips; parsed only for the animation.
        value: String,
        unit: String,
        #[serde(default)]
        comment: Option<String>,
    },
    /// A photo with a caption. `src` is resolved lazily by the surface.
    Photo { src: String, caption: String },
    /// Author-controlled rich text (markdown). Rendered, not escaped.
    Text { content: String },
    /// Closing page with a replay affordance.
    Outro { thanks: String, message: String },
}

impl Slide {
    /// Stable tag name, used for position-class labelling and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Slide::Intro { .. } => "intro",
            Slide::Stat { .. } => "stat",
            Slide::Photo { .. } => "photo",
            Slide::Text { .. } => "text",
            Slide::Outro { .. } => "outro",
        }
    }
}

/// A keyword-set-to-response mapping. Rules are evaluated in declaration
/// order; the first rule whose every keyword appears in the input wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRule {
    pub keywords: Vec<String>,
    pub response: String,
}

/// The chat side of the content model: response rules, the fallback reply,
/// the suggestion cards, and the markers that route a card to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub rules: Vec<ResponseRule>,
    pub default_response: String,
    pub suggestions: Vec<String>,
    pub summary_markers: Vec<String>,
}

impl ChatConfig {
    pub fn from_json(json: &str, origin: &str) -> ConfigResult<Self> {
        let chat: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        chat.validate(origin)?;
        Ok(chat)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, &path.display().to_string())
    }

    fn validate(&self, origin: &str) -> ConfigResult<()> {
        if let Some(pos) = self.rules.iter().position(|r| r.keywords.is_empty()) {
            return Err(ConfigError::Validation {
                origin: origin.to_string(),
                reason: format!("rule {pos} has no keywords"),
            });
        }
        // The player is only reachable through a summary-marked suggestion.
        let reachable = self
            .suggestions
            .iter()
            .any(|s| self.summary_markers.iter().any(|m| s.contains(m.as_str())));
        if !reachable {
            return Err(ConfigError::Validation {
                origin: origin.to_string(),
                reason: "no suggestion matches a summary marker".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a preset prompt should open the summary player instead of
    /// going through the chat path.
    pub fn is_summary_prompt(&self, prompt: &str) -> bool {
        self.summary_markers.iter().any(|m| prompt.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_deck_json() -> &'static str {
        r#"{
            "team_name": "team",
            "year": "2025",
            "slides": [
                { "type": "intro", "title": "t", "subtitle": "s" },
                { "type": "outro", "thanks": "thx", "message": "bye" }
            ]
        }"#
    }

    #[test]
    fn parses_minimal_deck_with_defaults() {
        let deck = DeckConfig::from_json(minimal_deck_json(), "test").unwrap();
        assert_eq!(deck.total_slides(), 2);
        assert_eq!(deck.loading_duration_ms, 1500);
        assert_eq!(deck.auto_play_interval_ms, 0);
    }

    #[test]
    fn unknown_slide_type_is_a_parse_error() {
        let json = r#"{
            "team_name": "team",
            "year": "2025",
            "slides": [ { "type": "video", "src": "x.mp4" } ]
        }"#;
        let err = DeckConfig::from_json(json, "test").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_deck_is_rejected() {
        let json = r#"{ "team_name": "t", "year": "2025", "slides": [] }"#;
        let err = DeckConfig::from_json(json, "test").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn stat_comment_is_optional() {
        let json = r#"{
            "team_name": "t",
            "year": "2025",
            "slides": [
                { "type": "stat", "icon": "☕", "label": "l", "value": "1,024", "unit": "u" }
            ]
        }"#;
        let deck = DeckConfig::from_json(json, "test").unwrap();
        assert!(matches!(
            &deck.slides[0],
            Slide::Stat { comment: None, .. }
        ));
    }

    #[test]
    fn loads_deck_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal_deck_json().as_bytes()).unwrap();
        let deck = DeckConfig::load(file.path()).unwrap();
        assert_eq!(deck.year, "2025");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DeckConfig::load(Path::new("/nonexistent/deck.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn chat_config_requires_keywords_on_every_rule() {
        let json = r#"{
            "rules": [ { "keywords": [], "response": "r" } ],
            "default_response": "d",
            "suggestions": ["看总结"],
            "summary_markers": ["总结"]
        }"#;
        let err = ChatConfig::from_json(json, "test").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn chat_config_requires_a_reachable_player() {
        let json = r#"{
            "rules": [],
            "default_response": "d",
            "suggestions": ["hello"],
            "summary_markers": ["总结"]
        }"#;
        let err = ChatConfig::from_json(json, "test").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn summary_prompt_routing_checks_all_markers() {
        let json = r#"{
            "rules": [],
            "default_response": "d",
            "suggestions": ["打开相册"],
            "summary_markers": ["总结", "相册"]
        }"#;
        let chat = ChatConfig::from_json(json, "test").unwrap();
        assert!(chat.is_summary_prompt("打开相册"));
        assert!(chat.is_summary_prompt("为我生成一份小组2025总结"));
        assert!(!chat.is_summary_prompt("今天天气怎么样"));
    }

    #[test]
    fn slide_kind_names_are_stable() {
        let deck = DeckConfig::from_json(minimal_deck_json(), "test").unwrap();
        assert_eq!(deck.slides[0].kind(), "intro");
        assert_eq!(deck.slides[1].kind(), "outro");
    }
}
