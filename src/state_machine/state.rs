//! Playback state types

use crate::config::{ChatConfig, DeckConfig, Slide};
use crate::responder::Responder;
use crate::typewriter::{self, Step};
use std::time::Duration;

/// An in-flight typewriter stream. The emission schedule is fixed when the
/// stream starts; `pos` is the next step to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingStream {
    pub steps: Vec<Step>,
    pub pos: usize,
}

impl TypingStream {
    pub fn new(text: &str) -> Self {
        Self {
            steps: typewriter::schedule(text),
            pos: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.steps.len()
    }
}

/// An in-flight count-up animation on the active stat slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountUp {
    /// Index of the slide whose value is animating.
    pub slide: usize,
    pub target: u64,
    /// Exact configured string to snap to at completion, preserving the
    /// author's grouping.
    pub original: String,
}

/// Which surface is in front. The chat input and the player are mutually
/// exclusive; `Loading` covers the gap between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Main interface: welcome section, suggestion cards, chat log.
    Chat,
    /// The loading overlay shown while the summary "prepares".
    Loading,
    /// The slide player, open on `current`.
    Player {
        current: usize,
        countup: Option<CountUp>,
    },
}

/// The single mutable state object. Owned by the runtime; mutated only
/// through `transition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    /// The one permitted typewriter stream. Lives outside `screen` so a
    /// stream keeps running if the player opens over the chat surface.
    pub typing: Option<TypingStream>,
    /// Generation counter for typewriter ticks. A tick whose generation does
    /// not match is stale and ignored.
    pub typing_gen: u64,
    /// Generation counter for player timers (loading, count-up frames,
    /// autoplay). Bumped on every navigation so superseded timers go stale.
    pub nav_gen: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Chat,
            typing: None,
            typing_gen: 0,
            nav_gen: 0,
        }
    }
}

impl AppState {
    /// Whether a typewriter stream is active (the submission gate).
    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    /// The active slide index, if the player is open.
    #[allow(dead_code)] // State query utility
    pub fn current_index(&self) -> Option<usize> {
        match &self.screen {
            Screen::Player { current, .. } => Some(*current),
            _ => None,
        }
    }
}

/// Immutable configuration for the machine: the deck, the rule table, and
/// derived timing knobs.
pub struct AppContext {
    pub deck: DeckConfig,
    pub responder: Responder,
    pub loading_duration: Duration,
    /// `None` when autoplay is disabled.
    pub auto_play_interval: Option<Duration>,
}

impl AppContext {
    pub fn new(deck: DeckConfig, chat: ChatConfig) -> Self {
        let loading_duration = Duration::from_millis(deck.loading_duration_ms);
        let auto_play_interval = match deck.auto_play_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        Self {
            deck,
            responder: Responder::new(chat),
            loading_duration,
            auto_play_interval,
        }
    }

    pub fn total_slides(&self) -> usize {
        self.deck.total_slides()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.deck.slides.get(index)
    }
}
