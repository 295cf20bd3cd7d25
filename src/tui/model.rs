//! Shared UI model
//!
//! The runtime mutates this through the `Surface` trait; the draw loop reads
//! it every frame. All fields are plain state, no terminal handles.

use crate::config::{ChatConfig, DeckConfig};
use crate::player::{self, SlideNode};
use crate::runtime::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Which surface the front-end shows. Chat and player are mutually
/// exclusive; loading bridges them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    Chat,
    Loading,
    Player,
}

pub struct UiModel {
    // Ambient deck constants shown on the intro slide and the welcome header.
    pub team_name: String,
    pub year: String,

    // Chat surface
    pub welcome_visible: bool,
    pub suggestions: Vec<String>,
    pub selected_suggestion: usize,
    pub messages: Vec<ChatMessage>,
    /// Cursor marker shown on the last assistant message while true.
    pub streaming: bool,
    pub input: String,
    pub input_enabled: bool,

    // Player surface
    pub screen: ScreenView,
    pub nodes: Vec<SlideNode>,
    pub progress: f64,

    /// Last drawn terminal width, for the mouse click zones.
    pub viewport_width: u16,
}

impl UiModel {
    pub fn new(deck: &DeckConfig, chat: &ChatConfig) -> Self {
        Self {
            team_name: deck.team_name.clone(),
            year: deck.year.clone(),
            welcome_visible: true,
            suggestions: chat.suggestions.clone(),
            selected_suggestion: 0,
            messages: Vec::new(),
            streaming: false,
            input: String::new(),
            input_enabled: true,
            screen: ScreenView::Chat,
            nodes: Vec::new(),
            progress: 0.0,
            viewport_width: 0,
        }
    }

    /// The currently active slide node, if the player is showing one.
    pub fn active_node(&self) -> Option<&SlideNode> {
        self.nodes
            .iter()
            .find(|n| n.position == player::Position::Active)
    }

    pub fn next_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected_suggestion = (self.selected_suggestion + 1) % self.suggestions.len();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected_suggestion = self
                .selected_suggestion
                .checked_sub(1)
                .unwrap_or(self.suggestions.len() - 1);
        }
    }
}

impl Surface for UiModel {
    fn hide_welcome(&mut self) {
        self.welcome_visible = false;
    }

    fn push_user_message(&mut self, text: &str) {
        self.messages.push(ChatMessage::new(Role::User, text));
    }

    fn begin_assistant_message(&mut self) {
        self.messages.push(ChatMessage::new(Role::Assistant, ""));
        self.streaming = true;
    }

    fn append_assistant_char(&mut self, ch: char) {
        if let Some(message) = self.messages.last_mut() {
            message.text.push(ch);
        }
    }

    fn finish_assistant_message(&mut self) {
        self.streaming = false;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn show_loading(&mut self) {
        self.screen = ScreenView::Loading;
    }

    fn render_deck(&mut self, nodes: Vec<SlideNode>) {
        self.nodes = nodes;
    }

    fn show_player(&mut self) {
        self.screen = ScreenView::Player;
    }

    fn show_chat(&mut self) {
        self.screen = ScreenView::Chat;
    }

    fn apply_positions(&mut self, active: usize) {
        player::apply_positions(&mut self.nodes, active);
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress = percent;
    }

    fn set_stat_display(&mut self, slide: usize, text: &str) {
        if let Some(node) = self.nodes.get_mut(slide) {
            node.stat_display = Some(text.to_string());
        }
    }
}
