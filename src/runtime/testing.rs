//! Mock surface and harness for runtime tests
//!
//! The recording surface keeps both a semantic model (messages, nodes,
//! input state) and a flat op log, so tests can assert on outcomes and on
//! ordering.

use super::traits::{SharedSurface, Surface};
use crate::config::{ChatConfig, DeckConfig, ResponseRule};
use crate::player::{self, SlideNode};
use crate::runtime::PlayerRuntime;
use crate::state_machine::{AppContext, Event};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    HideWelcome,
    PushUser(String),
    BeginAssistant,
    AppendChar(char),
    FinishAssistant,
    InputEnabled(bool),
    SetInput(String),
    ClearInput,
    ShowLoading,
    RenderDeck(usize),
    ShowPlayer,
    ShowChat,
    Positions(usize),
    Progress(f64),
    StatDisplay(usize, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct RecordedMessage {
    pub role: Role,
    pub text: String,
}

/// Surface that records everything the runtime does to it.
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    pub welcome_visible: bool,
    pub messages: Vec<RecordedMessage>,
    pub streaming: bool,
    pub input: String,
    pub input_enabled: bool,
    pub screen: &'static str,
    pub nodes: Vec<SlideNode>,
    pub progress: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            welcome_visible: true,
            messages: Vec::new(),
            streaming: false,
            input: String::new(),
            input_enabled: true,
            screen: "chat",
            nodes: Vec::new(),
            progress: 0.0,
        }
    }
}

impl RecordingSurface {
    /// Final text of the last assistant message, if any.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.text.as_str())
    }
}

impl Surface for RecordingSurface {
    fn hide_welcome(&mut self) {
        self.welcome_visible = false;
        self.ops.push(SurfaceOp::HideWelcome);
    }

    fn push_user_message(&mut self, text: &str) {
        self.messages.push(RecordedMessage {
            role: Role::User,
            text: text.to_string(),
        });
        self.ops.push(SurfaceOp::PushUser(text.to_string()));
    }

    fn begin_assistant_message(&mut self) {
        self.messages.push(RecordedMessage {
            role: Role::Assistant,
            text: String::new(),
        });
        self.streaming = true;
        self.ops.push(SurfaceOp::BeginAssistant);
    }

    fn append_assistant_char(&mut self, ch: char) {
        if let Some(message) = self.messages.last_mut() {
            message.text.push(ch);
        }
        self.ops.push(SurfaceOp::AppendChar(ch));
    }

    fn finish_assistant_message(&mut self) {
        self.streaming = false;
        self.ops.push(SurfaceOp::FinishAssistant);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        self.ops.push(SurfaceOp::InputEnabled(enabled));
    }

    fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.ops.push(SurfaceOp::SetInput(text.to_string()));
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.ops.push(SurfaceOp::ClearInput);
    }

    fn show_loading(&mut self) {
        self.screen = "loading";
        self.ops.push(SurfaceOp::ShowLoading);
    }

    fn render_deck(&mut self, nodes: Vec<SlideNode>) {
        self.ops.push(SurfaceOp::RenderDeck(nodes.len()));
        self.nodes = nodes;
    }

    fn show_player(&mut self) {
        self.screen = "player";
        self.ops.push(SurfaceOp::ShowPlayer);
    }

    fn show_chat(&mut self) {
        self.screen = "chat";
        self.ops.push(SurfaceOp::ShowChat);
    }

    fn apply_positions(&mut self, active: usize) {
        player::apply_positions(&mut self.nodes, active);
        self.ops.push(SurfaceOp::Positions(active));
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress = percent;
        self.ops.push(SurfaceOp::Progress(percent));
    }

    fn set_stat_display(&mut self, slide: usize, text: &str) {
        if let Some(node) = self.nodes.get_mut(slide) {
            node.stat_display = Some(text.to_string());
        }
        self.ops
            .push(SurfaceOp::StatDisplay(slide, text.to_string()));
    }
}

// ============================================================================
// Test Harness
// ============================================================================

pub fn test_deck() -> DeckConfig {
    DeckConfig::from_json(
        r#"{
            "team_name": "team",
            "year": "2025",
            "loading_duration_ms": 50,
            "slides": [
                { "type": "intro", "title": "t", "subtitle": "s" },
                { "type": "stat", "icon": "☕", "label": "l", "value": "1,024", "unit": "u" },
                { "type": "outro", "thanks": "thx", "message": "bye" }
            ]
        }"#,
        "testing",
    )
    .expect("test deck is valid")
}

pub fn test_chat() -> ChatConfig {
    ChatConfig {
        rules: vec![ResponseRule {
            keywords: vec!["hello".to_string()],
            response: "hi".to_string(),
        }],
        default_response: "default".to_string(),
        suggestions: vec!["hello there".to_string(), "看总结".to_string()],
        summary_markers: vec!["总结".to_string()],
    }
}

/// A spawned runtime over a recording surface, driven through its event
/// channel.
pub struct TestHarness {
    pub surface: SharedSurface<RecordingSurface>,
    pub event_tx: mpsc::Sender<Event>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestHarness {
    pub fn start(deck: DeckConfig, chat: ChatConfig) -> Self {
        let context = AppContext::new(deck, chat);
        let surface = SharedSurface::new(RecordingSurface::default());
        let (event_tx, event_rx) = mpsc::channel(32);

        let runtime = PlayerRuntime::new(context, surface.clone(), event_rx, event_tx.clone());
        let handle = tokio::spawn(runtime.run());

        Self {
            surface,
            event_tx,
            _handle: handle,
        }
    }

    pub async fn send(&self, event: Event) {
        self.event_tx.send(event).await.expect("runtime alive");
    }

    /// Poll the surface until `pred` holds or `timeout` passes.
    pub async fn wait_until(
        &self,
        timeout: Duration,
        pred: impl Fn(&RecordingSurface) -> bool,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.surface.with(&pred) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Position;

    #[tokio::test]
    async fn chat_round_trip_streams_the_response() {
        let rt = TestHarness::start(test_deck(), test_chat());

        rt.send(Event::PromptSubmitted {
            text: "hello world".to_string(),
        })
        .await;

        // Stream finished: input re-enabled, bubble closed.
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| {
                !s.streaming && s.messages.len() == 2
            })
            .await
        );

        rt.surface.with(|s| {
            assert!(!s.welcome_visible);
            assert_eq!(s.messages[0].role, Role::User);
            assert_eq!(s.messages[0].text, "hello world");
            assert_eq!(s.last_assistant_text(), Some("hi"));
            assert!(s.input_enabled);

            // The gate closed before the first character and reopened after
            // the last.
            let disabled = s
                .ops
                .iter()
                .position(|op| *op == SurfaceOp::InputEnabled(false))
                .unwrap();
            let first_char = s
                .ops
                .iter()
                .position(|op| matches!(op, SurfaceOp::AppendChar(_)))
                .unwrap();
            let enabled = s
                .ops
                .iter()
                .position(|op| *op == SurfaceOp::InputEnabled(true))
                .unwrap();
            assert!(disabled < first_char && first_char < enabled);
        });
    }

    #[tokio::test]
    async fn summary_card_opens_the_player_after_loading() {
        let rt = TestHarness::start(test_deck(), test_chat());

        rt.send(Event::SuggestionChosen {
            prompt: "看总结".to_string(),
        })
        .await;

        assert!(
            rt.wait_until(Duration::from_secs(5), |s| s.screen == "player")
                .await
        );

        rt.surface.with(|s| {
            assert!(s.ops.contains(&SurfaceOp::ShowLoading));
            assert_eq!(s.nodes.len(), 3);
            assert_eq!(s.nodes[0].position, Position::Active);
            assert!((s.progress - 100.0 / 3.0).abs() < 0.01);
        });
    }

    #[tokio::test]
    async fn countup_snaps_to_the_exact_configured_string() {
        let rt = TestHarness::start(test_deck(), test_chat());

        rt.send(Event::SuggestionChosen {
            prompt: "看总结".to_string(),
        })
        .await;
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| s.screen == "player")
                .await
        );

        rt.send(Event::NextRequested).await;

        // The animation starts from zero and ends on the original string,
        // grouping included.
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| {
                s.nodes
                    .get(1)
                    .is_some_and(|n| n.stat_display.as_deref() == Some("1,024"))
            })
            .await
        );

        rt.surface.with(|s| {
            let first_display = s.ops.iter().find_map(|op| match op {
                SurfaceOp::StatDisplay(1, text) => Some(text.clone()),
                _ => None,
            });
            assert_eq!(first_display.as_deref(), Some("0"));
        });
    }

    #[tokio::test]
    async fn navigation_saturates_and_close_restores_chat() {
        let rt = TestHarness::start(test_deck(), test_chat());

        rt.send(Event::SuggestionChosen {
            prompt: "看总结".to_string(),
        })
        .await;
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| s.screen == "player")
                .await
        );

        for _ in 0..5 {
            rt.send(Event::NextRequested).await;
        }
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| {
                s.nodes.last().is_some_and(|n| n.position == Position::Active)
            })
            .await
        );

        rt.surface.with(|s| {
            // Saturated at the last slide; everything before it is prev.
            assert!(s.nodes[..2].iter().all(|n| n.position == Position::Prev));
            assert!((s.progress - 100.0).abs() < f64::EPSILON);
            // The summary card echoed its prompt into the input.
            assert_eq!(s.input, "看总结");
        });

        rt.send(Event::CloseRequested).await;
        assert!(
            rt.wait_until(Duration::from_secs(5), |s| s.screen == "chat")
                .await
        );
        rt.surface.with(|s| assert!(s.input.is_empty()));
    }

    #[tokio::test]
    async fn submissions_are_ignored_while_streaming() {
        let rt = TestHarness::start(test_deck(), test_chat());

        rt.send(Event::PromptSubmitted {
            text: "hello".to_string(),
        })
        .await;
        // Second submission lands during the thinking delay.
        rt.send(Event::PromptSubmitted {
            text: "hello again".to_string(),
        })
        .await;

        assert!(
            rt.wait_until(Duration::from_secs(5), |s| {
                !s.streaming && !s.messages.is_empty()
            })
            .await
        );

        rt.surface.with(|s| {
            let users = s
                .messages
                .iter()
                .filter(|m| m.role == Role::User)
                .count();
            assert_eq!(users, 1);
            assert_eq!(s.messages.len(), 2);
        });
    }
}
