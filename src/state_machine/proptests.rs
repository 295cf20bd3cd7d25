//! Property-based tests for the playback state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::{CountUp, TypingStream};
use super::*;
use crate::config::{ChatConfig, DeckConfig, ResponseRule};
use proptest::prelude::*;
use std::time::Duration;

const TOTAL_SLIDES: usize = 4;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> AppContext {
    let deck = DeckConfig::from_json(
        r#"{
            "team_name": "team",
            "year": "2025",
            "loading_duration_ms": 100,
            "slides": [
                { "type": "intro", "title": "t", "subtitle": "s" },
                { "type": "stat", "icon": "☕", "label": "l", "value": "1,024", "unit": "u" },
                { "type": "photo", "src": "a.jpg", "caption": "c" },
                { "type": "outro", "thanks": "thx", "message": "bye" }
            ]
        }"#,
        "proptest",
    )
    .unwrap();
    let chat = ChatConfig {
        rules: vec![ResponseRule {
            keywords: vec!["hello".to_string()],
            response: "hi\nthere".to_string(),
        }],
        default_response: "default".to_string(),
        suggestions: vec!["看总结".to_string()],
        summary_markers: vec!["总结".to_string()],
    };
    AppContext::new(deck, chat)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_typing() -> impl Strategy<Value = Option<TypingStream>> {
    prop_oneof![
        Just(None),
        ("[a-z\n]{1,20}", 0usize..10).prop_map(|(text, pos)| {
            let mut stream = TypingStream::new(&text);
            stream.pos = pos.min(stream.steps.len().saturating_sub(1));
            Some(stream)
        }),
    ]
}

fn arb_countup() -> impl Strategy<Value = Option<CountUp>> {
    prop_oneof![
        Just(None),
        (0..TOTAL_SLIDES, 1u64..1_000_000).prop_map(|(slide, target)| Some(CountUp {
            slide,
            target,
            original: crate::player::group_thousands(target),
        })),
    ]
}

fn arb_screen() -> impl Strategy<Value = Screen> {
    prop_oneof![
        Just(Screen::Chat),
        Just(Screen::Loading),
        (0..TOTAL_SLIDES, arb_countup())
            .prop_map(|(current, countup)| Screen::Player { current, countup }),
    ]
}

fn arb_state() -> impl Strategy<Value = AppState> {
    (arb_screen(), arb_typing(), 0u64..5, 0u64..5).prop_map(
        |(screen, typing, typing_gen, nav_gen)| AppState {
            screen,
            typing,
            typing_gen,
            nav_gen,
        },
    )
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z 你好]{0,12}".prop_map(|text| Event::PromptSubmitted { text }),
        prop_oneof![Just("hello".to_string()), Just("看总结".to_string())]
            .prop_map(|prompt| Event::SuggestionChosen { prompt }),
        Just(Event::NextRequested),
        Just(Event::PrevRequested),
        (0usize..10).prop_map(|index| Event::JumpRequested { index }),
        Just(Event::CloseRequested),
        Just(Event::ReplayRequested),
        (0u64..6).prop_map(|generation| Event::TypeTick { generation }),
        (0u64..6).prop_map(|generation| Event::LoadingFinished { generation }),
        (0u64..6, 0u64..3000).prop_map(|(generation, ms)| Event::CountUpFrame {
            generation,
            elapsed: Duration::from_millis(ms),
        }),
        (0u64..6).prop_map(|generation| Event::AutoAdvance { generation }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The machine never panics and never leaves the slide index range.
    #[test]
    fn transition_total_and_in_bounds(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let result = transition(&state, &ctx, event);
        if let Some(index) = result.new_state.current_index() {
            prop_assert!(index < ctx.total_slides());
        }
    }

    /// Position relabelling effects always target a valid index.
    #[test]
    fn effects_never_reference_out_of_range_slides(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let result = transition(&state, &ctx, event);
        for effect in &result.effects {
            match effect {
                Effect::ApplyPositions { active } => {
                    prop_assert!(*active < ctx.total_slides());
                }
                Effect::SetStatDisplay { slide, .. } => {
                    prop_assert!(*slide < ctx.total_slides());
                }
                _ => {}
            }
        }
    }

    /// An ignored event changes nothing and schedules nothing.
    #[test]
    fn ignored_events_are_true_noops(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let result = transition(&state, &ctx, event);
        if result.ignored {
            prop_assert_eq!(&result.new_state, &state);
            prop_assert!(result.effects.is_empty());
        }
    }

    /// Timer events from a superseded generation never change state.
    #[test]
    fn stale_timer_events_are_ignored(state in arb_state(), gen_offset in 1u64..10, ms in 0u64..3000) {
        let ctx = test_context();
        let stale_nav = state.nav_gen + gen_offset;
        let stale_typing = state.typing_gen + gen_offset;
        for event in [
            Event::TypeTick { generation: stale_typing },
            Event::LoadingFinished { generation: stale_nav },
            Event::CountUpFrame { generation: stale_nav, elapsed: Duration::from_millis(ms) },
            Event::AutoAdvance { generation: stale_nav },
        ] {
            let result = transition(&state, &ctx, event);
            prop_assert!(result.ignored);
        }
    }

    /// The submission gate holds: while a stream is active, no prompt
    /// starts a second one.
    #[test]
    fn typing_gate_rejects_concurrent_submissions(text in "[a-z ]{0,20}") {
        let ctx = test_context();
        let state = AppState {
            typing: Some(TypingStream::new("busy")),
            ..AppState::default()
        };
        let result = transition(&state, &ctx, Event::PromptSubmitted { text });
        prop_assert!(result.ignored);
    }

    /// Saturating navigation: after any event sequence, repeated Next from
    /// the last slide and Prev from the first stay put.
    #[test]
    fn navigation_saturates_at_both_ends(events in proptest::collection::vec(arb_event(), 0..25)) {
        let ctx = test_context();
        let mut state = AppState::default();
        for event in events {
            state = transition(&state, &ctx, event).new_state;
        }
        if state.current_index() == Some(TOTAL_SLIDES - 1) {
            let result = transition(&state, &ctx, Event::NextRequested);
            prop_assert!(result.ignored);
        }
        if state.current_index() == Some(0) {
            let result = transition(&state, &ctx, Event::PrevRequested);
            prop_assert!(result.ignored);
        }
    }
}
