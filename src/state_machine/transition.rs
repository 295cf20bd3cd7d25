//! Pure state transition function
//!
//! Given the current state and one event, computes the next state and the
//! effects the runtime must execute. Events that do not apply in the current
//! state (out-of-range navigation, submissions while a stream is active,
//! timer events from a superseded generation) produce an `ignored` result:
//! state unchanged, no effects. Navigation is always safe.

use super::state::{CountUp, TypingStream};
use super::{AppContext, AppState, Effect, Event, Screen};
use crate::config::Slide;
use crate::player::{self, COUNTUP_DURATION, COUNTUP_FRAME};
use crate::typewriter::THINK_DELAY;
use std::time::Duration;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: AppState,
    pub effects: Vec<Effect>,
    /// True when the event did not apply to the current state. The runtime
    /// logs these at debug level; nothing else happens.
    pub ignored: bool,
}

impl TransitionResult {
    pub fn new(state: AppState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
            ignored: false,
        }
    }

    pub fn ignored(state: &AppState) -> Self {
        Self {
            new_state: state.clone(),
            effects: vec![],
            ignored: true,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Pure transition function: same inputs, same outputs, no I/O.
pub fn transition(state: &AppState, ctx: &AppContext, event: Event) -> TransitionResult {
    match event {
        Event::PromptSubmitted { text } => submit_prompt(state, ctx, &text),
        Event::SuggestionChosen { prompt } => choose_suggestion(state, ctx, prompt),
        Event::TypeTick { generation } => type_tick(state, generation),
        Event::LoadingFinished { generation } => loading_finished(state, ctx, generation),
        Event::CountUpFrame {
            generation,
            elapsed,
        } => countup_frame(state, generation, elapsed),
        Event::AutoAdvance { generation } => auto_advance(state, ctx, generation),

        Event::NextRequested => match state.screen {
            Screen::Player { current, .. } if current + 1 < ctx.total_slides() => {
                show_slide(state, ctx, current + 1, vec![])
            }
            _ => TransitionResult::ignored(state),
        },
        Event::PrevRequested => match state.screen {
            Screen::Player { current, .. } if current > 0 => {
                show_slide(state, ctx, current - 1, vec![])
            }
            _ => TransitionResult::ignored(state),
        },
        Event::JumpRequested { index } => match state.screen {
            Screen::Player { .. } if index < ctx.total_slides() => {
                show_slide(state, ctx, index, vec![])
            }
            _ => TransitionResult::ignored(state),
        },
        Event::ReplayRequested => match state.screen {
            Screen::Player { .. } => show_slide(state, ctx, 0, vec![]),
            _ => TransitionResult::ignored(state),
        },

        Event::CloseRequested => match state.screen {
            Screen::Player { .. } => {
                let mut next = state.clone();
                next.screen = Screen::Chat;
                next.nav_gen += 1;
                TransitionResult::new(next)
                    .with_effect(Effect::CancelPlayerTimers)
                    .with_effect(Effect::ShowChat)
                    .with_effect(Effect::ClearInput)
            }
            _ => TransitionResult::ignored(state),
        },
    }
}

/// Chat submission: gated on the typing flag and on blank input, then routed
/// through the responder into a fresh typewriter stream.
fn submit_prompt(state: &AppState, ctx: &AppContext, text: &str) -> TransitionResult {
    if !matches!(state.screen, Screen::Chat) || state.is_typing() {
        return TransitionResult::ignored(state);
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TransitionResult::ignored(state);
    }

    let response = ctx.responder.classify(trimmed);
    let stream = TypingStream::new(response);
    let generation = state.typing_gen + 1;

    let mut next = state.clone();
    next.typing_gen = generation;

    let mut effects = vec![
        Effect::HideWelcome,
        Effect::PushUserMessage {
            text: trimmed.to_string(),
        },
        Effect::ClearInput,
        Effect::BeginAssistantMessage,
    ];

    if stream.is_done() {
        // Empty response: nothing to stream, close the bubble immediately.
        next.typing = None;
        effects.push(Effect::FinishAssistantMessage);
    } else {
        next.typing = Some(stream);
        effects.push(Effect::SetInputEnabled { enabled: false });
        effects.push(Effect::ScheduleTypeTick {
            delay: THINK_DELAY,
            generation,
        });
    }
    TransitionResult::new(next).with_effects(effects)
}

/// Shortcut routing: summary-marked prompts open the player; everything else
/// goes through the chat path (same gate as a typed submission).
fn choose_suggestion(state: &AppState, ctx: &AppContext, prompt: String) -> TransitionResult {
    if !matches!(state.screen, Screen::Chat) {
        return TransitionResult::ignored(state);
    }
    if ctx.responder.chat().is_summary_prompt(&prompt) {
        let generation = state.nav_gen + 1;
        let mut next = state.clone();
        next.screen = Screen::Loading;
        next.nav_gen = generation;
        TransitionResult::new(next)
            .with_effect(Effect::SetInput { text: prompt })
            .with_effect(Effect::ShowLoading)
            .with_effect(Effect::ScheduleLoadingDone {
                delay: ctx.loading_duration,
                generation,
            })
    } else {
        submit_prompt(state, ctx, &prompt)
    }
}

/// One typewriter step. Stale generations and finished streams are ignored.
fn type_tick(state: &AppState, generation: u64) -> TransitionResult {
    if generation != state.typing_gen {
        return TransitionResult::ignored(state);
    }
    let Some(stream) = &state.typing else {
        return TransitionResult::ignored(state);
    };
    let Some(step) = stream.steps.get(stream.pos).copied() else {
        return TransitionResult::ignored(state);
    };

    let mut advanced = stream.clone();
    advanced.pos += 1;

    let mut next = state.clone();
    if advanced.is_done() {
        next.typing = None;
        TransitionResult::new(next)
            .with_effect(Effect::AppendAssistantChar { ch: step.ch })
            .with_effect(Effect::FinishAssistantMessage)
            .with_effect(Effect::SetInputEnabled { enabled: true })
    } else {
        next.typing = Some(advanced);
        TransitionResult::new(next)
            .with_effect(Effect::AppendAssistantChar { ch: step.ch })
            .with_effect(Effect::ScheduleTypeTick {
                delay: step.delay_after,
                generation,
            })
    }
}

/// The loading overlay finished: render the deck, swap surfaces, show
/// slide 0.
fn loading_finished(state: &AppState, ctx: &AppContext, generation: u64) -> TransitionResult {
    if generation != state.nav_gen || !matches!(state.screen, Screen::Loading) {
        return TransitionResult::ignored(state);
    }
    show_slide(state, ctx, 0, vec![Effect::RenderDeck, Effect::ShowPlayer])
}

/// One count-up frame: advance the eased value, or snap to the original
/// string at completion.
fn countup_frame(state: &AppState, generation: u64, elapsed: Duration) -> TransitionResult {
    if generation != state.nav_gen {
        return TransitionResult::ignored(state);
    }
    let Screen::Player {
        current,
        countup: Some(countup),
    } = &state.screen
    else {
        return TransitionResult::ignored(state);
    };

    let mut next = state.clone();
    if elapsed >= COUNTUP_DURATION {
        let snap = Effect::SetStatDisplay {
            slide: countup.slide,
            text: countup.original.clone(),
        };
        next.screen = Screen::Player {
            current: *current,
            countup: None,
        };
        TransitionResult::new(next).with_effect(snap)
    } else {
        let value = player::eased_count(countup.target, elapsed, COUNTUP_DURATION);
        TransitionResult::new(next)
            .with_effect(Effect::SetStatDisplay {
                slide: countup.slide,
                text: player::group_thousands(value),
            })
            .with_effect(Effect::ScheduleCountUpFrame {
                delay: COUNTUP_FRAME,
                generation,
                elapsed: elapsed + COUNTUP_FRAME,
            })
    }
}

/// Autoplay period elapsed: advance once, stopping at the last slide.
fn auto_advance(state: &AppState, ctx: &AppContext, generation: u64) -> TransitionResult {
    if generation != state.nav_gen {
        return TransitionResult::ignored(state);
    }
    match state.screen {
        Screen::Player { current, .. } if current + 1 < ctx.total_slides() => {
            show_slide(state, ctx, current + 1, vec![])
        }
        _ => TransitionResult::ignored(state),
    }
}

/// Shared navigation body: relabel positions, update progress, start the
/// enter animation for the new active slide, reschedule autoplay. Callers
/// bounds-check `index`.
fn show_slide(
    state: &AppState,
    ctx: &AppContext,
    index: usize,
    leading: Vec<Effect>,
) -> TransitionResult {
    if index >= ctx.total_slides() {
        return TransitionResult::ignored(state);
    }
    let generation = state.nav_gen + 1;
    let mut effects = leading;

    if matches!(
        state.screen,
        Screen::Player {
            countup: Some(_),
            ..
        }
    ) {
        effects.push(Effect::CancelCountUp);
    }

    effects.push(Effect::ApplyPositions { active: index });
    effects.push(Effect::SetProgress {
        index,
        total: ctx.total_slides(),
    });

    let countup = start_countup(ctx, index, generation, &mut effects);

    if let Some(interval) = ctx.auto_play_interval {
        if index + 1 < ctx.total_slides() {
            effects.push(Effect::ScheduleAutoAdvance {
                delay: interval,
                generation,
            });
        }
    }

    let mut next = state.clone();
    next.screen = Screen::Player {
        current: index,
        countup,
    };
    next.nav_gen = generation;
    TransitionResult::new(next).with_effects(effects)
}

/// Enter animation for a newly active slide. Numeric stat values animate
/// from 0; non-numeric values display verbatim.
fn start_countup(
    ctx: &AppContext,
    index: usize,
    generation: u64,
    effects: &mut Vec<Effect>,
) -> Option<CountUp> {
    let Some(Slide::Stat { value, .. }) = ctx.slide(index) else {
        return None;
    };
    match player::parse_stat_target(value) {
        Some(target) => {
            effects.push(Effect::SetStatDisplay {
                slide: index,
                text: "0".to_string(),
            });
            effects.push(Effect::ScheduleCountUpFrame {
                delay: COUNTUP_FRAME,
                generation,
                elapsed: COUNTUP_FRAME,
            });
            Some(CountUp {
                slide: index,
                target,
                original: value.clone(),
            })
        }
        None => {
            effects.push(Effect::SetStatDisplay {
                slide: index,
                text: value.clone(),
            });
            None
        }
    }
}
