//! Playback runtime executor

use super::traits::Surface;
use crate::player;
use crate::state_machine::{transition, AppContext, AppState, Effect, Event};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The four timer-driven activities. Each slot holds at most one live timer;
/// scheduling into an occupied slot cancels the previous task.
#[derive(Debug, Clone, Copy)]
enum TimerSlot {
    Typing,
    Loading,
    CountUp,
    Autoplay,
}

/// Generic playback runtime that works against any rendering surface.
pub struct PlayerRuntime<S: Surface> {
    context: AppContext,
    state: AppState,
    surface: S,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    typing_timer: Option<CancellationToken>,
    loading_timer: Option<CancellationToken>,
    countup_timer: Option<CancellationToken>,
    autoplay_timer: Option<CancellationToken>,
}

impl<S: Surface + 'static> PlayerRuntime<S> {
    pub fn new(
        context: AppContext,
        surface: S,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            context,
            state: AppState::default(),
            surface,
            event_rx,
            event_tx,
            typing_timer: None,
            loading_timer: None,
            countup_timer: None,
            autoplay_timer: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            slides = self.context.total_slides(),
            "Starting playback runtime"
        );

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("Playback runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let result = transition(&self.state, &self.context, event.clone());
        if result.ignored {
            tracing::debug!(?event, "Event does not apply in current state");
            return;
        }

        tracing::trace!(?event, "Applying transition");
        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::HideWelcome => self.surface.hide_welcome(),
            Effect::PushUserMessage { text } => self.surface.push_user_message(&text),
            Effect::BeginAssistantMessage => self.surface.begin_assistant_message(),
            Effect::AppendAssistantChar { ch } => self.surface.append_assistant_char(ch),
            Effect::FinishAssistantMessage => self.surface.finish_assistant_message(),
            Effect::SetInputEnabled { enabled } => self.surface.set_input_enabled(enabled),
            Effect::SetInput { text } => self.surface.set_input(&text),
            Effect::ClearInput => self.surface.clear_input(),

            Effect::ShowLoading => self.surface.show_loading(),
            Effect::RenderDeck => {
                let nodes = player::render_deck(&self.context.deck);
                self.surface.render_deck(nodes);
            }
            Effect::ShowPlayer => self.surface.show_player(),
            Effect::ShowChat => self.surface.show_chat(),
            Effect::ApplyPositions { active } => {
                if let Some(slide) = self.context.slide(active) {
                    tracing::debug!(active, kind = slide.kind(), "Slide activated");
                }
                self.surface.apply_positions(active);
            }
            Effect::SetProgress { index, total } => {
                self.surface.set_progress(player::progress_percent(index, total));
            }
            Effect::SetStatDisplay { slide, text } => {
                self.surface.set_stat_display(slide, &text);
            }

            Effect::ScheduleTypeTick { delay, generation } => {
                self.schedule(TimerSlot::Typing, delay, Event::TypeTick { generation });
            }
            Effect::ScheduleLoadingDone { delay, generation } => {
                self.schedule(
                    TimerSlot::Loading,
                    delay,
                    Event::LoadingFinished { generation },
                );
            }
            Effect::ScheduleCountUpFrame {
                delay,
                generation,
                elapsed,
            } => {
                self.schedule(
                    TimerSlot::CountUp,
                    delay,
                    Event::CountUpFrame {
                        generation,
                        elapsed,
                    },
                );
            }
            Effect::ScheduleAutoAdvance { delay, generation } => {
                self.schedule(
                    TimerSlot::Autoplay,
                    delay,
                    Event::AutoAdvance { generation },
                );
            }

            Effect::CancelCountUp => self.cancel(TimerSlot::CountUp),
            Effect::CancelPlayerTimers => {
                self.cancel(TimerSlot::Loading);
                self.cancel(TimerSlot::CountUp);
                self.cancel(TimerSlot::Autoplay);
            }
        }
    }

    /// Spawn a one-shot timer that sends `event` after `delay`, cancelling
    /// any timer already in the slot.
    fn schedule(&mut self, slot: TimerSlot, delay: Duration, event: Event) {
        let token = CancellationToken::new();
        if let Some(old) = self.slot_mut(slot).replace(token.clone()) {
            old.cancel();
        }
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = tx.send(event).await;
                }
            }
        });
    }

    fn cancel(&mut self, slot: TimerSlot) {
        if let Some(token) = self.slot_mut(slot).take() {
            token.cancel();
        }
    }

    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<CancellationToken> {
        match slot {
            TimerSlot::Typing => &mut self.typing_timer,
            TimerSlot::Loading => &mut self.loading_timer,
            TimerSlot::CountUp => &mut self.countup_timer,
            TimerSlot::Autoplay => &mut self.autoplay_timer,
        }
    }
}
