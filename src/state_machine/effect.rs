//! Effects produced by state transitions

use std::time::Duration;

/// Effects to be executed by the runtime after a transition. Surface effects
/// mutate the rendering model; schedule effects spawn guarded timers; cancel
/// effects invalidate timers whose state has been superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    // Chat surface
    /// Hide the welcome section (first submission only; idempotent).
    HideWelcome,
    /// Append the user's message to the chat log.
    PushUserMessage { text: String },
    /// Create the empty assistant bubble that the stream types into.
    BeginAssistantMessage,
    /// Append one streamed character to the open assistant bubble.
    AppendAssistantChar { ch: char },
    /// Clear the cursor marker and close the assistant bubble.
    FinishAssistantMessage,
    /// Enable or disable the submit affordance, in lockstep with the
    /// typing gate.
    SetInputEnabled { enabled: bool },
    /// Populate the input field (summary shortcuts echo their prompt).
    SetInput { text: String },
    ClearInput,

    // Player surface
    ShowLoading,
    /// Build one visual node per slide; node 0 starts active.
    RenderDeck,
    /// Show the player, hiding the main interface.
    ShowPlayer,
    /// Restore the main interface, hiding the player.
    ShowChat,
    /// Relabel every node's position class relative to the active index.
    ApplyPositions { active: usize },
    /// Update the progress indicator to `(index + 1) / total`. The surface
    /// computes the percentage, keeping the effect list `Eq`-comparable.
    SetProgress { index: usize, total: usize },
    /// Override the displayed stat value on a slide (count-up frames and the
    /// final snap).
    SetStatDisplay { slide: usize, text: String },

    // Timers
    ScheduleTypeTick { delay: Duration, generation: u64 },
    ScheduleLoadingDone { delay: Duration, generation: u64 },
    /// Schedule the next count-up frame; `elapsed` is the animation time the
    /// frame will represent when it fires.
    ScheduleCountUpFrame {
        delay: Duration,
        generation: u64,
        elapsed: Duration,
    },
    ScheduleAutoAdvance { delay: Duration, generation: u64 },
    /// Invalidate an in-flight count-up whose slide is no longer active.
    CancelCountUp,
    /// Invalidate all player timers (close path).
    CancelPlayerTimers,
}
