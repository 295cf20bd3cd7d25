//! Events that drive the playback state machine

use std::time::Duration;

/// Events that trigger state transitions. Timer events carry the generation
/// that was current when the timer was scheduled; a mismatch means the timer
/// was superseded and the event is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events (from the input dispatcher)
    /// A trimmed, non-empty prompt submitted from the chat input.
    PromptSubmitted { text: String },
    /// A suggestion card activated with its preset prompt.
    SuggestionChosen { prompt: String },
    NextRequested,
    PrevRequested,
    /// Explicit jump to a slide index. Out-of-range requests are no-ops.
    JumpRequested { index: usize },
    CloseRequested,
    ReplayRequested,

    // Timer events (from the runtime's scheduled tasks)
    /// One typewriter step is due.
    TypeTick { generation: u64 },
    /// The loading overlay has run its course.
    LoadingFinished { generation: u64 },
    /// A count-up animation frame, with time elapsed since the animation
    /// started.
    CountUpFrame { generation: u64, elapsed: Duration },
    /// Autoplay period elapsed; advance one slide.
    AutoAdvance { generation: u64 },
}
