//! Typewriter cadence for streamed chat responses.
//!
//! A response string expands into a fixed schedule of per-character steps.
//! The schedule is pure data; the runtime owns the actual timers.

use std::time::Duration;

/// Baseline delay between characters.
pub const TYPE_DELAY: Duration = Duration::from_millis(30);

/// Pause before the first character, simulating "thinking".
pub const THINK_DELAY: Duration = Duration::from_millis(500);

/// A line break pauses this many times the baseline delay before the next
/// character.
pub const LINE_BREAK_FACTOR: u32 = 3;

/// One emitted character and the delay to wait before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub ch: char,
    pub delay_after: Duration,
}

/// Delay to wait after emitting `ch` before the next character.
pub fn delay_after(ch: char) -> Duration {
    if ch == '\n' {
        TYPE_DELAY * LINE_BREAK_FACTOR
    } else {
        TYPE_DELAY
    }
}

/// Expand a response string into its emission schedule. Characters are
/// Unicode scalars, emitted in order.
pub fn schedule(text: &str) -> Vec<Step> {
    text.chars()
        .map(|ch| Step {
            ch,
            delay_after: delay_after(ch),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_characters_in_order() {
        let steps = schedule("ab\ncd");
        let chars: Vec<char> = steps.iter().map(|s| s.ch).collect();
        assert_eq!(chars, vec!['a', 'b', '\n', 'c', 'd']);
    }

    #[test]
    fn line_break_pauses_three_times_baseline() {
        let steps = schedule("ab\ncd");
        assert_eq!(steps[0].delay_after, TYPE_DELAY);
        assert_eq!(steps[1].delay_after, TYPE_DELAY);
        // The pause lands after the break, before 'c' is emitted.
        assert_eq!(steps[2].delay_after, TYPE_DELAY * 3);
        assert_eq!(steps[3].delay_after, TYPE_DELAY);
    }

    #[test]
    fn empty_text_has_no_steps() {
        assert!(schedule("").is_empty());
    }

    #[test]
    fn cjk_text_streams_per_scalar() {
        let steps = schedule("你好");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].ch, '你');
    }
}
