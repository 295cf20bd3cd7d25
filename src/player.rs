//! Slide player view-model: rendered nodes, position classes, progress, and
//! the count-up math for stat slides.
//!
//! Everything here is pure; the runtime decides when these functions run and
//! the surface decides how the results look.

use crate::config::{DeckConfig, Slide};
use std::time::Duration;

/// Count-up animation length for a stat slide.
pub const COUNTUP_DURATION: Duration = Duration::from_millis(1500);

/// Frame period for count-up updates, roughly 30 fps.
pub const COUNTUP_FRAME: Duration = Duration::from_millis(33);

/// A slide's relative state, used for transition styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Prev,
    Active,
    Next,
}

/// One visual node per slide. Nodes are built once per `open` and persist
/// until the player closes; `replay` only relabels them.
#[derive(Debug, Clone)]
pub struct SlideNode {
    pub index: usize,
    pub slide: Slide,
    pub position: Position,
    /// Transient display override for the stat value while its count-up
    /// animation runs. `None` shows the configured value.
    pub stat_display: Option<String>,
}

/// Build the visual nodes for a deck. The first slide starts active.
pub fn render_deck(deck: &DeckConfig) -> Vec<SlideNode> {
    deck.slides
        .iter()
        .enumerate()
        .map(|(index, slide)| SlideNode {
            index,
            slide: slide.clone(),
            position: if index == 0 {
                Position::Active
            } else {
                Position::Next
            },
            stat_display: None,
        })
        .collect()
}

/// Relabel every node relative to the new active index. Callers bounds-check
/// `active` first; this function assumes it is valid.
pub fn apply_positions(nodes: &mut [SlideNode], active: usize) {
    for node in nodes.iter_mut() {
        node.position = match node.index.cmp(&active) {
            std::cmp::Ordering::Less => Position::Prev,
            std::cmp::Ordering::Equal => Position::Active,
            std::cmp::Ordering::Greater => Position::Next,
        };
    }
}

/// Progress through the deck as a percentage, `(index + 1) / total * 100`.
#[allow(clippy::cast_precision_loss)] // deck sizes are tiny
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (index + 1) as f64 / total as f64 * 100.0
}

/// Parse a stat value for animation: grouping separators stripped, then an
/// integer. `None` means the value is displayed verbatim with no animation.
pub fn parse_stat_target(value: &str) -> Option<u64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Sample the count-up curve: cubic ease-out from 0 toward `target`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eased_count(target: u64, elapsed: Duration, duration: Duration) -> u64 {
    if duration.is_zero() || elapsed >= duration {
        return target;
    }
    let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
    let ease_out = 1.0 - (1.0 - progress).powi(3);
    (target as f64 * ease_out).floor() as u64
}

/// Format an integer with `,` grouping separators, matching how the
/// configured values are written.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
