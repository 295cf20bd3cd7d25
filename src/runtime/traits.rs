//! The rendering surface seam
//!
//! The runtime talks to a narrow, synchronous mutation interface; it never
//! assumes a specific rendering technology. The terminal front-end and the
//! recording mock used in tests both implement it.

use crate::player::SlideNode;
use std::sync::{Arc, Mutex};

/// A surface the runtime renders into: a chat log with a progressively
/// mutated message, and a slide track with position classes and a progress
/// indicator.
pub trait Surface: Send {
    // Chat
    fn hide_welcome(&mut self);
    fn push_user_message(&mut self, text: &str);
    /// Create the empty assistant bubble the stream types into; shows the
    /// cursor marker.
    fn begin_assistant_message(&mut self);
    fn append_assistant_char(&mut self, ch: char);
    /// Remove the cursor marker and close the bubble.
    fn finish_assistant_message(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    fn set_input(&mut self, text: &str);
    fn clear_input(&mut self);

    // Player
    fn show_loading(&mut self);
    fn render_deck(&mut self, nodes: Vec<SlideNode>);
    fn show_player(&mut self);
    fn show_chat(&mut self);
    fn apply_positions(&mut self, active: usize);
    fn set_progress(&mut self, percent: f64);
    fn set_stat_display(&mut self, slide: usize, text: &str);
}

/// Shared handle over a surface so the runtime can mutate it while a
/// renderer reads it.
pub struct SharedSurface<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedSurface<S> {
    pub fn new(surface: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Run `f` with the locked surface.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock().expect("surface lock poisoned"))
    }

    /// Run `f` with the locked surface, mutably.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.lock().expect("surface lock poisoned"))
    }
}

impl<S> Clone for SharedSurface<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Surface> Surface for SharedSurface<S> {
    fn hide_welcome(&mut self) {
        self.with_mut(Surface::hide_welcome);
    }

    fn push_user_message(&mut self, text: &str) {
        self.with_mut(|s| s.push_user_message(text));
    }

    fn begin_assistant_message(&mut self) {
        self.with_mut(Surface::begin_assistant_message);
    }

    fn append_assistant_char(&mut self, ch: char) {
        self.with_mut(|s| s.append_assistant_char(ch));
    }

    fn finish_assistant_message(&mut self) {
        self.with_mut(Surface::finish_assistant_message);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.with_mut(|s| s.set_input_enabled(enabled));
    }

    fn set_input(&mut self, text: &str) {
        self.with_mut(|s| s.set_input(text));
    }

    fn clear_input(&mut self) {
        self.with_mut(Surface::clear_input);
    }

    fn show_loading(&mut self) {
        self.with_mut(Surface::show_loading);
    }

    fn render_deck(&mut self, nodes: Vec<SlideNode>) {
        self.with_mut(|s| s.render_deck(nodes));
    }

    fn show_player(&mut self) {
        self.with_mut(Surface::show_player);
    }

    fn show_chat(&mut self) {
        self.with_mut(Surface::show_chat);
    }

    fn apply_positions(&mut self, active: usize) {
        self.with_mut(|s| s.apply_positions(active));
    }

    fn set_progress(&mut self, percent: f64) {
        self.with_mut(|s| s.set_progress(percent));
    }

    fn set_stat_display(&mut self, slide: usize, text: &str) {
        self.with_mut(|s| s.set_stat_display(slide, text));
    }
}
