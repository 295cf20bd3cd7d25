//! Input dispatcher
//!
//! Maps raw terminal events onto machine events. Local concerns (editing
//! the input line, cycling the suggestion focus) mutate the UI model
//! directly and emit nothing. Player bindings are active only while the
//! player is open; the click zone maps the left/right half of the screen to
//! prev/next.

use super::model::{ScreenView, UiModel};
use crate::runtime::SharedSurface;
use crate::state_machine::Event;
use crossterm::event::{
    Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};

/// What the outer loop should do with a raw terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Emit(Event),
}

pub fn map_event(model: &SharedSurface<UiModel>, raw: &TerminalEvent) -> Action {
    match raw {
        TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => map_key(model, key),
        TerminalEvent::Mouse(mouse) => map_mouse(model, mouse),
        _ => Action::None,
    }
}

fn map_key(model: &SharedSurface<UiModel>, key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match model.with(|m| m.screen) {
        ScreenView::Player => map_player_key(key),
        ScreenView::Loading => Action::None,
        ScreenView::Chat => map_chat_key(model, key),
    }
}

fn map_player_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Right | KeyCode::Char(' ') => Action::Emit(Event::NextRequested),
        KeyCode::Left => Action::Emit(Event::PrevRequested),
        KeyCode::Esc => Action::Emit(Event::CloseRequested),
        KeyCode::Char('r') => Action::Emit(Event::ReplayRequested),
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_chat_key(model: &SharedSurface<UiModel>, key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => model.with_mut(|m| {
            let trimmed = m.input.trim();
            if trimmed.is_empty() {
                // Blank input: Enter activates the focused suggestion card.
                m.suggestions
                    .get(m.selected_suggestion)
                    .map_or(Action::None, |prompt| {
                        Action::Emit(Event::SuggestionChosen {
                            prompt: prompt.clone(),
                        })
                    })
            } else {
                Action::Emit(Event::PromptSubmitted {
                    text: trimmed.to_string(),
                })
            }
        }),
        KeyCode::Tab => {
            model.with_mut(UiModel::next_suggestion);
            Action::None
        }
        KeyCode::BackTab => {
            model.with_mut(UiModel::prev_suggestion);
            Action::None
        }
        KeyCode::Right => {
            model.with_mut(|m| {
                if m.input.is_empty() {
                    m.next_suggestion();
                }
            });
            Action::None
        }
        KeyCode::Left => {
            model.with_mut(|m| {
                if m.input.is_empty() {
                    m.prev_suggestion();
                }
            });
            Action::None
        }
        KeyCode::Backspace => {
            model.with_mut(|m| {
                m.input.pop();
            });
            Action::None
        }
        KeyCode::Char(c) => {
            model.with_mut(|m| m.input.push(c));
            Action::None
        }
        _ => Action::None,
    }
}

fn map_mouse(model: &SharedSurface<UiModel>, mouse: &MouseEvent) -> Action {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Action::None;
    }
    let (screen, width) = model.with(|m| (m.screen, m.viewport_width));
    if screen != ScreenView::Player {
        return Action::None;
    }
    if mouse.column >= width / 2 {
        Action::Emit(Event::NextRequested)
    } else {
        Action::Emit(Event::PrevRequested)
    }
}
