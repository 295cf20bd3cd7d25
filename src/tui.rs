//! Terminal front-end
//!
//! Owns the terminal lifecycle and the outer loop: crossterm events map to
//! machine events through the input dispatcher, and the shared UI model is
//! drawn on a fixed cadence.

pub mod draw;
pub mod input;
pub mod model;

use crate::runtime::{PlayerRuntime, SharedSurface};
use crate::state_machine::AppContext;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use input::Action;
use model::UiModel;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

const REDRAW_PERIOD: Duration = Duration::from_millis(33);

/// Run the application until the user quits. Restores the terminal before
/// returning.
pub async fn run(context: AppContext, model: SharedSurface<UiModel>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(context, model, &mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    context: AppContext,
    model: SharedSurface<UiModel>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let runtime = PlayerRuntime::new(context, model.clone(), event_rx, event_tx.clone());
    let runtime_handle = tokio::spawn(runtime.run());

    let mut terminal_events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_PERIOD);

    loop {
        tokio::select! {
            _ = redraw.tick() => {
                terminal.draw(|frame| {
                    model.with_mut(|m| {
                        m.viewport_width = frame.area().width;
                        draw::render(frame, m);
                    });
                })?;
            }
            maybe_event = terminal_events.next() => {
                match maybe_event {
                    Some(Ok(raw)) => match input::map_event(&model, &raw) {
                        Action::Quit => break,
                        Action::Emit(event) => {
                            if event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Action::None => {}
                    },
                    Some(Err(err)) => {
                        tracing::error!(error = %err, "Terminal event stream failed");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    runtime_handle.abort();
    Ok(())
}
