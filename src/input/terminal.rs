//! Terminal keyboard and mouse input via crossterm.

use std::io;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{InputEvent, InputSource};
use crate::shutdown::ShutdownHandle;

/// Browser `KeyboardEvent.key` name for a crossterm key code.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{}", n)),
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        _ => return None,
    };
    Some(name.to_string())
}

/// Map a terminal event onto a keydown or mousedown, if it is one.
///
/// Key repeats count as keydowns; releases do not. Mouse positions are in
/// terminal cells.
pub fn translate(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            key_name(key.code).map(|key| InputEvent::KeyDown { key })
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(InputEvent::MouseDown {
                x: mouse.column as f64,
                y: mouse.row as f64,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Raw mode + mouse capture for as long as the reader runs.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}

/// Reads terminal events and forwards them into an [`InputSource`].
///
/// Ctrl-C is swallowed by raw mode, so it signals `shutdown` instead.
pub struct TerminalInput {
    task: JoinHandle<()>,
}

impl TerminalInput {
    pub fn spawn(source: InputSource, shutdown: ShutdownHandle) -> io::Result<Self> {
        let guard = RawModeGuard::enable()?;
        let task = tokio::spawn(async move {
            let _guard = guard;
            let mut events = EventStream::new();
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    next = events.next() => match next {
                        Some(Ok(event)) => {
                            if is_interrupt(&event) {
                                shutdown.signal();
                                break;
                            }
                            if let Some(input) = translate(&event) {
                                source.emit(input);
                            }
                        }
                        Some(Err(err)) => {
                            tracing::warn!(error = %err, "Terminal input error");
                            break;
                        }
                        None => break,
                    },
                }
            }
        });
        Ok(Self { task })
    }

    pub async fn join(self) {
        let _ = self.task.await;
    }
}

fn is_interrupt(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn names_match_browser_keys() {
        assert_eq!(key_name(KeyCode::Up).as_deref(), Some("ArrowUp"));
        assert_eq!(key_name(KeyCode::Esc).as_deref(), Some("Escape"));
        assert_eq!(key_name(KeyCode::Char(' ')).as_deref(), Some(" "));
        assert_eq!(key_name(KeyCode::F(5)).as_deref(), Some("F5"));
        assert_eq!(key_name(KeyCode::Null), None);
    }

    #[test]
    fn presses_translate_and_releases_do_not() {
        assert_eq!(
            translate(&key(KeyCode::Char('x'), KeyEventKind::Press)),
            Some(InputEvent::KeyDown { key: "x".into() })
        );
        assert_eq!(translate(&key(KeyCode::Char('x'), KeyEventKind::Release)), None);
    }

    #[test]
    fn mouse_down_uses_cell_coordinates() {
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            translate(&event),
            Some(InputEvent::MouseDown { x: 12.0, y: 3.0 })
        );
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(is_interrupt(&event));
        assert!(!is_interrupt(&key(KeyCode::Char('c'), KeyEventKind::Press)));
    }
}
