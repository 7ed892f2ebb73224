//! Keyboard Input Handler
//!
//! Processes crossterm key events, edits the focused field, and reports the
//! commits the controller cares about.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Field};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// The credential field was committed (Enter or leaving the field).
    CommitCredential(String),
    /// A file path was submitted in the picker field.
    PickImage(PathBuf),
    /// Analyze the current pair again.
    Rerun,
}

/// Handles a single synchronous keyboard event.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<UserAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => {
            state.should_quit = true;
            None
        }
        KeyCode::Char('r') if ctrl => Some(UserAction::Rerun),
        KeyCode::Esc => {
            state.should_quit = true;
            None
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            let leaving = state.focus;
            state.toggle_focus();
            (leaving == Field::ApiKey).then(|| UserAction::CommitCredential(state.api_key_input.clone()))
        }
        KeyCode::Enter => match state.focus {
            Field::ApiKey => {
                state.focus = Field::ImagePath;
                Some(UserAction::CommitCredential(state.api_key_input.clone()))
            }
            Field::ImagePath => {
                let raw = state.image_path_input.trim();
                (!raw.is_empty()).then(|| UserAction::PickImage(PathBuf::from(raw)))
            }
        },
        KeyCode::Backspace => {
            state.focused_input_mut().pop();
            None
        }
        KeyCode::Char(c) if !ctrl => {
            state.focused_input_mut().push(c);
            None
        }
        _ => None,
    }
}
