use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::mode::Focus;

/// Maps key presses to UI actions for the focused panel
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event. `confirming` is set while the delete prompt is open.
    pub fn handle_key(&self, key: KeyEvent, focus: Focus, confirming: bool) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        if confirming {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => InputAction::Confirm,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => InputAction::Cancel,
                _ => InputAction::None,
            };
        }

        if ctrl {
            return match key.code {
                KeyCode::Char('n') => InputAction::NewConversation,
                KeyCode::Char('d') => InputAction::RequestDelete,
                KeyCode::Char('b') => InputAction::ToggleSidebar,
                _ => InputAction::None,
            };
        }

        match key.code {
            KeyCode::Tab => return InputAction::FocusNext,
            KeyCode::BackTab => return InputAction::FocusPrev,
            KeyCode::PageUp => return InputAction::ScrollUp,
            KeyCode::PageDown => return InputAction::ScrollDown,
            _ => {}
        }

        match focus {
            Focus::Composer => match key.code {
                KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                    InputAction::Insert('\n')
                }
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Esc => InputAction::Cancel,
                KeyCode::Char(c) => InputAction::Insert(c),
                KeyCode::Backspace => InputAction::Delete,
                KeyCode::Up => InputAction::ScrollUp,
                KeyCode::Down => InputAction::ScrollDown,
                _ => InputAction::None,
            },
            Focus::Conversations | Focus::Templates => match key.code {
                KeyCode::Up | KeyCode::Char('k') => InputAction::Up,
                KeyCode::Down | KeyCode::Char('j') => InputAction::Down,
                KeyCode::Enter => InputAction::Activate,
                KeyCode::Esc => InputAction::Cancel,
                _ => InputAction::None,
            },
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Insert(char),
    Delete,
    Up,
    Down,
    /// Open the highlighted conversation or use the highlighted template
    Activate,
    FocusNext,
    FocusPrev,
    ScrollUp,
    ScrollDown,
    NewConversation,
    RequestDelete,
    Confirm,
    Cancel,
    ToggleSidebar,
    Quit,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_composer_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Enter), Focus::Composer, false), InputAction::Submit);
        assert_eq!(
            handler.handle_key(
                KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT),
                Focus::Composer,
                false
            ),
            InputAction::Insert('\n')
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('j')), Focus::Composer, false),
            InputAction::Insert('j')
        );
    }

    #[test]
    fn test_list_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('j')), Focus::Conversations, false), InputAction::Down);
        assert_eq!(handler.handle_key(key(KeyCode::Up), Focus::Templates, false), InputAction::Up);
        assert_eq!(handler.handle_key(key(KeyCode::Enter), Focus::Templates, false), InputAction::Activate);
    }

    #[test]
    fn test_confirmation_swallows_other_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('y')), Focus::Composer, true), InputAction::Confirm);
        assert_eq!(handler.handle_key(key(KeyCode::Esc), Focus::Composer, true), InputAction::Cancel);
        assert_eq!(handler.handle_key(key(KeyCode::Char('x')), Focus::Composer, true), InputAction::None);
        assert_eq!(handler.handle_key(ctrl('c'), Focus::Composer, true), InputAction::Quit);
    }

    #[test]
    fn test_global_shortcuts() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(ctrl('n'), Focus::Templates, false), InputAction::NewConversation);
        assert_eq!(handler.handle_key(ctrl('d'), Focus::Composer, false), InputAction::RequestDelete);
        assert_eq!(handler.handle_key(key(KeyCode::Tab), Focus::Composer, false), InputAction::FocusNext);
    }
}
