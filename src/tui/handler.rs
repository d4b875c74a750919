use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InputMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    LoadReport,
    NextArticle,
    OpenArticle,
    AddCreator,
    EditCreator,
    RemoveCreator,
    ShowHelp,
    HideHelp,
    // Remove confirmation
    ConfirmRemove,
    CancelRemove,
    // Add/edit form
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormConfirm,
    FormCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    match mode {
        // Any key closes help
        InputMode::Help => Some(AppAction::HideHelp),

        InputMode::ConfirmRemove => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppAction::ConfirmRemove),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(AppAction::CancelRemove)
            }
            _ => None,
        },

        InputMode::Form => match key.code {
            KeyCode::Enter => Some(AppAction::FormConfirm),
            KeyCode::Esc => Some(AppAction::FormCancel),
            KeyCode::Tab | KeyCode::Down => Some(AppAction::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppAction::FormPrevField),
            KeyCode::Backspace => Some(AppAction::FormBackspace),
            KeyCode::Char(c) => Some(AppAction::FormChar(c)),
            _ => None,
        },

        InputMode::Normal => match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(AppAction::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

            (KeyCode::Enter, _) | (KeyCode::Char('r'), _) => Some(AppAction::LoadReport),
            (KeyCode::Char('n'), _) => Some(AppAction::NextArticle),
            (KeyCode::Char('o'), _) => Some(AppAction::OpenArticle),

            (KeyCode::Char('a'), _) => Some(AppAction::AddCreator),
            (KeyCode::Char('e'), _) => Some(AppAction::EditCreator),
            (KeyCode::Char('d'), _) => Some(AppAction::RemoveCreator),

            (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_keys() {
        let cases = [
            (KeyCode::Char('j'), AppAction::MoveDown),
            (KeyCode::Up, AppAction::MoveUp),
            (KeyCode::Enter, AppAction::LoadReport),
            (KeyCode::Char('r'), AppAction::LoadReport),
            (KeyCode::Char('a'), AppAction::AddCreator),
            (KeyCode::Char('d'), AppAction::RemoveCreator),
            (KeyCode::Char('q'), AppAction::Quit),
        ];
        for (code, action) in cases {
            assert_eq!(handle_key_event(press(code), InputMode::Normal), Some(action));
        }
        assert_eq!(handle_key_event(press(KeyCode::Char('z')), InputMode::Normal), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key, InputMode::Normal), Some(AppAction::Quit));
    }

    #[test]
    fn form_mode_captures_letters() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('q')), InputMode::Form),
            Some(AppAction::FormChar('q'))
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Tab), InputMode::Form),
            Some(AppAction::FormNextField)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), InputMode::Form),
            Some(AppAction::FormCancel)
        );
    }

    #[test]
    fn removal_needs_explicit_yes() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('y')), InputMode::ConfirmRemove),
            Some(AppAction::ConfirmRemove)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), InputMode::ConfirmRemove),
            Some(AppAction::CancelRemove)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('d')), InputMode::ConfirmRemove),
            None
        );
    }

    #[test]
    fn any_key_closes_help() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('x')), InputMode::Help),
            Some(AppAction::HideHelp)
        );
    }
}
