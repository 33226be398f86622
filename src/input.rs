use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::app::App;
use crate::keymap;
use crate::modal::ModalInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainKeyAction {
    TogglePaneFocus,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    CycleDiffSource,
    Refresh,
    OpenIdentity,
    OpenStash,
    OpenPreferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreferencesKeyAction {
    Close,
    MoveUp,
    MoveDown,
    AdjustLeft,
    AdjustRight,
}

/// Returns `false` when the app should exit.
pub fn handle_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if is_interrupt(key) {
                return false;
            }

            if app.modal().is_some() {
                if let Some(input) = map_modal_key(key) {
                    app.modal_input(input);
                }
                return true;
            }

            if app.preferences_open {
                if let Some(action) = map_preferences_key(key.code) {
                    run_preferences_action(app, action);
                }
                return true;
            }

            if key.code == KeyCode::Char(keymap::KEY_QUIT) {
                return false;
            }

            if let Some(action) = map_main_key(key.code) {
                run_main_action(app, action);
            }
        }
        Event::Paste(text) if app.modal().is_some() => {
            for ch in text.chars().filter(|ch| *ch != '\n' && *ch != '\r') {
                app.modal_input(ModalInput::Char(ch));
            }
        }
        Event::Mouse(mouse) if app.modal().is_none() && !app.preferences_open => {
            match mouse.kind {
                MouseEventKind::ScrollUp if app.is_in_diff(mouse.column, mouse.row) => {
                    app.scroll_diff(-3);
                }
                MouseEventKind::ScrollDown if app.is_in_diff(mouse.column, mouse.row) => {
                    app.scroll_diff(3);
                }
                _ => {}
            }
        }
        _ => {}
    }

    true
}

fn is_interrupt(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn map_main_key(code: KeyCode) -> Option<MainKeyAction> {
    match code {
        KeyCode::Tab | KeyCode::BackTab => Some(MainKeyAction::TogglePaneFocus),
        KeyCode::Up | KeyCode::Char('k') => Some(MainKeyAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(MainKeyAction::MoveDown),
        KeyCode::PageUp => Some(MainKeyAction::PageUp),
        KeyCode::PageDown => Some(MainKeyAction::PageDown),
        KeyCode::Home | KeyCode::Char(keymap::KEY_DIFF_TOP) => Some(MainKeyAction::Top),
        KeyCode::End | KeyCode::Char(keymap::KEY_DIFF_BOTTOM) => Some(MainKeyAction::Bottom),
        KeyCode::Char(keymap::KEY_CYCLE_DIFF_SOURCE) => Some(MainKeyAction::CycleDiffSource),
        KeyCode::Char(keymap::KEY_REFRESH) => Some(MainKeyAction::Refresh),
        KeyCode::Char(keymap::KEY_OPEN_IDENTITY) => Some(MainKeyAction::OpenIdentity),
        KeyCode::Char(keymap::KEY_OPEN_STASH) => Some(MainKeyAction::OpenStash),
        KeyCode::Char(keymap::KEY_OPEN_PREFERENCES) => Some(MainKeyAction::OpenPreferences),
        _ => None,
    }
}

fn run_main_action(app: &mut App, action: MainKeyAction) {
    match action {
        MainKeyAction::TogglePaneFocus => app.toggle_pane_focus(),
        MainKeyAction::MoveUp => {
            if app.is_diff_focused() {
                app.scroll_diff(-1);
            } else {
                app.move_remote_selection(-1);
            }
        }
        MainKeyAction::MoveDown => {
            if app.is_diff_focused() {
                app.scroll_diff(1);
            } else {
                app.move_remote_selection(1);
            }
        }
        MainKeyAction::PageUp => app.diff_page_up(),
        MainKeyAction::PageDown => app.diff_page_down(),
        MainKeyAction::Top => app.diff_to_top(),
        MainKeyAction::Bottom => app.diff_to_bottom(),
        MainKeyAction::CycleDiffSource => app.cycle_diff_source(),
        MainKeyAction::Refresh => app.refresh(),
        MainKeyAction::OpenIdentity => app.open_git_config_modal(),
        MainKeyAction::OpenStash => app.open_stash_modal(),
        MainKeyAction::OpenPreferences => app.open_preferences(),
    }
}

fn map_modal_key(key: KeyEvent) -> Option<ModalInput> {
    match key.code {
        KeyCode::Esc => Some(ModalInput::Cancel),
        KeyCode::Enter => Some(ModalInput::Submit),
        KeyCode::Up => Some(ModalInput::Up),
        KeyCode::Down => Some(ModalInput::Down),
        KeyCode::Left => Some(ModalInput::Left),
        KeyCode::Right => Some(ModalInput::Right),
        KeyCode::Home => Some(ModalInput::Home),
        KeyCode::End => Some(ModalInput::End),
        KeyCode::Backspace => Some(ModalInput::Backspace),
        KeyCode::Delete => Some(ModalInput::Delete),
        KeyCode::Char(ch)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            Some(ModalInput::Char(ch))
        }
        _ => None,
    }
}

fn run_preferences_action(app: &mut App, action: PreferencesKeyAction) {
    match action {
        PreferencesKeyAction::Close => app.close_preferences(),
        PreferencesKeyAction::MoveUp => app.move_preferences_selection(-1),
        PreferencesKeyAction::MoveDown => app.move_preferences_selection(1),
        PreferencesKeyAction::AdjustLeft => app.adjust_selected_preference(-1),
        PreferencesKeyAction::AdjustRight => app.adjust_selected_preference(1),
    }
}

fn map_preferences_key(code: KeyCode) -> Option<PreferencesKeyAction> {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(keymap::KEY_PREFERENCES_CLOSE) => {
            Some(PreferencesKeyAction::Close)
        }
        KeyCode::Up | KeyCode::Char('k') => Some(PreferencesKeyAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(PreferencesKeyAction::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(PreferencesKeyAction::AdjustLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(PreferencesKeyAction::AdjustRight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    use super::{
        MainKeyAction, PreferencesKeyAction, handle_event, is_interrupt, map_main_key,
        map_modal_key, map_preferences_key,
    };
    use crate::app::{ActiveModal, App};
    use crate::gateway::Gateway;
    use crate::keymap;
    use crate::modal::ModalInput;
    use crate::settings::AppSettings;

    #[test]
    fn paste_types_into_open_modal_without_line_breaks() {
        let mut app = App::new(
            PathBuf::from("/"),
            Gateway::with_program("/nonexistent/gitarbor-test-git"),
            AppSettings::default(),
        )
        .with_settings_path(None);
        app.open_stash_modal();

        assert!(handle_event(&mut app, Event::Paste(String::from("wip\r\nnotes"))));

        let Some(ActiveModal::Stash(session)) = app.modal() else {
            panic!("stash modal should be open");
        };
        assert_eq!(session.buffer(), "wipnotes");
    }

    #[test]
    fn maps_main_keybindings_to_actions() {
        assert_eq!(
            map_main_key(KeyCode::Char(keymap::KEY_DIFF_TOP)),
            Some(MainKeyAction::Top)
        );
        assert_eq!(
            map_main_key(KeyCode::Char(keymap::KEY_DIFF_BOTTOM)),
            Some(MainKeyAction::Bottom)
        );
        assert_eq!(
            map_main_key(KeyCode::Char(keymap::KEY_OPEN_STASH)),
            Some(MainKeyAction::OpenStash)
        );
        assert_eq!(
            map_main_key(KeyCode::Char(keymap::KEY_OPEN_IDENTITY)),
            Some(MainKeyAction::OpenIdentity)
        );
        assert_eq!(map_main_key(KeyCode::PageDown), Some(MainKeyAction::PageDown));
        assert_eq!(map_main_key(KeyCode::F(5)), None);
    }

    #[test]
    fn modal_keys_type_text_including_app_shortcuts() {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_modal_key(plain(KeyCode::Char(keymap::KEY_QUIT))),
            Some(ModalInput::Char('q'))
        );
        assert_eq!(map_modal_key(plain(KeyCode::Esc)), Some(ModalInput::Cancel));
        assert_eq!(map_modal_key(plain(KeyCode::Enter)), Some(ModalInput::Submit));
        assert_eq!(
            map_modal_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn ctrl_c_always_interrupts() {
        assert!(is_interrupt(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_interrupt(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn maps_preferences_keybindings_to_actions() {
        assert_eq!(
            map_preferences_key(KeyCode::Char(keymap::KEY_PREFERENCES_CLOSE)),
            Some(PreferencesKeyAction::Close)
        );
        assert_eq!(
            map_preferences_key(KeyCode::Char('h')),
            Some(PreferencesKeyAction::AdjustLeft)
        );
        assert_eq!(map_preferences_key(KeyCode::Char('x')), None);
    }
}
