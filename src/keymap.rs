pub const KEY_QUIT: char = 'q';
pub const KEY_REFRESH: char = 'r';
pub const KEY_CYCLE_DIFF_SOURCE: char = 'd';
pub const KEY_OPEN_IDENTITY: char = 'c';
pub const KEY_OPEN_STASH: char = 's';
pub const KEY_OPEN_PREFERENCES: char = 'o';
pub const KEY_DIFF_TOP: char = 'g';
pub const KEY_DIFF_BOTTOM: char = 'G';
pub const KEY_MODAL_EDIT: char = 'e';

pub const KEY_PREFERENCES_CLOSE: char = KEY_OPEN_PREFERENCES;

pub fn diff_scroll_hint() -> String {
    format!(
        "Use ↑↓ to scroll, PgUp/PgDn for page scroll, {}/{} for top/bottom",
        KEY_DIFF_TOP, KEY_DIFF_BOTTOM
    )
}

pub fn identity_browse_hint() -> String {
    format!(
        "Up/Down: Navigate | Enter/{}: Edit | ESC: Close",
        KEY_MODAL_EDIT.to_ascii_uppercase()
    )
}

pub fn identity_edit_hint() -> &'static str {
    "Enter: Save | ESC: Cancel"
}

pub fn stash_hint() -> &'static str {
    "Enter: Create | ESC: Cancel"
}

pub fn modal_busy_hint() -> &'static str {
    "Saving..."
}

pub fn modal_error_hint() -> &'static str {
    "Press any key to continue"
}

pub fn footer_hint_preferences() -> &'static str {
    "preferences: j/k select, h/l change, Esc close"
}

pub fn footer_hint_main() -> String {
    format!(
        "Tab pane  Up/Down scroll-or-move  PgUp/PgDn page  {}/{} top/bottom  {} source  {} refresh  {} identity  {} stash  {} preferences  {} quit",
        KEY_DIFF_TOP,
        KEY_DIFF_BOTTOM,
        KEY_CYCLE_DIFF_SOURCE,
        KEY_REFRESH,
        KEY_OPEN_IDENTITY,
        KEY_OPEN_STASH,
        KEY_OPEN_PREFERENCES,
        KEY_QUIT,
    )
}
