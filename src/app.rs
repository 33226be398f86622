use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use ratatui::layout::{Position, Rect};

use crate::diff::{self, DiffDocument, DiffLine};
use crate::gateway::{
    CommandQueue, Completion, ExecOptions, Gateway, GatewayError, GitCommandResult, GitRequest,
    Ticket,
};
use crate::git::{self, DiffSource, GitRemote};
use crate::layout;
use crate::modal::{
    GitConfigForm, ModalEffect, ModalForm, ModalInput, ModalSession, Reconciled, StashForm,
};
use crate::settings::{self, AppSettings, REMOTES_WIDTH_MAX, REMOTES_WIDTH_MIN};
use crate::viewport::Scroller;

mod status;
mod util;

pub use status::{StatusKind, StatusMessage};
use util::{reveal_offset, step_within};

const PREFERENCES_FIELD_COUNT: usize = 4;
// Each remote renders as a name line plus up to two url lines.
const REMOTE_ENTRY_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Diff,
    Remotes,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UiLayout {
    pub diff_area: Rect,
    pub remotes_inner: Rect,
}

/// The diff pane: metadata of the last parsed document plus its lines bound
/// to a scroller.
#[derive(Debug, Default)]
pub struct DiffView {
    source: Option<DiffSource>,
    document: DiffDocument,
    scroller: Scroller<DiffLine>,
    pending: Option<Ticket>,
    error: Option<String>,
}

impl DiffView {
    pub fn source(&self) -> DiffSource {
        self.source.unwrap_or(DiffSource::Unstaged)
    }

    /// Metadata only; the lines live in [`DiffView::scroller`].
    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    pub fn scroller(&self) -> &Scroller<DiffLine> {
        &self.scroller
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.scroller.total_lines() == 0
    }

    /// `[first-last/total]` while scrollable, `[N lines]` otherwise.
    pub fn scroll_info(&self) -> String {
        let state = self.scroller.state();
        if state.total_lines > state.page_size {
            let end = (state.offset + state.page_size).min(state.total_lines);
            format!("[{}-{}/{}]", state.offset + 1, end, state.total_lines)
        } else {
            format!("[{} lines]", state.total_lines)
        }
    }

    fn bind(&mut self, mut document: DiffDocument) {
        let lines = std::mem::take(&mut document.lines);
        self.document = document;
        self.scroller.bind(lines);
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.document = DiffDocument::default();
        self.scroller.clear();
        self.error = Some(message);
    }
}

#[derive(Debug, Default)]
pub struct RemotesView {
    remotes: Vec<GitRemote>,
    selected: Option<usize>,
    scroll: usize,
    pending: Option<Ticket>,
    error: Option<String>,
}

impl RemotesView {
    pub fn remotes(&self) -> &[GitRemote] {
        &self.remotes
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn bind(&mut self, remotes: Vec<GitRemote>) {
        let previous = self
            .selected
            .and_then(|idx| self.remotes.get(idx))
            .map(|remote| remote.name.clone());

        self.remotes = remotes;
        self.error = None;
        self.selected = match previous {
            Some(name) => self
                .remotes
                .iter()
                .position(|remote| remote.name == name)
                .or(Some(0)),
            None => Some(0),
        }
        .filter(|_| !self.remotes.is_empty());
    }
}

/// The dialog currently on top of the main view, if any.
#[derive(Debug)]
pub enum ActiveModal {
    GitConfig(ModalSession<GitConfigForm>),
    Stash(ModalSession<StashForm>),
}

impl ActiveModal {
    fn handle_input(&mut self, input: ModalInput) -> ModalEffect {
        match self {
            Self::GitConfig(session) => session.handle_input(input),
            Self::Stash(session) => session.handle_input(input),
        }
    }

    fn await_ticket(&mut self, ticket: Ticket) {
        match self {
            Self::GitConfig(session) => session.await_ticket(ticket),
            Self::Stash(session) => session.await_ticket(ticket),
        }
    }

    fn waiting_on(&self) -> Option<Ticket> {
        match self {
            Self::GitConfig(session) => session.waiting_on(),
            Self::Stash(session) => session.waiting_on(),
        }
    }
}

pub struct App {
    repo_root: PathBuf,
    queue: CommandQueue,
    settings_path: Option<PathBuf>,
    settings_dirty: bool,
    pub settings: AppSettings,
    pub preferences_open: bool,
    pub preferences_selected: usize,
    pub pane_focus: PaneFocus,
    diff: DiffView,
    remotes: RemotesView,
    modal: Option<ActiveModal>,
    pub status: StatusMessage,
    pub layout: UiLayout,
}

impl App {
    /// Builds the app and dispatches the initial diff and remotes loads.
    pub fn new(repo_root: PathBuf, gateway: Gateway, settings: AppSettings) -> Self {
        let mut app = Self {
            repo_root,
            queue: CommandQueue::new(gateway),
            settings_path: settings::config_file_path(),
            settings_dirty: false,
            settings,
            preferences_open: false,
            preferences_selected: 0,
            pane_focus: PaneFocus::Diff,
            diff: DiffView::default(),
            remotes: RemotesView::default(),
            modal: None,
            status: StatusMessage::ready(),
            layout: UiLayout::default(),
        };

        app.reload_diff();
        app.reload_remotes();
        app
    }

    /// Redirects preference writes, mostly so tests stay out of `$HOME`.
    pub fn with_settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.settings_path = path;
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn diff(&self) -> &DiffView {
        &self.diff
    }

    pub fn remotes(&self) -> &RemotesView {
        &self.remotes
    }

    pub fn modal(&self) -> Option<&ActiveModal> {
        self.modal.as_ref()
    }

    pub fn has_pending_requests(&self) -> bool {
        self.queue.in_flight() > 0
    }

    /// Applies every finished git request. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let completions = self.queue.drain();
        let changed = !completions.is_empty();

        for Completion { ticket, outcome } in completions {
            if self.diff.pending == Some(ticket) {
                self.apply_diff(outcome);
            } else if self.remotes.pending == Some(ticket) {
                self.apply_remotes(outcome);
            } else if self
                .modal
                .as_ref()
                .is_some_and(|modal| modal.waiting_on() == Some(ticket))
            {
                self.apply_modal(ticket, outcome);
            } else {
                tracing::debug!(?ticket, "dropping stale completion");
            }
        }

        changed
    }

    pub fn refresh(&mut self) {
        self.reload_diff();
        self.reload_remotes();
        self.set_status_info("Refreshing");
    }

    /// Superseded loads stay in flight but their results are dropped.
    pub fn reload_diff(&mut self) {
        let source = self.diff.source();
        self.diff.source = Some(source);
        let ticket = self.queue.dispatch(git::diff_request(&self.repo_root, source));
        tracing::debug!(?ticket, source = source.label(), "loading diff");
        self.diff.pending = Some(ticket);
    }

    pub fn reload_remotes(&mut self) {
        let ticket = self.queue.dispatch(git::remotes_request(&self.repo_root));
        self.remotes.pending = Some(ticket);
    }

    pub fn cycle_diff_source(&mut self) {
        let next = self.diff.source().cycle();
        self.diff.source = Some(next);
        self.reload_diff();
        self.set_status_info(format!("Diff: {}", next.label()));
    }

    pub fn scroll_diff(&mut self, delta: isize) {
        self.diff.scroller.scroll_by(delta);
    }

    pub fn diff_page_up(&mut self) {
        self.diff.scroller.page_up();
    }

    pub fn diff_page_down(&mut self) {
        self.diff.scroller.page_down();
    }

    pub fn diff_to_top(&mut self) {
        self.diff.scroller.scroll_to_top();
    }

    pub fn diff_to_bottom(&mut self) {
        self.diff.scroller.scroll_to_bottom();
    }

    pub fn move_remote_selection(&mut self, delta: isize) {
        let len = self.remotes.remotes.len();
        if len == 0 {
            return;
        }

        let current = self.remotes.selected.unwrap_or(0);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(len - 1)
        };
        self.remotes.selected = Some(next);
        self.sync_remotes_scroll();
    }

    pub fn is_in_diff(&self, column: u16, row: u16) -> bool {
        self.layout.diff_area.contains(Position::new(column, row))
    }

    pub fn is_diff_focused(&self) -> bool {
        self.pane_focus == PaneFocus::Diff
    }

    pub fn toggle_pane_focus(&mut self) {
        if !self.has_remotes_pane() {
            self.pane_focus = PaneFocus::Diff;
            return;
        }

        self.pane_focus = match self.pane_focus {
            PaneFocus::Diff => PaneFocus::Remotes,
            PaneFocus::Remotes => PaneFocus::Diff,
        };
    }

    pub fn open_git_config_modal(&mut self) {
        let (session, effect) = ModalSession::open(GitConfigForm::new());
        self.open_modal(ActiveModal::GitConfig(session), effect);
    }

    pub fn open_stash_modal(&mut self) {
        let (session, effect) = ModalSession::open(StashForm::new());
        self.open_modal(ActiveModal::Stash(session), effect);
    }

    /// Dropping the session is enough; any reply it awaited is discarded.
    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            tracing::debug!("modal closed");
        }
    }

    pub fn modal_input(&mut self, input: ModalInput) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };

        let effect = modal.handle_input(input);
        self.apply_modal_effect(effect);
    }

    pub fn open_preferences(&mut self) {
        self.close_modal();
        self.preferences_open = true;
        self.set_status_info("Preferences open");
    }

    pub fn close_preferences(&mut self) {
        if !self.preferences_open {
            return;
        }

        self.preferences_open = false;
        match self.flush_settings_if_dirty() {
            Ok(()) => self.set_status_info("Preferences closed"),
            Err(error) => self.set_status_error(format!("{error:#}")),
        }
    }

    pub fn move_preferences_selection(&mut self, delta: isize) {
        let current = self.preferences_selected.min(PREFERENCES_FIELD_COUNT - 1);
        self.preferences_selected = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(PREFERENCES_FIELD_COUNT - 1)
        };
    }

    pub fn adjust_selected_preference(&mut self, delta: isize) {
        match self.preferences_selected {
            0 => {
                self.settings.theme = self.settings.theme.cycle(delta);
                self.set_status_info(format!("Theme: {}", self.settings.theme.label()));
            }
            1 => {
                self.settings.syntax_highlight = !self.settings.syntax_highlight;
                self.set_status_info(if self.settings.syntax_highlight {
                    "Syntax highlighting on"
                } else {
                    "Syntax highlighting off"
                });
            }
            2 => {
                self.settings.remotes_visible = !self.settings.remotes_visible;
                if !self.settings.remotes_visible {
                    self.pane_focus = PaneFocus::Diff;
                }
                self.set_status_info(if self.settings.remotes_visible {
                    "Remotes shown"
                } else {
                    "Remotes hidden"
                });
            }
            3 => {
                self.settings.remotes_width = step_within(
                    self.settings.remotes_width,
                    delta,
                    2,
                    REMOTES_WIDTH_MIN..=REMOTES_WIDTH_MAX,
                );
                self.set_status_info(format!("Remotes width: {}", self.settings.remotes_width));
            }
            _ => return,
        }

        self.settings.normalize();
        self.settings_dirty = true;
    }

    pub fn preferences_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Theme", self.settings.theme.label().to_owned()),
            ("Syntax Highlight", yes_no(self.settings.syntax_highlight)),
            ("Remotes Pane", yes_no(self.settings.remotes_visible)),
            ("Remotes Width", self.settings.remotes_width.to_string()),
        ]
    }

    pub fn config_path_display(&self) -> String {
        match self.settings_path.as_ref() {
            Some(path) => path.display().to_string(),
            None => String::from("<HOME or XDG_CONFIG_HOME not set>"),
        }
    }

    pub fn repo_root_display(&self) -> String {
        self.repo_root.display().to_string()
    }

    pub fn status_text(&self) -> &str {
        self.status.text.as_str()
    }

    pub fn status_kind(&self) -> StatusKind {
        self.status.kind
    }

    pub fn update_layout(&mut self, root: Rect) {
        let (main_area, _) = layout::split_root(root);
        let (diff_area, remotes_area) = layout::split_main_area(main_area, &self.settings);
        let (_, diff_body, _) = layout::split_diff(diff_area);

        self.layout = UiLayout {
            diff_area: diff_body,
            remotes_inner: remotes_area.map_or_else(Rect::default, layout::bordered_inner),
        };

        let page = layout::bordered_inner(diff_body).height as usize;
        self.diff.scroller.set_page_size(page);
        self.sync_remotes_scroll();

        if !self.has_remotes_pane() {
            self.pane_focus = PaneFocus::Diff;
        }
    }

    fn open_modal(&mut self, modal: ActiveModal, effect: ModalEffect) {
        self.preferences_open = false;
        self.modal = Some(modal);
        self.apply_modal_effect(effect);
    }

    fn apply_modal_effect(&mut self, effect: ModalEffect) {
        match effect {
            ModalEffect::None => {}
            ModalEffect::Close => self.close_modal(),
            ModalEffect::Request(commands) => {
                let ticket = self.queue.dispatch(GitRequest {
                    commands,
                    options: ExecOptions::in_dir(&self.repo_root),
                });
                if let Some(modal) = self.modal.as_mut() {
                    modal.await_ticket(ticket);
                }
            }
        }
    }

    fn apply_modal(&mut self, ticket: Ticket, outcome: Result<Vec<GitCommandResult>, GatewayError>) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };

        match modal {
            ActiveModal::GitConfig(session) => match session.complete(ticket, outcome) {
                Reconciled::Submitted { field, .. } => {
                    let label = session.form().field_label(field).to_lowercase();
                    self.set_status_info(format!("Saved git {label}"));
                }
                Reconciled::LoadFailed | Reconciled::SubmitFailed => {
                    let message = session.error().unwrap_or("git identity error").to_owned();
                    self.set_status_error(message);
                }
                Reconciled::Loaded | Reconciled::Ignored => {}
            },
            ActiveModal::Stash(session) => match session.complete(ticket, outcome) {
                Reconciled::Submitted { .. } => {
                    let message = match session.form().created() {
                        Some(msg) if !msg.is_empty() => format!("Stash created: {msg}"),
                        _ => String::from("Stash created"),
                    };
                    self.close_modal();
                    self.reload_diff();
                    self.set_status_info(message);
                }
                Reconciled::SubmitFailed | Reconciled::LoadFailed => {
                    let message = session.error().unwrap_or("stash failed").to_owned();
                    self.set_status_error(message);
                }
                Reconciled::Loaded | Reconciled::Ignored => {}
            },
        }
    }

    fn apply_diff(&mut self, outcome: Result<Vec<GitCommandResult>, GatewayError>) {
        self.diff.pending = None;

        match single_result(outcome) {
            Ok(result) if result.success() => {
                let document = diff::parse(&result.stdout);
                tracing::debug!(lines = document.lines.len(), "diff loaded");
                self.diff.bind(document);
            }
            Ok(result) => {
                let detail = git::failure_detail(&result);
                self.diff.fail(detail.clone());
                self.set_status_warn(format!("Diff unavailable: {detail}"));
            }
            Err(error) => {
                let message = format!("{error:#}");
                self.diff.fail(message.clone());
                self.set_status_error(message);
            }
        }
    }

    fn apply_remotes(&mut self, outcome: Result<Vec<GitCommandResult>, GatewayError>) {
        self.remotes.pending = None;

        match single_result(outcome) {
            Ok(result) if result.success() => {
                self.remotes.bind(git::parse_remotes(&result.stdout));
                self.sync_remotes_scroll();
            }
            Ok(result) => {
                self.remotes.error = Some(git::failure_detail(&result));
            }
            Err(error) => {
                self.remotes.error = Some(format!("{error:#}"));
            }
        }
    }

    fn sync_remotes_scroll(&mut self) {
        let visible = (self.layout.remotes_inner.height as usize / REMOTE_ENTRY_ROWS).max(1);
        self.remotes.scroll = reveal_offset(
            self.remotes.selected,
            self.remotes.remotes.len(),
            visible,
            self.remotes.scroll,
        );
    }

    fn has_remotes_pane(&self) -> bool {
        self.layout.remotes_inner.width > 0
    }

    fn flush_settings_if_dirty(&mut self) -> Result<()> {
        if !self.settings_dirty {
            return Ok(());
        }

        let Some(path) = self.settings_path.as_ref() else {
            return Err(anyhow!(
                "unable to determine config path; set HOME or XDG_CONFIG_HOME"
            ));
        };

        settings::save_to(path, &self.settings)?;
        self.settings_dirty = false;
        Ok(())
    }

    fn set_status_info(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::info(text);
    }

    fn set_status_warn(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::warn(text);
    }

    fn set_status_error(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::error(text);
    }
}

fn single_result(
    outcome: Result<Vec<GitCommandResult>, GatewayError>,
) -> Result<GitCommandResult> {
    outcome?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("git produced no result"))
}

fn yes_no(value: bool) -> String {
    String::from(if value { "Yes" } else { "No" })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::gateway::{ExecOptions, Gateway, GitRequest};
    use crate::modal::ModalInput;
    use crate::settings::{AppSettings, AppTheme};

    use super::{ActiveModal, App, PaneFocus};

    // A gateway whose program never exists: every request completes with a
    // transport failure without touching a real repository.
    fn offline_app() -> App {
        App::new(
            PathBuf::from("/"),
            Gateway::with_program("/nonexistent/gitarbor-test-git"),
            AppSettings::default(),
        )
        .with_settings_path(None)
    }

    fn settle(app: &mut App) {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while app.has_pending_requests() && std::time::Instant::now() < deadline {
            app.tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        app.tick();
    }

    #[test]
    fn transport_failure_shows_diff_error() {
        let mut app = offline_app();
        settle(&mut app);

        assert!(app.diff().error().is_some());
        assert!(app.diff().is_empty());
        assert!(app.status_text().starts_with("Error:"));
    }

    #[test]
    fn only_latest_diff_request_is_applied() {
        let mut app = offline_app();
        let stale = app.diff.pending;
        app.reload_diff();
        assert_ne!(app.diff.pending, stale);

        settle(&mut app);
        assert!(!app.diff().is_loading());
    }

    #[test]
    fn scroll_info_reports_window_or_line_count() {
        let mut app = offline_app();
        app.diff.bind(crate::diff::parse("a\nb\nc"));
        app.diff.scroller.set_page_size(10);
        assert_eq!(app.diff().scroll_info(), "[3 lines]");

        let raw = (0..30).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        app.diff.bind(crate::diff::parse(&raw));
        app.diff.scroller.set_page_size(10);
        app.diff_page_down();
        assert_eq!(app.diff().scroll_info(), "[11-20/30]");
        app.diff_to_bottom();
        assert_eq!(app.diff().scroll_info(), "[21-30/30]");
    }

    #[test]
    fn closing_modal_discards_its_completion() {
        let mut app = offline_app();
        settle(&mut app);

        app.open_git_config_modal();
        assert!(matches!(app.modal(), Some(ActiveModal::GitConfig(_))));
        app.modal_input(ModalInput::Cancel);
        assert!(app.modal().is_none());

        settle(&mut app);
        assert!(app.modal().is_none());
    }

    #[test]
    fn reopened_modal_ignores_previous_session_reply() {
        let mut app = offline_app();
        settle(&mut app);

        app.open_git_config_modal();
        app.close_modal();
        app.open_stash_modal();

        // Unrelated work on the queue must not reach the stash prompt.
        app.queue.dispatch(GitRequest::single(
            vec![String::from("status")],
            ExecOptions::default(),
        ));
        settle(&mut app);

        let Some(ActiveModal::Stash(session)) = app.modal() else {
            panic!("stash modal should still be open");
        };
        assert_eq!(session.error(), None);
    }

    #[test]
    fn preferences_adjust_and_clamp() {
        let mut app = offline_app();
        app.open_preferences();

        app.adjust_selected_preference(1);
        assert_eq!(app.settings.theme, AppTheme::Eighties);

        app.move_preferences_selection(10);
        assert_eq!(app.preferences_selected, 3);
        for _ in 0..100 {
            app.adjust_selected_preference(1);
        }
        assert_eq!(app.settings.remotes_width, crate::settings::REMOTES_WIDTH_MAX);

        app.move_preferences_selection(-1);
        app.adjust_selected_preference(1);
        assert!(!app.settings.remotes_visible);
        assert_eq!(app.pane_focus, PaneFocus::Diff);
    }

    #[test]
    fn closing_preferences_without_config_path_reports_error() {
        let mut app = offline_app();
        app.open_preferences();
        app.adjust_selected_preference(1);
        app.close_preferences();

        assert!(!app.preferences_open);
        assert!(app.status_text().contains("unable to determine config path"));
    }

    #[test]
    fn saves_preferences_on_close() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("config.json");
        let mut app = offline_app().with_settings_path(Some(path.clone()));

        app.open_preferences();
        app.adjust_selected_preference(-1);
        app.close_preferences();

        let saved = crate::settings::load_from(&path).expect("load");
        assert_eq!(saved.theme, AppTheme::Monokai);
    }

    #[test]
    fn focus_stays_on_diff_without_remotes_pane() {
        let mut app = offline_app();
        app.toggle_pane_focus();
        assert!(app.is_diff_focused());
    }
}
