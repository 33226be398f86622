use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::settings::{self, AppSettings};

pub const MIN_DIFF_WIDTH_WITH_REMOTES: u16 = 48;
pub const IDENTITY_MODAL_WIDTH_PERCENT: u16 = 60;
pub const IDENTITY_MODAL_HEIGHT_PERCENT: u16 = 40;
pub const STASH_MODAL_WIDTH_PERCENT: u16 = 56;
pub const STASH_MODAL_HEIGHT_PERCENT: u16 = 30;
pub const PREFERENCES_MODAL_WIDTH_PERCENT: u16 = 70;
pub const PREFERENCES_MODAL_HEIGHT_PERCENT: u16 = 50;

pub fn split_root(root: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(root);
    (rows[0], rows[1])
}

/// Diff on the left, remotes on the right when enabled and there is room.
pub fn split_main_area(area: Rect, settings: &AppSettings) -> (Rect, Option<Rect>) {
    if !settings.remotes_visible || area.width <= MIN_DIFF_WIDTH_WITH_REMOTES {
        return (area, None);
    }

    let max_remotes = area.width.saturating_sub(MIN_DIFF_WIDTH_WITH_REMOTES);
    let requested = settings
        .remotes_width
        .clamp(settings::REMOTES_WIDTH_MIN, settings::REMOTES_WIDTH_MAX);
    let remotes_width = requested.min(max_remotes);
    if remotes_width < settings::REMOTES_WIDTH_MIN {
        return (area, None);
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(remotes_width)])
        .split(area);

    (chunks[0], Some(chunks[1]))
}

/// Header line, bordered body, scroll hint line.
pub fn split_diff(diff_area: Rect) -> (Rect, Rect, Rect) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(diff_area);
    (sections[0], sections[1], sections[2])
}

pub fn centered_rect(horizontal_percent: u16, vertical_percent: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - vertical_percent) / 2),
            Constraint::Percentage(vertical_percent),
            Constraint::Percentage((100 - vertical_percent) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - horizontal_percent) / 2),
            Constraint::Percentage(horizontal_percent),
            Constraint::Percentage((100 - horizontal_percent) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn identity_popup(area: Rect) -> Rect {
    centered_rect(
        IDENTITY_MODAL_WIDTH_PERCENT,
        IDENTITY_MODAL_HEIGHT_PERCENT,
        area,
    )
}

pub fn stash_popup(area: Rect) -> Rect {
    centered_rect(STASH_MODAL_WIDTH_PERCENT, STASH_MODAL_HEIGHT_PERCENT, area)
}

pub fn preferences_popup(area: Rect) -> Rect {
    centered_rect(
        PREFERENCES_MODAL_WIDTH_PERCENT,
        PREFERENCES_MODAL_HEIGHT_PERCENT,
        area,
    )
}

pub fn bordered_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}
