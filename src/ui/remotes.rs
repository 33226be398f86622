use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, PaneFocus};
use crate::git::GitRemote;

use super::palette::{Palette, border_style, rgb, selected_style};

pub(crate) fn render_remotes(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let view = app.remotes();
    let focused = app.pane_focus == PaneFocus::Remotes;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Remotes ({}) ", view.remotes().len()))
        .border_style(border_style(focused, palette));

    let dim = Style::default().fg(rgb(palette.muted));
    let mut lines = Vec::new();

    if let Some(error) = view.error() {
        lines.push(Line::styled(
            error.to_owned(),
            Style::default().fg(rgb(palette.status.error)),
        ));
    } else if view.remotes().is_empty() {
        let text = if view.is_loading() {
            "Loading remotes..."
        } else {
            "No remotes configured"
        };
        lines.push(Line::styled(text, dim));
    } else {
        for (idx, remote) in view.remotes().iter().enumerate().skip(view.scroll()) {
            let selected = view.selected() == Some(idx);
            lines.extend(remote_lines(remote, selected, focused, palette));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .style(Style::default().bg(rgb(palette.base)));
    frame.render_widget(paragraph, area);
}

fn remote_lines(
    remote: &GitRemote,
    selected: bool,
    focused: bool,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let name_style = if selected {
        selected_style(focused, palette)
    } else {
        Style::default()
            .fg(rgb(palette.text))
            .add_modifier(Modifier::BOLD)
    };
    let url_style = Style::default().fg(rgb(palette.muted));

    let mut lines = vec![
        Line::styled(
            format!("{}{}", if selected { "> " } else { "  " }, remote.name),
            name_style,
        ),
        Line::styled(format!("    fetch: {}", remote.fetch_url), url_style),
    ];
    if remote.push_url != remote.fetch_url {
        lines.push(Line::styled(format!("    push: {}", remote.push_url), url_style));
    }
    lines
}
