use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, PaneFocus};
use crate::diff::{DiffDocument, DiffLine, LineKind};
use crate::highlight::Highlighter;
use crate::keymap;
use crate::settings::AppTheme;

use super::palette::{Palette, border_style, rgb};

pub(crate) fn render_diff_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let view = app.diff();
    let mut text = format!("[{}] {}", view.source().label(), header_text(view.document()));
    if view.is_loading() {
        text.push_str(" (loading...)");
    }

    let header = Paragraph::new(text).style(Style::default().fg(rgb(palette.muted)));
    frame.render_widget(header, area);
}

pub(crate) fn render_diff_body(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    highlighter: &Highlighter,
    palette: &Palette,
) {
    let view = app.diff();
    let document = view.document();
    let dim = Style::default().fg(rgb(palette.muted));

    let lines = if let Some(error) = view.error() {
        vec![Line::styled(
            error.to_owned(),
            Style::default().fg(rgb(palette.status.error)),
        )]
    } else if document.is_binary {
        vec![
            Line::styled("Binary file - cannot display diff", dim),
            Line::styled(document.file_path.clone().unwrap_or_default(), dim),
        ]
    } else if view.is_empty() {
        vec![Line::styled("No changes to display", dim)]
    } else {
        let theme = app.settings.syntax_highlight.then_some((highlighter, app.settings.theme));
        let extension = document.file_extension();
        view.scroller()
            .visible_slice()
            .iter()
            .map(|line| build_line(line, extension, theme, palette))
            .collect()
    };

    let focused = app.pane_focus == PaneFocus::Diff;
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Diff ")
                .border_style(border_style(focused, palette)),
        )
        .style(
            Style::default()
                .fg(rgb(palette.text))
                .bg(rgb(palette.base)),
        );

    frame.render_widget(paragraph, area);
}

pub(crate) fn render_diff_hint(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let text = format!("{}  {}", app.diff().scroll_info(), keymap::diff_scroll_hint());
    let hint = Paragraph::new(text).style(Style::default().fg(rgb(palette.muted)));
    frame.render_widget(hint, area);
}

/// `File: x [Binary] Mode: a → b`, with absent parts left out.
fn header_text(document: &DiffDocument) -> String {
    let mut parts = Vec::new();
    if let Some(path) = document.file_path.as_deref() {
        parts.push(format!("File: {path}"));
    }
    if document.is_binary {
        parts.push(String::from("[Binary]"));
    }
    if let Some(change) = document.mode_change.as_ref() {
        parts.push(format!("Mode: {} → {}", change.old, change.new));
    }

    if parts.is_empty() {
        String::from("No file")
    } else {
        parts.join(" ")
    }
}

fn build_line(
    line: &DiffLine,
    extension: Option<&str>,
    highlight: Option<(&Highlighter, AppTheme)>,
    palette: &Palette,
) -> Line<'static> {
    match line.kind {
        LineKind::Added | LineKind::Removed | LineKind::Context => {
            let (marker_color, bg) = match line.kind {
                LineKind::Added => (palette.diff.added_sign, palette.diff.added_bg),
                LineKind::Removed => (palette.diff.removed_sign, palette.diff.removed_bg),
                _ => (palette.muted, palette.base),
            };

            let mut chars = line.text.chars();
            let marker = chars.next().map(String::from).unwrap_or_default();
            let content = chars.as_str();

            let mut spans = vec![Span::styled(marker, Style::default().fg(rgb(marker_color)))];
            match highlight {
                Some((highlighter, theme)) => {
                    spans.extend(highlighter.highlight_line(extension, content, bg, theme));
                }
                None => spans.push(Span::raw(content.to_owned())),
            }

            Line::from(spans).style(Style::default().bg(rgb(bg)))
        }
        LineKind::HunkHeader => Line::styled(
            line.text.clone(),
            Style::default()
                .fg(rgb(palette.diff.hunk))
                .bg(rgb(palette.diff.hunk_bg)),
        ),
        LineKind::FileHeader => Line::styled(
            line.text.clone(),
            Style::default()
                .fg(rgb(palette.diff.file_header))
                .add_modifier(Modifier::BOLD),
        ),
        LineKind::ModeNotice => {
            Line::styled(line.text.clone(), Style::default().fg(rgb(palette.diff.mode_notice)))
        }
        LineKind::BinaryNotice => {
            Line::styled(line.text.clone(), Style::default().fg(rgb(palette.diff.binary_notice)))
        }
    }
}
