use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::keymap;
use crate::layout;
use crate::modal::stash::MESSAGE_PLACEHOLDER;
use crate::modal::{GitConfigForm, ModalForm, ModalSession, Phase, StashForm};

use super::field::TextField;
use super::palette::{Palette, modal_row_style, rgb};

const NOT_SET: &str = "(not set)";

pub(crate) fn render_identity_modal(
    frame: &mut Frame,
    session: &ModalSession<GitConfigForm>,
    area: Rect,
    palette: &Palette,
) {
    let popup = layout::identity_popup(area);
    let inner = open_popup(frame, popup, session.form().title(), palette);

    let form = session.form();
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(form.field_count() as u16),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let rows = (0..form.field_count())
        .map(|field| {
            let value = form.field_value(field);
            let value = if value.is_empty() { NOT_SET } else { value };
            let selected = field == session.selected();
            Line::styled(
                format!("{}{value}", row_prefix(form.field_label(field), selected)),
                modal_row_style(selected, palette),
            )
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(Text::from(rows)), sections[0]);

    // The value being edited replaces the selected row's value in place.
    if session.phase() == Phase::Editing {
        let selected = session.selected();
        let prefix = row_prefix(form.field_label(selected), true).chars().count() as u16;
        let row = sections[0];
        if row.width > prefix && (selected as u16) < row.height {
            let slot = Rect::new(row.x + prefix, row.y + selected as u16, row.width - prefix, 1);
            TextField::bare(session.buffer())
                .cursor(session.editor().column())
                .render(frame, slot, palette);
        }
    }

    render_error(frame, session.error(), sections[1], palette);

    let hint = match session.phase() {
        Phase::Loading => String::from("Loading..."),
        Phase::Idle => keymap::identity_browse_hint(),
        Phase::Editing => keymap::identity_edit_hint().to_owned(),
        Phase::Submitting => keymap::modal_busy_hint().to_owned(),
        Phase::Error => keymap::modal_error_hint().to_owned(),
    };
    render_hint(frame, &hint, sections[2], palette);
}

fn row_prefix(label: &str, selected: bool) -> String {
    format!("{} {label:<6} ", if selected { ">" } else { " " })
}

pub(crate) fn render_stash_modal(
    frame: &mut Frame,
    session: &ModalSession<StashForm>,
    area: Rect,
    palette: &Palette,
) {
    let popup = layout::stash_popup(area);
    let inner = open_popup(frame, popup, session.form().title(), palette);

    let mut field = TextField::labeled(session.form().field_label(0), session.buffer())
        .placeholder(MESSAGE_PLACEHOLDER);
    if session.phase() == Phase::Editing {
        field = field.cursor(session.editor().column());
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(field.height()),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    field.render(frame, sections[0], palette);
    render_error(frame, session.error(), sections[1], palette);

    let hint = match session.phase() {
        Phase::Submitting => keymap::modal_busy_hint(),
        Phase::Error => keymap::modal_error_hint(),
        Phase::Loading | Phase::Idle | Phase::Editing => keymap::stash_hint(),
    };
    render_hint(frame, hint, sections[2], palette);
}

pub(crate) fn render_preferences_modal(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let popup = layout::preferences_popup(area);
    let inner = open_popup(frame, popup, "Preferences", palette);

    let mut lines = Vec::new();
    for (idx, (label, value)) in app.preferences_rows().iter().enumerate() {
        let selected = idx == app.preferences_selected;
        lines.push(Line::styled(
            format!("{} {label:<18} {value}", if selected { ">" } else { " " }),
            modal_row_style(selected, palette),
        ));
    }

    let dim = Style::default().fg(rgb(palette.muted));
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Use Up/Down to choose a preference and Left/Right to change it.",
        dim,
    ));
    lines.push(Line::styled("Preferences save when this panel closes.", dim));
    lines.push(Line::styled(
        format!("Config path: {}", app.config_path_display()),
        dim,
    ));

    let paragraph =
        Paragraph::new(Text::from(lines)).style(Style::default().bg(rgb(palette.dialog.surface)));
    frame.render_widget(paragraph, inner);
}

fn open_popup(frame: &mut Frame, popup: Rect, title: &str, palette: &Palette) -> Rect {
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(palette.dialog.frame)))
        .style(
            Style::default()
                .bg(rgb(palette.dialog.surface))
                .fg(rgb(palette.text)),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    inner
}

fn render_error(frame: &mut Frame, error: Option<&str>, area: Rect, palette: &Palette) {
    let Some(error) = error else {
        return;
    };

    let paragraph = Paragraph::new(error.to_owned())
        .style(Style::default().fg(rgb(palette.status.error)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_hint(frame: &mut Frame, hint: &str, area: Rect, palette: &Palette) {
    let paragraph = Paragraph::new(hint.to_owned()).style(Style::default().fg(rgb(palette.muted)));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::gateway::{GitCommandResult, Ticket};
    use crate::modal::{GitConfigForm, ModalInput, ModalSession, StashForm};
    use crate::settings::AppTheme;
    use crate::ui::palette::palette_for;

    use super::{render_identity_modal, render_stash_modal};

    fn screen(draw: impl FnOnce(&mut ratatui::Frame, Rect)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area);
            })
            .expect("draw");

        let buffer = terminal.backend().buffer().clone();
        (0..40)
            .map(|y| {
                (0..100)
                    .map(|x| buffer[(x, y)].symbol().to_owned())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn identity_modal_marks_unset_values() {
        let (mut session, _) = ModalSession::open(GitConfigForm::new());
        session.await_ticket(Ticket::from_raw(1));
        let name = GitCommandResult {
            exit_code: 0,
            stdout: String::from("Jane\n"),
            stderr: String::new(),
        };
        let unset = GitCommandResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: String::new(),
        };
        session.complete(Ticket::from_raw(1), Ok(vec![name, unset]));

        let palette = palette_for(AppTheme::Ocean);
        let text = screen(|frame, area| render_identity_modal(frame, &session, area, &palette));

        assert!(text.contains("Git Identity"));
        assert!(text.contains("Jane"));
        assert!(text.contains("(not set)"));
        assert!(text.contains("Up/Down: Navigate | Enter/E: Edit | ESC: Close"));
    }

    #[test]
    fn identity_modal_edits_the_selected_row_in_place() {
        let (mut session, _) = ModalSession::open(GitConfigForm::new());
        session.await_ticket(Ticket::from_raw(1));
        let name = GitCommandResult {
            exit_code: 0,
            stdout: String::from("Jane\n"),
            stderr: String::new(),
        };
        let email = GitCommandResult {
            exit_code: 0,
            stdout: String::from("jane@example.com\n"),
            stderr: String::new(),
        };
        session.complete(Ticket::from_raw(1), Ok(vec![name, email]));
        session.handle_input(ModalInput::Submit);
        session.handle_input(ModalInput::Char('t'));

        let palette = palette_for(AppTheme::Ocean);
        let text = screen(|frame, area| render_identity_modal(frame, &session, area, &palette));

        let row = text
            .lines()
            .find(|line| line.contains("> Name"))
            .expect("selected row");
        assert!(row.contains("> Name   Janet"));
        assert!(text.contains("jane@example.com"));
    }

    #[test]
    fn stash_modal_shows_placeholder_until_typed() {
        let (session, _) = ModalSession::open(StashForm::new());
        let palette = palette_for(AppTheme::Ocean);
        let text = screen(|frame, area| render_stash_modal(frame, &session, area, &palette));

        assert!(text.contains("Create Stash"));
        assert!(text.contains("Message (optional)"));
        assert!(text.contains("Description of stashed changes"));
    }
}
