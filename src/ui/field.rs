use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::palette::{Palette, rgb};

/// A single-line text input. The caller picks the framing: [`TextField::bare`]
/// draws the value alone, [`TextField::labeled`] wraps it in a titled frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextField<'a> {
    label: Option<&'a str>,
    value: &'a str,
    cursor: Option<usize>,
    placeholder: Option<&'a str>,
}

impl<'a> TextField<'a> {
    pub(crate) fn bare(value: &'a str) -> Self {
        Self {
            label: None,
            value,
            cursor: None,
            placeholder: None,
        }
    }

    pub(crate) fn labeled(label: &'a str, value: &'a str) -> Self {
        Self {
            label: Some(label),
            ..Self::bare(value)
        }
    }

    /// Shows the terminal caret this many characters into the value.
    pub(crate) fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub(crate) fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub(crate) fn height(&self) -> u16 {
        if self.label.is_some() { 3 } else { 1 }
    }

    pub(crate) fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let line = if self.value.is_empty() {
            Line::styled(
                self.placeholder.unwrap_or_default().to_owned(),
                Style::default()
                    .fg(rgb(palette.muted))
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Line::styled(self.value.to_owned(), Style::default().fg(rgb(palette.text)))
        };

        let mut paragraph = Paragraph::new(line).style(Style::default().bg(rgb(palette.dialog.surface)));
        let mut text_area = area;
        if let Some(label) = self.label {
            let block = Block::default()
                .title(format!(" {label} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(rgb(palette.dialog.frame)));
            text_area = block.inner(area);
            paragraph = paragraph.block(block);
        }
        frame.render_widget(paragraph, area);

        if let Some(cursor) = self.cursor
            && text_area.width > 0
            && text_area.height > 0
        {
            let column = cursor.min(usize::from(text_area.width - 1));
            frame.set_cursor_position(Position::new(text_area.x + column as u16, text_area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::settings::AppTheme;
    use crate::ui::palette::palette_for;

    use super::TextField;

    fn rendered_rows(field: TextField<'_>, width: u16) -> Vec<String> {
        let height = field.height();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        let palette = palette_for(AppTheme::Ocean);
        terminal
            .draw(|frame| field.render(frame, Rect::new(0, 0, width, height), &palette))
            .expect("draw");

        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_owned())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn bare_field_is_one_row() {
        let rows = rendered_rows(TextField::bare("hello"), 10);
        assert_eq!(rows, vec![String::from("hello     ")]);
    }

    #[test]
    fn labeled_field_frames_the_value_with_its_label() {
        let rows = rendered_rows(TextField::labeled("Name", "Jane"), 14);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains(" Name "));
        assert!(rows[1].contains("Jane"));
    }

    #[test]
    fn empty_value_shows_placeholder() {
        let rows = rendered_rows(TextField::bare("").placeholder("type here"), 12);
        assert!(rows[0].starts_with("type here"));
    }
}
