mod diff;
mod field;
mod modal;
mod palette;
mod remotes;

use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{ActiveModal, App, StatusKind};
use crate::highlight::Highlighter;
use crate::keymap;
use crate::layout;

use self::palette::{palette_for, rgb};

pub fn render(frame: &mut Frame, app: &App, highlighter: &Highlighter) {
    let palette = palette_for(app.settings.theme);
    let root = frame.area();

    let (main_area, footer_area) = layout::split_root(root);
    let (diff_area, remotes_area) = layout::split_main_area(main_area, &app.settings);
    let (header_area, body_area, hint_area) = layout::split_diff(diff_area);

    diff::render_diff_header(frame, app, header_area, &palette);
    diff::render_diff_body(frame, app, body_area, highlighter, &palette);
    diff::render_diff_hint(frame, app, hint_area, &palette);

    if let Some(area) = remotes_area {
        remotes::render_remotes(frame, app, area, &palette);
    }

    render_footer(frame, app, footer_area, &palette);

    match app.modal() {
        Some(ActiveModal::GitConfig(session)) => {
            modal::render_identity_modal(frame, session, root, &palette);
        }
        Some(ActiveModal::Stash(session)) => {
            modal::render_stash_modal(frame, session, root, &palette);
        }
        None if app.preferences_open => {
            modal::render_preferences_modal(frame, app, root, &palette);
        }
        None => {}
    }
}

fn render_footer(
    frame: &mut Frame,
    app: &App,
    area: ratatui::layout::Rect,
    palette: &palette::Palette,
) {
    let status_color = match app.status_kind() {
        StatusKind::Info => palette.status.info,
        StatusKind::Warn => palette.status.warn,
        StatusKind::Error => palette.status.error,
    };

    let hints = footer_hint_variants(app);
    let (status_text, hint_text) = fit_footer_parts(app.status_text(), &hints, area.width as usize);

    let mut spans = Vec::new();
    if !status_text.is_empty() {
        spans.push(Span::styled(
            status_text,
            Style::default().fg(rgb(status_color)),
        ));
    }
    if !hint_text.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(rgb(palette.muted))));
        spans.push(Span::styled(
            hint_text,
            Style::default().fg(rgb(palette.muted)),
        ));
    }

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}

fn footer_hint_variants(app: &App) -> Vec<String> {
    match app.modal() {
        Some(ActiveModal::GitConfig(_)) => {
            return vec![
                keymap::identity_browse_hint(),
                String::from("identity: Enter edit  Esc close"),
            ];
        }
        Some(ActiveModal::Stash(_)) => {
            return vec![
                keymap::stash_hint().to_owned(),
                String::from("stash: Enter create  Esc cancel"),
            ];
        }
        None => {}
    }

    if app.preferences_open {
        return vec![
            keymap::footer_hint_preferences().to_owned(),
            String::from("preferences: Esc close"),
        ];
    }

    vec![
        keymap::footer_hint_main(),
        String::from("Tab pane  j/k move  d source  r refresh  c identity  s stash  o prefs  q quit"),
        format!("{}  q quit", app.repo_root_display()),
    ]
}

const FOOTER_SEPARATOR: &str = " | ";
const FOOTER_MIN_PART: usize = 8;

/// Splits `width` columns between the status and a hint. The first hint
/// variant that fits beside the full status wins; failing that the status is
/// shortened for the shortest variant, and a status that alone overflows
/// drops the hint.
fn fit_footer_parts(status: &str, hint_variants: &[String], width: usize) -> (String, String) {
    let status_width = status.chars().count();
    let separator = FOOTER_SEPARATOR.len();
    if status_width >= width {
        return (ellipsize(status, width), String::new());
    }

    if let Some(hint) = hint_variants
        .iter()
        .find(|hint| status_width + separator + hint.chars().count() <= width)
    {
        return (status.to_owned(), hint.clone());
    }

    let Some(shortest) = hint_variants.iter().min_by_key(|hint| hint.chars().count()) else {
        return (status.to_owned(), String::new());
    };

    let status_room = width.saturating_sub(separator + shortest.chars().count());
    if status_room >= FOOTER_MIN_PART {
        return (ellipsize(status, status_room), shortest.clone());
    }

    let hint_room = width.saturating_sub(separator + FOOTER_MIN_PART);
    if hint_room >= FOOTER_MIN_PART {
        return (
            ellipsize(status, FOOTER_MIN_PART),
            ellipsize(shortest, hint_room),
        );
    }

    (ellipsize(status, width), String::new())
}

fn ellipsize(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_owned();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let cut = text
        .char_indices()
        .nth(max_width - 3)
        .map_or(text.len(), |(idx, _)| idx);
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::{ellipsize, fit_footer_parts};

    fn used_width(status: &str, hint: &str) -> usize {
        let hint_width = if hint.is_empty() {
            0
        } else {
            3 + hint.chars().count()
        };
        status.chars().count() + hint_width
    }

    #[test]
    fn ellipsize_counts_chars() {
        assert_eq!(ellipsize("stash", 5), "stash");
        assert_eq!(ellipsize("stashed", 6), "sta...");
        assert_eq!(ellipsize("éééééé", 5), "éé...");
        assert_eq!(ellipsize("stashed", 2), "..");
    }

    #[test]
    fn picks_first_hint_variant_that_fits() {
        let hints = vec![
            String::from("a hint far too long for this footer"),
            String::from("short hint"),
        ];

        let (status, hint) = fit_footer_parts("Ready", &hints, 28);
        assert_eq!(status, "Ready");
        assert_eq!(hint, "short hint");
        assert!(used_width(&status, &hint) <= 28);
    }

    #[test]
    fn shortens_status_to_keep_a_hint() {
        let hints = vec![String::from("Enter: Save | ESC: Cancel and discard")];
        let (status, hint) =
            fit_footer_parts("Error: Failed to save email: could not lock", &hints, 60);

        assert_eq!(hint, hints[0]);
        assert_eq!(status.chars().count(), 20);
        assert!(status.ends_with("..."));
        assert!(used_width(&status, &hint) <= 60);
    }

    #[test]
    fn overflowing_status_drops_the_hint() {
        let hints = vec![String::from("long hint")];
        let (status, hint) = fit_footer_parts("Stash created", &hints, 7);

        assert!(hint.is_empty());
        assert_eq!(status, "Stas...");
    }
}
