use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::settings::AppTheme;

// WCAG AA for body text.
const MIN_CONTRAST: f32 = 4.5;
const LIFT_STEPS: u8 = 16;

/// Syntect themes tried for each app theme, most preferred first.
fn theme_candidates(theme: AppTheme) -> &'static [&'static str] {
    match theme {
        AppTheme::Ocean => &["base16-ocean.dark", "base16-ocean.light"],
        AppTheme::Eighties => &["base16-eighties.dark", "base16-eighties.light"],
        AppTheme::Solarized => &["Solarized (dark)", "Solarized (light)"],
        AppTheme::Monokai => &["Monokai Extended", "Monokai Extended Bright"],
    }
}

/// Colours diff content by file extension. Built once at startup since
/// loading the syntax set is slow.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    themes: Vec<(AppTheme, Theme)>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        let mut available = ThemeSet::load_defaults().themes;
        let fallback = available.values().next().cloned().unwrap_or_default();

        let themes = AppTheme::ALL
            .iter()
            .map(|&app_theme| {
                let theme = theme_candidates(app_theme)
                    .iter()
                    .find_map(|name| available.remove(*name))
                    .unwrap_or_else(|| fallback.clone());
                (app_theme, theme)
            })
            .collect();

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            themes,
        }
    }

    /// Highlights one line of file content. Every returned span is readable
    /// on `background`; an unknown extension is treated as plain text.
    pub fn highlight_line(
        &self,
        extension: Option<&str>,
        line: &str,
        background: (u8, u8, u8),
        app_theme: AppTheme,
    ) -> Vec<Span<'static>> {
        if line.is_empty() {
            return vec![Span::raw(String::new())];
        }

        let Some(theme) = self.theme_for(app_theme) else {
            return vec![Span::raw(line.to_owned())];
        };

        let background = Rgb::from(background);
        let mut lines = HighlightLines::new(self.syntax_for(extension), theme);
        match lines.highlight_line(line, &self.syntax_set) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(style, segment)| {
                    let fg = Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    Span::styled(
                        segment.to_owned(),
                        Style::default().fg(fg.readable_on(background).into()),
                    )
                })
                .collect(),
            Err(error) => {
                tracing::debug!(%error, "syntax highlighting failed");
                vec![Span::raw(line.to_owned())]
            }
        }
    }

    fn theme_for(&self, app_theme: AppTheme) -> Option<&Theme> {
        self.themes
            .iter()
            .find(|(candidate, _)| *candidate == app_theme)
            .map(|(_, theme)| theme)
    }

    fn syntax_for(&self, extension: Option<&str>) -> &SyntaxReference {
        extension
            .and_then(|ext| self.syntax_set.find_syntax_by_extension(ext))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self(r, g, b)
    }
}

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

impl Rgb {
    const WHITE: Self = Self(255, 255, 255);
    const BLACK: Self = Self(0, 0, 0);

    /// Blends toward white or black, whichever contrasts more with
    /// `background`, until the ratio reaches [`MIN_CONTRAST`].
    fn readable_on(self, background: Self) -> Self {
        if self.contrast(background) >= MIN_CONTRAST {
            return self;
        }

        let target = if Self::WHITE.contrast(background) >= Self::BLACK.contrast(background) {
            Self::WHITE
        } else {
            Self::BLACK
        };

        (1..=LIFT_STEPS)
            .map(|step| self.mix(target, f32::from(step) / f32::from(LIFT_STEPS)))
            .find(|candidate| candidate.contrast(background) >= MIN_CONTRAST)
            .unwrap_or(target)
    }

    fn mix(self, other: Self, t: f32) -> Self {
        let channel = |from: u8, to: u8| {
            let from = f32::from(from);
            (from + (f32::from(to) - from) * t).round().clamp(0.0, 255.0) as u8
        };
        Self(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    fn contrast(self, other: Self) -> f32 {
        let (a, b) = (self.luminance(), other.luminance());
        (a.max(b) + 0.05) / (a.min(b) + 0.05)
    }

    fn luminance(self) -> f32 {
        let linear = |channel: u8| {
            let value = f32::from(channel) / 255.0;
            if value <= 0.04045 {
                value / 12.92
            } else {
                ((value + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.0) + 0.7152 * linear(self.1) + 0.0722 * linear(self.2)
    }
}
