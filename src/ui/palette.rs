use ratatui::style::{Color, Modifier, Style};

use crate::settings::AppTheme;

pub(crate) type Tint = (u8, u8, u8);

/// Colours for one theme, grouped by what they paint.
#[derive(Clone, Copy)]
pub(crate) struct Palette {
    pub base: Tint,
    pub text: Tint,
    pub muted: Tint,
    pub frame: Tint,
    pub frame_focus: Tint,
    pub selection: Tint,
    pub selection_idle: Tint,
    pub diff: DiffTints,
    pub dialog: DialogTints,
    pub status: StatusTints,
}

/// One entry per [`crate::diff::LineKind`] that is not plain context.
#[derive(Clone, Copy)]
pub(crate) struct DiffTints {
    pub added_bg: Tint,
    pub added_sign: Tint,
    pub removed_bg: Tint,
    pub removed_sign: Tint,
    pub hunk: Tint,
    pub hunk_bg: Tint,
    pub file_header: Tint,
    pub mode_notice: Tint,
    pub binary_notice: Tint,
}

#[derive(Clone, Copy)]
pub(crate) struct DialogTints {
    pub surface: Tint,
    pub frame: Tint,
    pub selection: Tint,
}

#[derive(Clone, Copy)]
pub(crate) struct StatusTints {
    pub info: Tint,
    pub warn: Tint,
    pub error: Tint,
}

/// The handful of named colours a theme is defined by. Everything else is
/// blended from these.
struct Seed {
    background: Tint,
    foreground: Tint,
    accent: Tint,
    green: Tint,
    red: Tint,
    yellow: Tint,
    cyan: Tint,
    magenta: Tint,
}

fn seed_for(theme: AppTheme) -> Seed {
    match theme {
        AppTheme::Ocean => Seed {
            background: (43, 48, 59),
            foreground: (192, 197, 206),
            accent: (143, 161, 179),
            green: (163, 190, 140),
            red: (191, 97, 106),
            yellow: (235, 203, 139),
            cyan: (150, 181, 180),
            magenta: (180, 142, 173),
        },
        AppTheme::Eighties => Seed {
            background: (45, 45, 45),
            foreground: (211, 208, 200),
            accent: (102, 153, 204),
            green: (153, 204, 153),
            red: (242, 119, 122),
            yellow: (255, 204, 102),
            cyan: (102, 204, 204),
            magenta: (204, 153, 204),
        },
        AppTheme::Solarized => Seed {
            background: (0, 43, 54),
            foreground: (238, 232, 213),
            accent: (38, 139, 210),
            green: (133, 153, 0),
            red: (220, 50, 47),
            yellow: (181, 137, 0),
            cyan: (42, 161, 152),
            magenta: (211, 54, 130),
        },
        AppTheme::Monokai => Seed {
            background: (39, 40, 34),
            foreground: (248, 248, 242),
            accent: (102, 217, 239),
            green: (166, 226, 46),
            red: (249, 38, 114),
            yellow: (230, 219, 116),
            cyan: (102, 217, 239),
            magenta: (174, 129, 255),
        },
    }
}

pub(crate) fn palette_for(theme: AppTheme) -> Palette {
    let seed = seed_for(theme);
    let bg = seed.background;
    let fg = seed.foreground;

    Palette {
        base: bg,
        text: fg,
        muted: blend(fg, bg, 0.4),
        frame: blend(fg, bg, 0.6),
        frame_focus: seed.yellow,
        selection: blend(bg, seed.accent, 0.35),
        selection_idle: blend(bg, seed.accent, 0.2),
        diff: DiffTints {
            added_bg: blend(bg, seed.green, 0.2),
            added_sign: seed.green,
            removed_bg: blend(bg, seed.red, 0.2),
            removed_sign: seed.red,
            hunk: seed.cyan,
            hunk_bg: blend(bg, fg, 0.08),
            file_header: seed.accent,
            mode_notice: seed.magenta,
            binary_notice: seed.yellow,
        },
        dialog: DialogTints {
            surface: blend(bg, fg, 0.05),
            frame: blend(fg, bg, 0.25),
            selection: blend(bg, seed.accent, 0.4),
        },
        status: StatusTints {
            info: blend(fg, bg, 0.3),
            warn: seed.yellow,
            error: seed.red,
        },
    }
}

/// Moves `from` toward `to` by `amount` (0 keeps `from`, 1 gives `to`).
fn blend(from: Tint, to: Tint, amount: f32) -> Tint {
    let channel = |a: u8, b: u8| {
        let a = f32::from(a);
        (a + (f32::from(b) - a) * amount).round().clamp(0.0, 255.0) as u8
    };
    (
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

pub(crate) fn border_style(focused: bool, palette: &Palette) -> Style {
    let tint = if focused {
        palette.frame_focus
    } else {
        palette.frame
    };
    Style::default().fg(rgb(tint))
}

/// Selected remote row; bold only while the remotes pane has focus.
pub(crate) fn selected_style(focused: bool, palette: &Palette) -> Style {
    let style = Style::default().fg(rgb(palette.text));
    if focused {
        style
            .bg(rgb(palette.selection))
            .add_modifier(Modifier::BOLD)
    } else {
        style.bg(rgb(palette.selection_idle))
    }
}

/// A row inside a dialog; the selected one is bold on the dialog highlight.
pub(crate) fn modal_row_style(selected: bool, palette: &Palette) -> Style {
    let style = Style::default().fg(rgb(palette.text));
    if selected {
        style
            .bg(rgb(palette.dialog.selection))
            .add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub(crate) fn rgb((r, g, b): Tint) -> Color {
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use crate::settings::AppTheme;

    use super::{blend, palette_for};

    #[test]
    fn blend_endpoints_and_midpoint() {
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.0), (0, 0, 0));
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 1.0), (200, 100, 50));
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
    }

    #[test]
    fn change_backgrounds_stand_out_from_pane() {
        for theme in AppTheme::ALL {
            let palette = palette_for(theme);
            assert_ne!(palette.diff.added_bg, palette.base);
            assert_ne!(palette.diff.removed_bg, palette.base);
            assert_ne!(palette.diff.added_bg, palette.diff.removed_bg);
        }
    }

    #[test]
    fn dialogs_and_status_use_distinct_tints() {
        for theme in AppTheme::ALL {
            let palette = palette_for(theme);
            assert_ne!(palette.dialog.surface, palette.base);
            assert_ne!(palette.dialog.selection, palette.dialog.surface);
            assert_ne!(palette.status.error, palette.status.info);
            assert_ne!(palette.status.warn, palette.status.info);
        }
    }
}
