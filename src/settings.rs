use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const REMOTES_WIDTH_MIN: u16 = 24;
pub const REMOTES_WIDTH_MAX: u16 = 72;

const CONFIG_DIR: &str = "gitarbor";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppTheme {
    Ocean,
    Eighties,
    Solarized,
    Monokai,
}

impl AppTheme {
    pub const ALL: [Self; 4] = [Self::Ocean, Self::Eighties, Self::Solarized, Self::Monokai];

    pub fn cycle(self, delta: isize) -> Self {
        cycle(Self::ALL, self, delta)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ocean => "Ocean",
            Self::Eighties => "Eighties",
            Self::Solarized => "Solarized",
            Self::Monokai => "Monokai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: AppTheme,
    pub syntax_highlight: bool,
    pub remotes_visible: bool,
    pub remotes_width: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: AppTheme::Ocean,
            syntax_highlight: true,
            remotes_visible: true,
            remotes_width: 36,
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.remotes_width = self
            .remotes_width
            .clamp(REMOTES_WIDTH_MIN, REMOTES_WIDTH_MAX);
    }
}

/// Never fails: a missing file is the default configuration and an unreadable
/// one is logged and replaced by defaults.
pub fn load() -> AppSettings {
    let Some(path) = config_file_path() else {
        return AppSettings::default();
    };

    match load_from(&path) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(path = %path.display(), error = ?error, "using default settings");
            AppSettings::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at `{}`", path.display()))?;
    let mut settings: AppSettings = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse settings at `{}`", path.display()))?;
    settings.normalize();

    Ok(settings)
}

pub fn save_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create config directory `{}`",
                parent.to_string_lossy()
            )
        })?;
    }

    let mut normalized = settings.clone();
    normalized.normalize();
    let json = serde_json::to_string_pretty(&normalized).context("failed to serialize settings")?;

    fs::write(path, json)
        .with_context(|| format!("failed to write settings to `{}`", path.display()))?;
    tracing::debug!(path = %path.display(), "settings saved");

    Ok(())
}

pub fn config_file_path() -> Option<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(CONFIG_DIR).join(CONFIG_FILE));
    }

    env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    })
}

fn cycle<T: Copy + Eq, const N: usize>(items: [T; N], current: T, delta: isize) -> T {
    let len = items.len();
    let idx = items.iter().position(|item| *item == current).unwrap_or(0);

    let shift = if delta >= 0 {
        delta as usize % len
    } else {
        let abs = delta.unsigned_abs() % len;
        (len - abs) % len
    };

    items[(idx + shift) % len]
}
