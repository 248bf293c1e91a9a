use std::{collections::HashMap, fmt, fs, path::Path, str::FromStr, time::Duration};

use anyhow::Context;

use crate::animator::{AnimationTuning, Axis, OverflowPolicy};

pub const SETTINGS_FILE: &str = "board.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// One looping row per bucket.
    Marquee,
    /// Paged weekly grid.
    Grid,
}

impl PresentationMode {
    pub fn overflow_policy(self) -> OverflowPolicy {
        match self {
            PresentationMode::Marquee => OverflowPolicy::SeamlessLoop,
            PresentationMode::Grid => OverflowPolicy::ScrollAndHold,
        }
    }

    pub fn scroll_axis(self) -> Axis {
        match self {
            PresentationMode::Marquee => Axis::Horizontal,
            PresentationMode::Grid => Axis::Vertical,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Marquee => f.write_str("marquee"),
            PresentationMode::Grid => f.write_str("grid"),
        }
    }
}

impl FromStr for PresentationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marquee" | "buckets" => Ok(PresentationMode::Marquee),
            "grid" | "slides" => Ok(PresentationMode::Grid),
            other => Err(anyhow::anyhow!("unknown presentation mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// URL or file path of the board document.
    pub source: String,
    pub refresh_interval: Duration,
    pub presentation_mode: PresentationMode,
    pub rows_per_page: usize,
    pub rotation_interval: Duration,
    pub scroll_rate: f32,
    pub min_hold_duration: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: "data/shipments_by_day.json".into(),
            refresh_interval: Duration::from_secs(300),
            presentation_mode: PresentationMode::Marquee,
            rows_per_page: 10,
            rotation_interval: Duration::from_secs(10),
            scroll_rate: crate::animator::DEFAULT_SCROLL_RATE,
            min_hold_duration: crate::animator::DEFAULT_MIN_HOLD_DURATION,
        }
    }
}

impl Settings {
    pub fn animation_tuning(&self) -> AnimationTuning {
        AnimationTuning {
            scroll_rate: self.scroll_rate,
            min_hold_duration: self.min_hold_duration,
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "source" | "source_url" => self.source = value.to_string(),
            "refresh_interval_secs" => set_secs(&mut self.refresh_interval, value),
            "presentation_mode" | "mode" => {
                if let Ok(mode) = value.parse() {
                    self.presentation_mode = mode;
                }
            }
            "rows_per_page" => {
                if let Ok(parsed) = value.trim().parse::<usize>() {
                    self.rows_per_page = parsed.max(1);
                }
            }
            "rotation_interval_secs" => set_secs(&mut self.rotation_interval, value),
            "scroll_rate" => {
                if let Ok(parsed) = value.trim().parse::<f32>() {
                    if parsed.is_finite() && parsed > 0.0 {
                        self.scroll_rate = parsed;
                    }
                }
            }
            "min_hold_secs" => set_secs(&mut self.min_hold_duration, value),
            _ => {}
        }
    }
}

fn set_secs(slot: &mut Duration, value: &str) {
    if let Ok(parsed) = value.trim().parse::<u64>() {
        *slot = Duration::from_secs(parsed);
    }
}

const ENV_KEYS: &[(&str, &str)] = &[
    ("BOARD_SOURCE", "source"),
    ("APP__SOURCE", "source"),
    ("BOARD_REFRESH_SECS", "refresh_interval_secs"),
    ("APP__REFRESH_INTERVAL_SECS", "refresh_interval_secs"),
    ("BOARD_MODE", "presentation_mode"),
    ("APP__PRESENTATION_MODE", "presentation_mode"),
    ("APP__ROWS_PER_PAGE", "rows_per_page"),
    ("APP__ROTATION_INTERVAL_SECS", "rotation_interval_secs"),
    ("APP__SCROLL_RATE", "scroll_rate"),
    ("APP__MIN_HOLD_SECS", "min_hold_secs"),
];

/// Defaults, then `board.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    match read_settings_file(Path::new(SETTINGS_FILE)) {
        Ok(Some(file_cfg)) => apply_table(&mut settings, &file_cfg),
        Ok(None) => {}
        Err(err) => tracing::warn!("ignoring {SETTINGS_FILE}: {err:#}"),
    }

    apply_env(&mut settings, |var| std::env::var(var).ok());

    settings
}

/// Applies `BOARD_*` / `APP__*` overrides, reading each variable through `lookup`.
pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for &(var, key) in ENV_KEYS {
        if let Some(value) = lookup(var) {
            settings.apply(key, &value);
        }
    }
}

pub fn apply_table(settings: &mut Settings, table: &HashMap<String, String>) {
    for (key, value) in table {
        settings.apply(key, value);
    }
}

/// Reads a flat string table; a missing file is not an error.
pub fn read_settings_file(path: &Path) -> anyhow::Result<Option<HashMap<String, String>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let table = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("'{}' must be a flat table of strings", path.display()))?;
    Ok(Some(table))
}
