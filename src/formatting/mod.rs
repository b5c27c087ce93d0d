//! Colour selection and emitter configuration.
//!
//! Holds the severity colour palette used by the colour emitter and the
//! process-wide [`EmitterConfig`], which is read from the environment once.
//! Only the colour choice is configurable; every attached emitter writes
//! DEBUG and above in the fixed record layout.

#[cfg(feature = "color")]
use crate::level::Severity;
use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Colour when the stream is a terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// Decide for one record, given what the stream said about itself.
    pub fn should_use_color(&self, is_tty: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_tty,
        }
    }
}

/// Settings applied to the emitter the attacher installs on a class logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    pub color: ColorMode,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl EmitterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if lookup("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }

        if let Some(val) = lookup("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Some(val) = lookup("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        if config.color == ColorMode::Never {
            log::debug!("Colour output disabled by environment");
        }

        config
    }
}

static PROCESS_CONFIG: Lazy<EmitterConfig> = Lazy::new(EmitterConfig::from_env);

/// Configuration shared by every attachment in this process.
pub fn process_config() -> &'static EmitterConfig {
    &PROCESS_CONFIG
}

pub const RESET: &str = "\x1b[0m";

/// Foreground and optional background colour for a severity.
#[cfg(feature = "color")]
pub fn level_colors(level: Severity) -> (colored::Color, Option<colored::Color>) {
    use colored::Color;

    match level {
        Severity::Debug => (Color::Cyan, None),
        Severity::Info => (Color::Green, None),
        Severity::Warning => (Color::Yellow, None),
        Severity::Error => (Color::Red, None),
        Severity::Critical => (Color::White, Some(Color::Red)),
    }
}

/// ANSI sequence that switches the terminal to `level`'s colours.
#[cfg(feature = "color")]
pub fn color_prefix(level: Severity) -> String {
    let (fg, bg) = level_colors(level);
    let mut prefix = String::new();
    if let Some(bg) = bg {
        prefix.push_str(&format!("\x1b[{}m", bg.to_bg_str()));
    }
    prefix.push_str(&format!("\x1b[{}m", fg.to_fg_str()));
    prefix
}
