use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::Result;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

static SHARED_DEFAULT: LazyLock<Config> = LazyLock::new(Config::compiled_default);

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "content-render.toml";

/// Light or dark display. Affects colors only, never structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub links: LinksConfig,
    pub theme: ThemeConfig,
    pub image: ImageConfig,
    pub page: PageConfig,
    pub font: FontConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#1a73e8".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub light: Palette,
    pub dark: Palette,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: Palette::light(),
            dark: Palette::dark(),
        }
    }
}

impl ThemeConfig {
    pub fn palette(&self, mode: Mode) -> &Palette {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }
}

/// Colors that differ between light and dark display
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Palette {
    pub text: String,
    pub background: String,
    pub muted: String,
    pub quote_border: String,
    pub code_background: String,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            text: "#212121".to_string(),
            background: "#ffffff".to_string(),
            muted: "#616161".to_string(),
            quote_border: "#bdbdbd".to_string(),
            code_background: "#f5f5f5".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: "#e0e0e0".to_string(),
            background: "#121212".to_string(),
            muted: "#a0a0a0".to_string(),
            quote_border: "#555555".to_string(),
            code_background: "#2d2d2d".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    pub error_color: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            error_color: "#d32f2f".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub sans: bool,
}

impl Config {
    /// The configuration bundled with the crate (validated by `build.rs`).
    pub fn compiled_default() -> Self {
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::error!("bundled default config does not parse: {}", e);
            Self::default()
        })
    }

    /// The compiled default, parsed once.
    pub fn shared_default() -> &'static Self {
        &SHARED_DEFAULT
    }

    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, surfacing I/O and parse errors.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load config from a TOML file, or return the compiled defaults if it
    /// is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {}", e);
                Self::shared_default().clone()
            }),
            Err(_) => Self::shared_default().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Mode, Palette};

    #[test]
    fn compiled_default_matches_default_impl() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn shared_default_is_parsed_once() {
        assert!(std::ptr::eq(Config::shared_default(), Config::shared_default()));
        assert_eq!(Config::shared_default(), &Config::compiled_default());
    }

    #[test]
    fn partial_override() {
        let config = Config::from_toml(
            "[links]\ncolor = \"#ff0000\"\n\n[theme.dark]\ntext = \"#fff\"\nbackground = \"#000\"\nmuted = \"#999\"\nquote_border = \"#444\"\ncode_background = \"#222\"\n",
        )
        .unwrap();
        assert_eq!(config.links.color, "#ff0000");
        assert_eq!(config.theme.palette(Mode::Dark).muted, "#999");
        assert_eq!(config.theme.palette(Mode::Light), &Palette::light());
        assert!(!config.page.numbers);
    }

    #[test]
    fn modes_have_distinct_muted_colors() {
        let config = Config::default();
        assert_ne!(
            config.theme.palette(Mode::Light).muted,
            config.theme.palette(Mode::Dark).muted
        );
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml("links = [").is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let config = Config::load(std::path::Path::new("/nonexistent/content-render.toml"));
        assert_eq!(config, Config::compiled_default());
    }
}
