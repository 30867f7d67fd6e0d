//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use ansi_term::{Colour, Style};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ts_core::Tracker;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether identifier highlighting is enabled at all.
    pub color: bool,

    /// Highlight color for interval identifiers: a color name or a 256-color
    /// index. Unknown values leave identifiers unstyled.
    pub id_color: String,

    /// Base URL of the Collabora Phabricator instance.
    pub collabora_url: String,

    /// Base URL of the Apertis Phabricator instance.
    pub apertis_url: String,

    /// Conduit API token; required only when title fetching is enabled.
    pub api_token: Option<String>,

    /// Resolve task titles from the tracker by default.
    pub fetch_titles: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("color", &self.color)
            .field("id_color", &self.id_color)
            .field("collabora_url", &self.collabora_url)
            .field("apertis_url", &self.apertis_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("fetch_titles", &self.fetch_titles)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: true,
            id_color: "cyan".to_string(),
            collabora_url: Tracker::Collabora.base_url().to_string(),
            apertis_url: Tracker::Apertis.base_url().to_string(),
            api_token: None,
            fetch_titles: false,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMESHEET_*)
        figment = figment.merge(Env::prefixed("TIMESHEET_"));

        figment.extract()
    }

    /// Style applied to interval identifiers when highlighting is on.
    pub fn id_style(&self) -> Style {
        parse_colour(&self.id_color).map_or_else(Style::new, Colour::normal)
    }
}

/// Returns the platform-specific config directory for timesheet.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timesheet"))
}

fn parse_colour(name: &str) -> Option<Colour> {
    match name.to_lowercase().as_str() {
        "black" => Some(Colour::Black),
        "red" => Some(Colour::Red),
        "green" => Some(Colour::Green),
        "yellow" => Some(Colour::Yellow),
        "blue" => Some(Colour::Blue),
        "purple" | "magenta" => Some(Colour::Purple),
        "cyan" => Some(Colour::Cyan),
        "white" => Some(Colour::White),
        other => other.parse::<u8>().ok().map(Colour::Fixed),
    }
}
