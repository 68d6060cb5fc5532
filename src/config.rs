//! Launcher configuration.
//!
//! Every field has a default, so a page without an `arcade-config` block (or
//! with a partial one) still boots. Keys are camelCase to match the rest of
//! the page's JavaScript.

use serde::Deserialize;

use crate::error::Result;
use crate::search::{DEFAULT_KEYWORDS, DEFAULT_NOT_FOUND_MESSAGE};

/// Entry script name the engine expects under its data path.
pub const LOADER_SCRIPT: &str = "loader.js";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LauncherConfig {
    pub selectors: Selectors,
    /// Label searched against. `None` uses the first game's title.
    pub target_label: Option<String>,
    /// Queries containing any of these always match.
    pub keywords: Vec<String>,
    pub not_found_message: String,
    pub search_revert_ms: u32,
    pub assets_dir: String,
    /// Overrides the `{assets_dir}/emulatorjs/data/` default.
    pub data_path: Option<String>,
    pub defaults: GameDefaults,
    pub session: SessionStyle,
    pub exit_prompt: String,
    pub load_error_message: String,
}

/// CSS selectors of the page regions the launcher drives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub search_input: String,
    pub search_button: String,
    pub controls: String,
    pub logo: String,
    pub menu: String,
    /// Main "play" control; activates the first game.
    pub primary_entry: String,
    pub game_card: String,
}

/// Values used for game cards that omit their data attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameDefaults {
    pub rom_path: String,
    pub title: String,
    pub core: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionStyle {
    pub height: String,
    pub compact_logo_width: String,
    pub compact_logo_opacity: String,
    pub compact_logo_margin: String,
    pub transition_ms: u32,
    pub exit_label: String,
    pub fullscreen_label: String,
}

impl LauncherConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Prefix the engine loads its files from. Always ends with `/`.
    pub fn data_path(&self) -> String {
        let path = match &self.data_path {
            Some(path) => path.clone(),
            None => format!("{}/emulatorjs/data", self.assets_dir.trim_end_matches('/')),
        };

        if path.ends_with('/') {
            path
        } else {
            format!("{path}/")
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            target_label: None,
            keywords: DEFAULT_KEYWORDS.iter().map(|&keyword| keyword.into()).collect(),
            not_found_message: String::from(DEFAULT_NOT_FOUND_MESSAGE),
            search_revert_ms: 1000,
            assets_dir: String::from("assets"),
            data_path: None,
            defaults: GameDefaults::default(),
            session: SessionStyle::default(),
            exit_prompt: String::from(
                "Exit the game? Any unsaved progress will be lost if you continue.",
            ),
            load_error_message: String::from(
                "The emulator could not be loaded. Check your connection and try again.",
            ),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            search_input: String::from("#search-input"),
            search_button: String::from("#search-button"),
            controls: String::from("#controls"),
            logo: String::from("#logo"),
            menu: String::from("#menu"),
            primary_entry: String::from("#play-button"),
            game_card: String::from(".game-card"),
        }
    }
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            rom_path: String::from("roms/game.gba"),
            title: String::from("Game"),
            core: String::from("gba"),
        }
    }
}

impl Default for SessionStyle {
    fn default() -> Self {
        Self {
            height: String::from("480px"),
            compact_logo_width: String::from("120px"),
            compact_logo_opacity: String::from("0.9"),
            compact_logo_margin: String::from("12px"),
            transition_ms: 200,
            exit_label: String::from("\u{26a0} Exit (unsaved progress is lost)"),
            fullscreen_label: String::from("\u{26f6} Fullscreen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_defaults_under_assets_dir() {
        let config = LauncherConfig::default();

        assert_eq!(config.data_path(), "assets/emulatorjs/data/");
    }

    #[test]
    fn explicit_data_path_gets_trailing_slash() {
        let config = LauncherConfig {
            data_path: Some(String::from("/cdn/ejs")),
            ..LauncherConfig::default()
        };

        assert_eq!(config.data_path(), "/cdn/ejs/");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LauncherConfig::from_json(
            r#"{ "assetsDir": "static/", "keywords": ["zelda"], "selectors": { "menu": "main" } }"#,
        )
        .unwrap();

        assert_eq!(config.data_path(), "static/emulatorjs/data/");
        assert_eq!(config.keywords, vec!["zelda"]);
        assert_eq!(config.selectors.menu, "main");
        assert_eq!(config.selectors.logo, "#logo");
        assert_eq!(config.search_revert_ms, 1000);
        assert_eq!(config.defaults.core, "gba");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = LauncherConfig::from_json("{ nope").unwrap_err();

        assert!(matches!(err, crate::Error::Config(_)));
    }
}
