//! Game cards as the launcher sees them.

use std::str::FromStr;

use crate::config::GameDefaults;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub id: String,
    pub title: String,
    pub rom_path: String,
    pub core: String,
}

impl GameEntry {
    /// Builds an entry from a card's raw attributes. Missing and empty
    /// attributes both fall back to `defaults`.
    pub fn from_attributes(
        id: Option<&str>,
        rom: Option<&str>,
        title: Option<&str>,
        core: Option<&str>,
        defaults: &GameDefaults,
    ) -> Self {
        fn or_default(value: Option<&str>, default: &str) -> String {
            match value.map(str::trim) {
                Some(value) if !value.is_empty() => value.to_owned(),
                _ => default.to_owned(),
            }
        }

        Self {
            id: id.unwrap_or_default().to_owned(),
            title: or_default(title, &defaults.title),
            rom_path: or_default(rom, &defaults.rom_path),
            core: or_default(core, &defaults.core),
        }
    }

    pub fn placeholder(defaults: &GameDefaults) -> Self {
        Self::from_attributes(None, None, None, None, defaults)
    }
}

/// Keys that activate a focused game card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
pub enum ActivationKey {
    #[strum(serialize = " ", serialize = "Spacebar")]
    Space,
    #[strum(serialize = "Enter")]
    Enter,
}

impl ActivationKey {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::from_str(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_taken_verbatim() {
        let entry = GameEntry::from_attributes(
            Some("card-1"),
            Some("/a.gba"),
            Some("Foo"),
            Some("gba"),
            &GameDefaults::default(),
        );

        assert_eq!(
            entry,
            GameEntry {
                id: String::from("card-1"),
                title: String::from("Foo"),
                rom_path: String::from("/a.gba"),
                core: String::from("gba"),
            }
        );
    }

    #[test]
    fn missing_or_blank_attributes_use_placeholders() {
        let defaults = GameDefaults::default();
        let entry = GameEntry::from_attributes(None, Some("  "), None, Some(""), &defaults);

        assert_eq!(entry.rom_path, "roms/game.gba");
        assert_eq!(entry.title, "Game");
        assert_eq!(entry.core, "gba");
        assert_eq!(entry, GameEntry::placeholder(&defaults));
    }

    #[test]
    fn space_and_enter_activate() {
        assert_eq!(ActivationKey::from_key(" "), Some(ActivationKey::Space));
        assert_eq!(ActivationKey::from_key("Spacebar"), Some(ActivationKey::Space));
        assert_eq!(ActivationKey::from_key("Enter"), Some(ActivationKey::Enter));
        assert_eq!(ActivationKey::from_key("Escape"), None);
        assert_eq!(ActivationKey::from_key("enter"), None);
    }
}
