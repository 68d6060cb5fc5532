//! Maps game cards onto the engine's configuration contract.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::Emulator;
use crate::config::LOADER_SCRIPT;
use crate::error::Result;
use crate::game::GameEntry;
use crate::page::SessionId;
use crate::view;

/// Per-activation engine configuration. Serializes to the exact global names
/// the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmulatorConfig {
    #[serde(rename = "EJS_player")]
    pub mount_selector: String,
    #[serde(rename = "EJS_gameUrl")]
    pub rom_path: String,
    #[serde(rename = "EJS_gameName")]
    pub title: String,
    #[serde(rename = "EJS_core")]
    pub core: String,
    #[serde(rename = "EJS_pathtodata")]
    pub data_path: String,
    #[serde(rename = "EJS_startOnLoaded")]
    pub autostart: bool,
    #[serde(rename = "EJS_disableDatabases")]
    pub disable_databases: bool,
    #[serde(rename = "EJS_disableLocalStorage")]
    pub disable_local_storage: bool,
}

impl EmulatorConfig {
    pub fn for_game(entry: &GameEntry, data_path: &str) -> Self {
        Self {
            mount_selector: view::mount_selector(),
            rom_path: entry.rom_path.clone(),
            title: entry.title.clone(),
            core: entry.core.clone(),
            data_path: data_path.to_owned(),
            autostart: true,
            disable_databases: true,
            disable_local_storage: true,
        }
    }

    pub fn loader_script(&self) -> String {
        format!("{}{LOADER_SCRIPT}", self.data_path)
    }

    pub fn globals(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(globals) => Ok(globals),
            _ => Ok(Map::new()),
        }
    }
}

pub struct EmulatorBridge<E> {
    emulator: E,
}

impl<E: Emulator> EmulatorBridge<E> {
    pub fn new(emulator: E) -> Self {
        Self { emulator }
    }

    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    /// Publishes `config` and starts loading the engine for `session`.
    pub fn activate(&mut self, config: &EmulatorConfig, session: SessionId) -> Result<()> {
        self.publish(config)?;

        let src = config.loader_script();
        info!(%src, game = %config.title, core = %config.core, ?session, "loading emulator");

        self.emulator.e_load(&src, session)
    }

    /// The only place engine globals are written.
    pub fn publish(&mut self, config: &EmulatorConfig) -> Result<()> {
        let globals = config.globals()?;

        debug!(count = globals.len(), "publishing emulator globals");

        self.emulator.e_set_globals(&globals)
    }

    /// Calls the engine's exit hook if it has one. Never fails.
    pub fn shutdown(&mut self) {
        let Some(exit) = self.emulator.e_exit_hook() else {
            debug!("emulator exposes no exit hook");
            return;
        };

        match exit() {
            Ok(()) => debug!("emulator exit hook ran"),
            Err(err) => warn!("ignoring emulator shutdown failure: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::page::Command;
    use crate::testing::{ExitBehavior, ScriptedEmulator};

    fn foo() -> GameEntry {
        GameEntry {
            id: String::from("foo"),
            title: String::from("Foo"),
            rom_path: String::from("/a.gba"),
            core: String::from("gba"),
        }
    }

    #[test]
    fn config_serializes_to_engine_globals() {
        let config = EmulatorConfig::for_game(&foo(), "assets/emulatorjs/data/");

        assert_eq!(
            Value::Object(config.globals().unwrap()),
            json!({
                "EJS_player": "#game",
                "EJS_gameUrl": "/a.gba",
                "EJS_gameName": "Foo",
                "EJS_core": "gba",
                "EJS_pathtodata": "assets/emulatorjs/data/",
                "EJS_startOnLoaded": true,
                "EJS_disableDatabases": true,
                "EJS_disableLocalStorage": true,
            })
        );
        assert_eq!(config.loader_script(), "assets/emulatorjs/data/loader.js");
    }

    #[test]
    fn activate_publishes_before_loading() {
        let mut bridge = EmulatorBridge::new(ScriptedEmulator::new());
        let config = EmulatorConfig::for_game(&foo(), "data/");

        let session = SessionId::default().next();
        bridge.activate(&config, session).unwrap();

        let emulator = bridge.emulator();
        assert_eq!(emulator.calls, vec!["globals", "load data/loader.js"]);
        assert_eq!(
            emulator.loader_failure(),
            Some(Command::LoaderFailed {
                src: String::from("data/loader.js"),
                session,
            })
        );
        assert_eq!(emulator.globals["EJS_gameUrl"], "/a.gba");
    }

    #[test]
    fn synchronous_load_failure_is_returned() {
        let mut emulator = ScriptedEmulator::new();
        emulator.fail_load = true;
        let mut bridge = EmulatorBridge::new(emulator);

        let err = bridge
            .activate(&EmulatorConfig::for_game(&foo(), "data/"), SessionId::default())
            .unwrap_err();

        assert!(matches!(err, crate::Error::ScriptLoad { src } if src == "data/loader.js"));
    }

    #[test]
    fn shutdown_tolerates_missing_and_failing_hooks() {
        for behavior in [ExitBehavior::Missing, ExitBehavior::Succeeds, ExitBehavior::Fails] {
            let mut emulator = ScriptedEmulator::new();
            emulator.exit = behavior;
            let mut bridge = EmulatorBridge::new(emulator);

            bridge.shutdown();

            let expected = if behavior == ExitBehavior::Missing { 0 } else { 1 };
            assert_eq!(bridge.emulator().exit_calls(), expected, "{behavior:?}");
        }
    }
}
