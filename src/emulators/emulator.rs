use serde_json::{Map, Value};

use crate::error::Result;
use crate::page::SessionId;

/// Best-effort shutdown entry point exposed by a running engine.
pub type ExitHook = Box<dyn FnOnce() -> Result<()>>;

/// Emulator trait to have standard calling interface across engines.
///
/// Engines are third-party loaders configured through ambient globals, so the
/// interface is deliberately thin: publish globals, pull in the entry script,
/// and maybe get a way to shut it down again.
pub trait Emulator {
    /// Publish configuration globals. Must happen before [`Emulator::e_load`],
    /// the engine reads them once when its script runs.
    fn e_set_globals(&mut self, globals: &Map<String, Value>) -> Result<()>;

    /// Inject the engine entry script.
    ///
    /// An `Err` here is an immediate failure. A script that fails to fetch
    /// later is reported as [`crate::page::Command::LoaderFailed`] tagged
    /// with `session`.
    fn e_load(&mut self, src: &str, session: SessionId) -> Result<()>;

    /// Exit hook of the running engine. `None` when the engine doesn't
    /// expose one, which is not an error.
    fn e_exit_hook(&mut self) -> Option<ExitHook>;
}
