//! Browser console logging.
//!
//! Nothing installs a `tracing` subscriber in the browser, so `tracing`'s
//! `log` feature turns every event into a `log` record and `console_log`
//! prints it to the matching `console` method.

use log::Level;

/// Installs the console logger. Later calls are no-ops.
pub fn init() {
    // Only initialize logger if it hasn't been initialized yet
    let _ = console_log::init_with_level(Level::Debug);
}
