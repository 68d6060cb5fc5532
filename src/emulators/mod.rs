//! Emulator engines and the bridge that configures them.

mod bridge;
mod emulator;

#[cfg(target_arch = "wasm32")]
mod ejs;

pub use bridge::{EmulatorBridge, EmulatorConfig};
pub use emulator::{Emulator, ExitHook};

#[cfg(target_arch = "wasm32")]
pub use ejs::EmulatorJs;
