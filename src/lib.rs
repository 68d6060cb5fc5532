//! Browser game launcher.
//!
//! Wires a search box and a grid of game cards to an embedded third-party
//! emulator, and handles the switch between the menu and a running game.
//! The controller ([`Launcher`]) only talks to the document through
//! [`page::Page`] and to the engine through [`emulators::Emulator`]; the
//! browser implementations of both live in `web` (wasm32 only).

pub mod config;
pub mod emulators;
mod error;
pub mod game;
pub mod page;
pub mod search;
pub mod session;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use config::LauncherConfig;
pub use error::{Error, Result};
pub use game::GameEntry;
pub use search::{search, SearchAction};
pub use session::{Launcher, SessionState, UiSnapshot};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;
