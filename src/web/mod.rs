//! Browser glue: the DOM page, the command dispatcher and the launcher
//! exported to JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Document;

use crate::config::LauncherConfig;
use crate::emulators::EmulatorJs;
use crate::error::{Error, Result};
use crate::page::Command;
use crate::session::Launcher;

mod dom;
pub mod logging;

pub use dom::DomPage;

/// Id of the optional `<script type="application/json">` config block.
pub const CONFIG_ELEMENT_ID: &str = "arcade-config";

type Shared = RefCell<Launcher<DomPage, EmulatorJs>>;

thread_local! {
    static LAUNCHER: RefCell<Option<Rc<Shared>>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_panic_hook();
    logging::init();

    match attached() {
        Ok(_) => Ok(()),
        Err(Error::MissingElement(selector)) => {
            info!(%selector, "nothing to attach to on this page");
            Ok(())
        }
        Err(err) => Err(JsValue::from_str(&err.to_string())),
    }
}

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// The launcher attached at startup, if any.
#[wasm_bindgen]
pub fn launcher() -> Option<WebLauncher> {
    LAUNCHER.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|inner| WebLauncher { inner: Rc::clone(inner) })
    })
}

/// Routes page events and timers back into the launcher.
///
/// Created before the launcher exists (the page and engine need one to bind
/// their callbacks), then connected once it does.
#[derive(Clone)]
pub struct Dispatcher {
    target: Rc<RefCell<Weak<Shared>>>,
}

impl Dispatcher {
    fn new() -> Self {
        Self {
            target: Rc::new(RefCell::new(Weak::new())),
        }
    }

    fn connect(&self, launcher: &Rc<Shared>) {
        *self.target.borrow_mut() = Rc::downgrade(launcher);
    }

    pub fn dispatch(&self, command: Command) {
        let Some(launcher) = self.target.borrow().upgrade() else {
            debug!(?command, "launcher gone, dropping command");
            return;
        };

        let Ok(mut launcher) = launcher.try_borrow_mut() else {
            debug!(?command, "launcher busy, retrying next tick");
            self.defer(0, command);
            return;
        };

        launcher.handle(command);
    }

    /// Dispatches `command` from a fresh task after `delay_ms`.
    pub fn defer(&self, delay_ms: u32, command: Command) {
        let Some(window) = web_sys::window() else {
            warn!(?command, "no window to schedule on");
            return;
        };

        let dispatcher = self.clone();
        let callback = Closure::once_into_js(move || dispatcher.dispatch(command));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);

        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            warn!("setTimeout failed: {}", describe(&err));
        }
    }
}

/// The launcher as seen from JavaScript.
#[wasm_bindgen]
pub struct WebLauncher {
    inner: Rc<Shared>,
}

#[wasm_bindgen]
impl WebLauncher {
    /// The launcher attached to the current document, attaching one first
    /// if there is none yet.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebLauncher, JsValue> {
        attached().map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Runs `query` through the search box. Returns whether it matched.
    pub fn search(&self, query: &str) -> Result<bool, JsValue> {
        self.with(|launcher| {
            launcher.page_mut().set_search_query(query);
            launcher.search() == crate::search::SearchAction::FocusTarget
        })
    }

    /// Starts the first game on the page.
    pub fn activate(&self) -> Result<(), JsValue> {
        self.with(|launcher| launcher.activate(None))
    }

    /// Asks to leave the running game. Returns whether the menu is back.
    pub fn exit(&self) -> Result<bool, JsValue> {
        self.with(|launcher| launcher.exit())
    }

    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&self) -> Result<(), JsValue> {
        self.with(|launcher| launcher.toggle_fullscreen())
    }

    /// `"Menu"` or `"InGame"`.
    pub fn state(&self) -> Result<String, JsValue> {
        self.with(|launcher| launcher.state().to_string())
    }
}

impl WebLauncher {
    fn with<R>(&self, f: impl FnOnce(&mut Launcher<DomPage, EmulatorJs>) -> R) -> Result<R, JsValue> {
        let mut launcher = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("launcher is busy"))?;

        Ok(f(&mut launcher))
    }
}

/// Hands out the one launcher for this document. A launcher whose menu has
/// been removed from the document is replaced; two live launchers would both
/// answer every card.
fn attached() -> Result<WebLauncher> {
    let current = LAUNCHER.with(|slot| slot.borrow().clone());

    if let Some(inner) = current {
        let live = inner
            .try_borrow()
            .map_or(true, |launcher| launcher.page().is_attached());

        if live {
            return Ok(WebLauncher { inner });
        }

        debug!("menu left the document, attaching a new launcher");
    }

    let launcher = attach()?;
    LAUNCHER.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&launcher.inner)));

    Ok(launcher)
}

fn attach() -> Result<WebLauncher> {
    let window = web_sys::window().ok_or_else(|| Error::MissingElement(String::from("window")))?;
    let document = window
        .document()
        .ok_or_else(|| Error::MissingElement(String::from("document")))?;

    let config = read_config(&document);
    let dispatcher = Dispatcher::new();
    let page = DomPage::new(document.clone(), config.clone(), dispatcher.clone())?;
    let emulator = EmulatorJs::new(window, document, dispatcher.clone());

    let inner = Rc::new(RefCell::new(Launcher::new(page, emulator, config)));
    dispatcher.connect(&inner);

    info!("launcher attached");

    Ok(WebLauncher { inner })
}

fn read_config(document: &Document) -> LauncherConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return LauncherConfig::default();
    };

    match LauncherConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            warn!("{err}, using defaults");
            LauncherConfig::default()
        }
    }
}

pub(crate) fn js_error(value: JsValue) -> Error {
    Error::Js(describe(&value))
}

pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }

    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{value:?}"),
    }
}
