//! EmulatorJS, driven through its `EJS_*` window globals.

use js_sys::{Function, Reflect};
use serde_json::{Map, Value};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlScriptElement, Window};

use super::{Emulator, ExitHook};
use crate::error::{Error, Result};
use crate::page::{Command, SessionId};
use crate::web::{describe, js_error, Dispatcher};

/// Global the engine stores its running instance under.
const INSTANCE_GLOBAL: &str = "EJS_emulator";

pub struct EmulatorJs {
    window: Window,
    document: Document,
    dispatcher: Dispatcher,
}

impl EmulatorJs {
    pub fn new(window: Window, document: Document, dispatcher: Dispatcher) -> Self {
        Self {
            window,
            document,
            dispatcher,
        }
    }
}

impl Emulator for EmulatorJs {
    fn e_set_globals(&mut self, globals: &Map<String, Value>) -> Result<()> {
        for (name, value) in globals {
            let value = match value {
                Value::Bool(value) => JsValue::from_bool(*value),
                Value::String(value) => JsValue::from_str(value),
                Value::Number(value) => value.as_f64().map_or(JsValue::NULL, JsValue::from_f64),
                Value::Null => JsValue::NULL,
                other => JsValue::from_str(&other.to_string()),
            };

            Reflect::set(&self.window, &JsValue::from_str(name), &value).map_err(js_error)?;
        }

        Ok(())
    }

    fn e_load(&mut self, src: &str, session: SessionId) -> Result<()> {
        let script = self
            .document
            .create_element("script")
            .map_err(js_error)?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| Error::Js(String::from("created element is not a script")))?;

        script.set_src(src);
        script.set_async(true);

        let dispatcher = self.dispatcher.clone();
        let failed = src.to_owned();
        let onerror = wasm_bindgen::closure::Closure::once_into_js(move || {
            dispatcher.dispatch(Command::LoaderFailed {
                src: failed,
                session,
            });
        });
        script.set_onerror(Some(onerror.unchecked_ref()));

        let parent = self
            .document
            .body()
            .ok_or_else(|| Error::MissingElement(String::from("body")))?;

        parent
            .append_child(&script)
            .map_err(|_| Error::ScriptLoad {
                src: src.to_owned(),
            })?;

        debug!(%src, "injected emulator entry script");

        Ok(())
    }

    fn e_exit_hook(&mut self) -> Option<ExitHook> {
        let instance = Reflect::get(&self.window, &JsValue::from_str(INSTANCE_GLOBAL)).ok()?;

        if !instance.is_object() {
            return None;
        }

        let exit = Reflect::get(&instance, &JsValue::from_str("exit"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;

        Some(Box::new(move || {
            exit.call0(&instance)
                .map(drop)
                .map_err(|err| Error::ExitHook(describe(&err)))
        }))
    }
}
