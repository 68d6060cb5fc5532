use js_sys::{Function, Promise, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, Node,
};

use super::{describe, js_error, Dispatcher};
use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::game::{ActivationKey, GameEntry};
use crate::page::{Command, LogoStyle, Page};
use crate::view;

/// An event listener that is removed again when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, event: &'static str, callback: impl FnMut(Event) + 'static) -> Option<Self> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);

        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            warn!(event, "failed to add listener: {}", describe(&err));
            return None;
        }

        Some(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// The live document.
///
/// Listeners never run the launcher directly: handling a command may replace
/// the element whose listener fired, so they defer to a fresh task.
pub struct DomPage {
    document: Document,
    config: LauncherConfig,
    dispatcher: Dispatcher,
    menu: Element,
    /// Wrapper and mount of the running session, as built by `mount_session`.
    session: Option<(Element, Element)>,
    search_listeners: Vec<Listener>,
    entry_listeners: Vec<Listener>,
    session_listeners: Vec<Listener>,
}

impl DomPage {
    pub fn new(document: Document, config: LauncherConfig, dispatcher: Dispatcher) -> Result<Self> {
        let menu = document
            .query_selector(&config.selectors.menu)
            .map_err(js_error)?
            .ok_or_else(|| Error::MissingElement(config.selectors.menu.clone()))?;

        let mut page = Self {
            document,
            config,
            dispatcher,
            menu,
            session: None,
            search_listeners: Vec::new(),
            entry_listeners: Vec::new(),
            session_listeners: Vec::new(),
        };
        page.bind_search();

        Ok(page)
    }

    /// Whether the menu region is still part of the document.
    pub fn is_attached(&self) -> bool {
        self.menu.is_connected()
    }

    pub fn set_search_query(&mut self, query: &str) {
        if let Some(input) = self.search_input() {
            input.set_value(query);
        }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(element) => element,
            Err(err) => {
                warn!(selector, "bad selector: {}", describe(&err));
                None
            }
        }
    }

    fn query_html(&self, selector: &str) -> Option<HtmlElement> {
        self.query(selector)?.dyn_into::<HtmlElement>().ok()
    }

    fn search_input(&self) -> Option<HtmlInputElement> {
        self.query(&self.config.selectors.search_input)?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn cards(&self) -> Vec<Element> {
        let Ok(nodes) = self.menu.query_selector_all(&self.config.selectors.game_card) else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn entry_for(&self, card: &Element) -> GameEntry {
        GameEntry::from_attributes(
            Some(&card.id()),
            card.get_attribute("data-rom").as_deref(),
            card.get_attribute("data-title").as_deref(),
            card.get_attribute("data-core").as_deref(),
            &self.config.defaults,
        )
    }

    fn bind_search(&mut self) {
        self.search_listeners.clear();

        if let Some(button) = self.query(&self.config.selectors.search_button) {
            let dispatcher = self.dispatcher.clone();
            self.search_listeners.extend(Listener::attach(&button, "click", move |event| {
                event.prevent_default();
                dispatcher.defer(0, Command::Search);
            }));
        }

        if let Some(input) = self.search_input() {
            let dispatcher = self.dispatcher.clone();
            self.search_listeners.extend(Listener::attach(&input, "keydown", move |event| {
                let is_enter = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|event| event.key() == "Enter");

                if is_enter {
                    event.prevent_default();
                    dispatcher.defer(0, Command::Search);
                }
            }));
        }
    }

    /// Click plus Space/Enter on `target`, both activating `entry`.
    fn bind_activation(&mut self, target: &Element, entry: Option<GameEntry>) {
        let dispatcher = self.dispatcher.clone();
        let on_click = entry.clone();
        self.entry_listeners.extend(Listener::attach(target, "click", move |_| {
            dispatcher.defer(0, Command::Activate(on_click.clone()));
        }));

        let dispatcher = self.dispatcher.clone();
        self.entry_listeners.extend(Listener::attach(target, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };

            if ActivationKey::from_key(&key).is_some() {
                event.prevent_default();
                dispatcher.defer(0, Command::Activate(entry.clone()));
            }
        }));
    }

    /// Builds DOM nodes for `view`. Every node carrying an id is also pushed
    /// onto `by_id`.
    fn render(&self, view: &view::Element, by_id: &mut Vec<(String, Element)>) -> Result<Element> {
        let element = self.document.create_element(view.tag).map_err(js_error)?;

        for (name, value) in &view.attributes {
            element.set_attribute(name, value).map_err(js_error)?;
        }

        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let style = html.style();

            for (property, value) in &view.style {
                style.set_property(property, value).map_err(js_error)?;
            }
        }

        if let Some(text) = &view.text {
            element
                .append_child(&self.document.create_text_node(text))
                .map_err(js_error)?;
        }

        for child in &view.children {
            let child = self.render(child, by_id)?;
            element.append_child(&child).map_err(js_error)?;
        }

        if let Some(id) = view.attribute("id") {
            by_id.push((id.to_owned(), element.clone()));
        }

        Ok(element)
    }
}

impl Page for DomPage {
    fn search_query(&self) -> String {
        self.search_input()
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn clear_search(&mut self) {
        self.set_search_query("");
    }

    fn search_placeholder(&self) -> String {
        self.search_input()
            .map(|input| input.placeholder())
            .unwrap_or_default()
    }

    fn set_search_placeholder(&mut self, text: &str) {
        if let Some(input) = self.search_input() {
            input.set_placeholder(text);
        }
    }

    fn focus_primary_entry(&mut self) {
        let target = self
            .query_html(&self.config.selectors.primary_entry)
            .or_else(|| {
                self.cards()
                    .into_iter()
                    .find_map(|card| card.dyn_into::<HtmlElement>().ok())
            });

        match target {
            Some(target) => {
                if let Err(err) = target.focus() {
                    warn!("failed to focus primary entry: {}", describe(&err));
                }
            }
            None => debug!("no entry point to focus"),
        }
    }

    fn game_entries(&self) -> Vec<GameEntry> {
        self.cards().iter().map(|card| self.entry_for(card)).collect()
    }

    fn bind_entry_points(&mut self) {
        self.entry_listeners.clear();

        if let Some(primary) = self.query(&self.config.selectors.primary_entry) {
            self.bind_activation(&primary, None);
        }

        for card in self.cards() {
            if !card.has_attribute("tabindex") {
                let _ = card.set_attribute("tabindex", "0");
            }

            let entry = self.entry_for(&card);
            self.bind_activation(&card, Some(entry));
        }

        debug!(listeners = self.entry_listeners.len(), "bound entry points");
    }

    fn set_controls_hidden(&mut self, hidden: bool) {
        if let Some(controls) = self.query_html(&self.config.selectors.controls) {
            controls.set_hidden(hidden);
        }
    }

    fn logo_style(&self) -> LogoStyle {
        let mut logo = LogoStyle::default();

        if let Some(element) = self.query_html(&self.config.selectors.logo) {
            let style = element.style();

            for property in LogoStyle::PROPERTIES {
                logo.set(property, style.get_property_value(property).ok());
            }
        }

        logo
    }

    fn set_logo_style(&mut self, logo: &LogoStyle) {
        let Some(element) = self.query_html(&self.config.selectors.logo) else {
            return;
        };
        let style = element.style();

        for property in LogoStyle::PROPERTIES {
            let result = match logo.get(property) {
                Some(value) => style.set_property(property, value),
                None => style.remove_property(property).map(drop),
            };

            if let Err(err) = result {
                warn!(property, "failed to style logo: {}", describe(&err));
            }
        }
    }

    fn menu_markup(&self) -> String {
        self.menu.inner_html()
    }

    fn restore_menu_markup(&mut self, markup: &str) {
        self.session_listeners.clear();
        self.session = None;
        self.menu.set_inner_html(markup);
    }

    fn mount_session(&mut self, container: &view::Element) {
        self.entry_listeners.clear();
        self.session_listeners.clear();
        self.session = None;

        let mut by_id = Vec::new();
        let wrapper = match self.render(container, &mut by_id) {
            Ok(wrapper) => wrapper,
            Err(err) => {
                warn!("failed to build session container: {err}");
                return;
            }
        };

        self.menu.set_inner_html("");
        if let Err(err) = self.menu.append_child(&wrapper) {
            warn!("failed to mount session container: {}", describe(&err));
            return;
        }

        let built = |id: &str| {
            by_id
                .iter()
                .find(|(built_id, _)| built_id == id)
                .map(|(_, element)| element.clone())
        };

        let controls = [
            (view::EXIT_ID, Command::Exit),
            (view::FULLSCREEN_ID, Command::ToggleFullscreen),
        ];

        for (id, command) in controls {
            let Some(control) = built(id) else {
                warn!(id, "session control missing");
                continue;
            };

            let dispatcher = self.dispatcher.clone();
            self.session_listeners.extend(Listener::attach(&control, "click", move |_| {
                dispatcher.defer(0, command.clone());
            }));
        }

        match built(view::MOUNT_ID) {
            Some(mount) => self.session = Some((wrapper, mount)),
            None => warn!("session container has no mount point"),
        }
    }

    fn show_in_mount(&mut self, element: &view::Element) {
        let Some((_, mount)) = &self.session else {
            warn!("no mount point to show message in");
            return;
        };

        let result = self
            .render(element, &mut Vec::new())
            .and_then(|node| mount.append_child(&node).map_err(js_error));

        if let Err(err) = result {
            warn!("failed to render into mount: {err}");
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };

        window.confirm_with_message(message).unwrap_or_else(|err| {
            warn!("confirm dialog failed: {}", describe(&err));
            false
        })
    }

    fn is_fullscreen(&self) -> bool {
        let Some((wrapper, _)) = &self.session else {
            return false;
        };
        let wrapper: &Node = wrapper;

        self.document
            .fullscreen_element()
            .is_some_and(|element| element.is_same_node(Some(wrapper)))
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        let Some((wrapper, _)) = &self.session else {
            return Err(Error::MissingElement(String::from(view::WRAPPER_ID)));
        };

        call_fullscreen(wrapper, "requestFullscreen")
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        call_fullscreen(&self.document, "exitFullscreen")
    }

    fn remove_resources(&mut self, prefix: &str) -> usize {
        let Ok(nodes) = self.document.query_selector_all("script[src], link[href]") else {
            return 0;
        };

        let matching = (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|element| {
                element
                    .get_attribute("src")
                    .or_else(|| element.get_attribute("href"))
                    .is_some_and(|locator| locator.starts_with(prefix))
            })
            .collect::<Vec<_>>();

        for element in &matching {
            element.remove();
        }

        matching.len()
    }

    fn schedule(&mut self, delay_ms: u32, command: Command) {
        self.dispatcher.defer(delay_ms, command);
    }
}

/// Calls a promise-returning fullscreen method. Synchronous throws come back
/// as `Err`; a rejected promise is only logged.
fn call_fullscreen(target: &JsValue, method: &'static str) -> Result<()> {
    let function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| Error::Fullscreen(format!("`{method}` is not supported")))?;

    let result = function
        .call0(target)
        .map_err(|err| Error::Fullscreen(describe(&err)))?;

    if let Ok(promise) = result.dyn_into::<Promise>() {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(method, "fullscreen request failed: {}", describe(&err));
            }
        });
    }

    Ok(())
}
