//! Markup the launcher builds itself: the session container and the in-mount
//! load error.
//!
//! Views are plain element trees; the browser page turns them into DOM nodes
//! and the tests inspect them directly.

use crate::config::SessionStyle;

pub const WRAPPER_ID: &str = "game-wrapper";
pub const MOUNT_ID: &str = "game";
pub const CONTROL_BAR_ID: &str = "game-controls";
pub const EXIT_ID: &str = "exit-game";
pub const FULLSCREEN_ID: &str = "toggle-fullscreen";
pub const LOAD_ERROR_CLASS: &str = "emulator-error";

/// Selector handed to the engine as its render target.
pub fn mount_selector() -> String {
    format!("#{MOUNT_ID}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub style: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            style: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push((property, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(key, _)| *key == property)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first lookup by `id`, including `self`.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }

        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }

        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// Wrapper > mount > overlay bar with the exit and fullscreen controls.
pub fn session_container(style: &SessionStyle) -> Element {
    let exit = Element::new("button")
        .id(EXIT_ID)
        .class("btn btn-warning")
        .attr("type", "button")
        .attr("title", "Unsaved progress will be lost")
        .text(&style.exit_label);

    let fullscreen = Element::new("button")
        .id(FULLSCREEN_ID)
        .class("btn")
        .attr("type", "button")
        .text(&style.fullscreen_label);

    let control_bar = Element::new("div")
        .id(CONTROL_BAR_ID)
        .style("position", "absolute")
        .style("top", "8px")
        .style("right", "8px")
        .style("z-index", "10")
        .style("display", "flex")
        .style("gap", "8px")
        .child(exit)
        .child(fullscreen);

    let mount = Element::new("div")
        .id(MOUNT_ID)
        .style("width", "100%")
        .style("height", "100%")
        .child(control_bar);

    Element::new("div")
        .id(WRAPPER_ID)
        .style("position", "relative")
        .style("height", &style.height)
        .style("border-radius", "12px")
        .style("overflow", "hidden")
        .style("background", "#000")
        .child(mount)
}

pub fn load_error(message: &str) -> Element {
    Element::new("p")
        .class(LOAD_ERROR_CLASS)
        .attr("role", "alert")
        .style("color", "#fff")
        .style("padding", "16px")
        .text(message)
}
