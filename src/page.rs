//! The page the launcher drives.
//!
//! [`Page`] is everything the controller needs from the document. The
//! browser implementation lives in `web::dom`; tests use an in-memory one.

use crate::config::SessionStyle;
use crate::error::Result;
use crate::game::GameEntry;
use crate::view::Element;

/// Something that happened on the page, or a timer coming due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The search form was submitted; the query is read from the page.
    Search,
    /// A game card was activated. `None` when the control carried no entry.
    Activate(Option<GameEntry>),
    Exit,
    ToggleFullscreen,
    RevertSearchNotice,
    /// The engine's entry script failed to load.
    LoaderFailed { src: String, session: SessionId },
}

/// Tells game sessions apart, so a late report from one that already ended
/// is not applied to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Inline presentation attributes of the logo. `None` means the property is
/// not set inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoStyle {
    pub width: Option<String>,
    pub opacity: Option<String>,
    pub margin_bottom: Option<String>,
    pub transition: Option<String>,
}

impl LogoStyle {
    pub const PROPERTIES: [&'static str; 4] = ["width", "opacity", "margin-bottom", "transition"];

    pub fn compact(style: &SessionStyle) -> Self {
        let ms = style.transition_ms;

        Self {
            width: Some(style.compact_logo_width.clone()),
            opacity: Some(style.compact_logo_opacity.clone()),
            margin_bottom: Some(style.compact_logo_margin.clone()),
            transition: Some(format!("width {ms}ms ease, opacity {ms}ms ease")),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        match property {
            "width" => self.width.as_deref(),
            "opacity" => self.opacity.as_deref(),
            "margin-bottom" => self.margin_bottom.as_deref(),
            "transition" => self.transition.as_deref(),
            _ => None,
        }
    }

    pub fn set(&mut self, property: &str, value: Option<String>) {
        let slot = match property {
            "width" => &mut self.width,
            "opacity" => &mut self.opacity,
            "margin-bottom" => &mut self.margin_bottom,
            "transition" => &mut self.transition,
            _ => return,
        };

        *slot = value.filter(|value| !value.is_empty());
    }
}

pub trait Page {
    fn search_query(&self) -> String;

    fn clear_search(&mut self);

    fn search_placeholder(&self) -> String;

    fn set_search_placeholder(&mut self, text: &str);

    fn focus_primary_entry(&mut self);

    /// Game cards currently in the menu region, in document order.
    fn game_entries(&self) -> Vec<GameEntry>;

    /// Attaches click and Space/Enter handlers to every game card, releasing
    /// whatever a previous call attached. Safe to call repeatedly.
    fn bind_entry_points(&mut self);

    fn set_controls_hidden(&mut self, hidden: bool);

    fn logo_style(&self) -> LogoStyle;

    /// Sets every property in [`LogoStyle::PROPERTIES`], removing the ones
    /// that are `None`.
    fn set_logo_style(&mut self, style: &LogoStyle);

    fn menu_markup(&self) -> String;

    fn restore_menu_markup(&mut self, markup: &str);

    /// Replaces the menu region with `container` and wires the exit and
    /// fullscreen controls inside it.
    fn mount_session(&mut self, container: &Element);

    /// Appends `element` to the mount point, if there is one.
    fn show_in_mount(&mut self, element: &Element);

    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;

    /// Whether the session wrapper is the current fullscreen element.
    fn is_fullscreen(&self) -> bool;

    fn request_fullscreen(&mut self) -> Result<()>;

    fn exit_fullscreen(&mut self) -> Result<()>;

    /// Removes scripts and stylesheets whose locator starts with `prefix`.
    /// Returns how many were removed.
    fn remove_resources(&mut self, prefix: &str) -> usize;

    /// Delivers `command` back to the launcher after `delay_ms`.
    fn schedule(&mut self, delay_ms: u32, command: Command);
}
