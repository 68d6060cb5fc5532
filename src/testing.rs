//! In-memory page and engine used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::config::{GameDefaults, LauncherConfig, LOADER_SCRIPT};
use crate::emulators::{Emulator, ExitHook};
use crate::error::{Error, Result};
use crate::game::GameEntry;
use crate::page::{Command, LogoStyle, Page, SessionId};
use crate::session::Launcher;
use crate::view::{self, Element};

pub const SITE_SCRIPT: &str = "js/site.js";
pub const PLACEHOLDER: &str = "Search games\u{2026}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Markup(String),
    Session(Element),
}

pub struct MemoryPage {
    pub menu: Menu,
    pub entries: Vec<GameEntry>,
    /// Cleared whenever the menu content is replaced, like real listeners.
    pub entries_bound: bool,
    pub bind_calls: usize,
    pub session_controls_bound: bool,
    pub controls_hidden: bool,
    pub logo: LogoStyle,
    pub search_value: String,
    pub placeholder: String,
    pub focused: Option<&'static str>,
    pub confirm_answers: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub fullscreen: bool,
    pub fail_fullscreen: bool,
    pub resources: Rc<RefCell<Vec<String>>>,
    pub now: u32,
    pub timers: Vec<(u32, Command)>,
}

impl MemoryPage {
    pub fn with_cards(entries: Vec<GameEntry>) -> Self {
        let markup = entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<div id="{}" class="game-card" data-rom="{}" data-title="{}" tabindex="0">{}</div>"#,
                    entry.id, entry.rom_path, entry.title, entry.title
                )
            })
            .collect::<String>();

        Self {
            menu: Menu::Markup(markup),
            entries,
            entries_bound: false,
            bind_calls: 0,
            session_controls_bound: false,
            controls_hidden: false,
            logo: LogoStyle {
                width: Some(String::from("320px")),
                opacity: Some(String::from("1")),
                margin_bottom: None,
                transition: None,
            },
            search_value: String::new(),
            placeholder: String::from(PLACEHOLDER),
            focused: None,
            confirm_answers: VecDeque::new(),
            prompts: Vec::new(),
            fullscreen: false,
            fail_fullscreen: false,
            resources: Rc::new(RefCell::new(vec![String::from(SITE_SCRIPT)])),
            now: 0,
            timers: Vec::new(),
        }
    }

    pub fn mount(&self) -> Option<&Element> {
        match &self.menu {
            Menu::Session(container) => container.find(view::MOUNT_ID),
            Menu::Markup(_) => None,
        }
    }

    /// Moves the clock forward and returns the commands that came due.
    pub fn advance(&mut self, ms: u32) -> Vec<Command> {
        self.now += ms;

        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(at, _)| *at <= now);
        self.timers = pending;

        due.into_iter().map(|(_, command)| command).collect()
    }
}

impl Page for MemoryPage {
    fn search_query(&self) -> String {
        self.search_value.clone()
    }

    fn clear_search(&mut self) {
        self.search_value.clear();
    }

    fn search_placeholder(&self) -> String {
        self.placeholder.clone()
    }

    fn set_search_placeholder(&mut self, text: &str) {
        self.placeholder = text.to_owned();
    }

    fn focus_primary_entry(&mut self) {
        self.focused = Some("primary-entry");
    }

    fn game_entries(&self) -> Vec<GameEntry> {
        match self.menu {
            Menu::Markup(_) => self.entries.clone(),
            Menu::Session(_) => Vec::new(),
        }
    }

    fn bind_entry_points(&mut self) {
        self.entries_bound = true;
        self.bind_calls += 1;
    }

    fn set_controls_hidden(&mut self, hidden: bool) {
        self.controls_hidden = hidden;
    }

    fn logo_style(&self) -> LogoStyle {
        self.logo.clone()
    }

    fn set_logo_style(&mut self, style: &LogoStyle) {
        for property in LogoStyle::PROPERTIES {
            self.logo
                .set(property, style.get(property).map(str::to_owned));
        }
    }

    fn menu_markup(&self) -> String {
        match &self.menu {
            Menu::Markup(markup) => markup.clone(),
            Menu::Session(container) => format!("{container:?}"),
        }
    }

    fn restore_menu_markup(&mut self, markup: &str) {
        self.menu = Menu::Markup(markup.to_owned());
        self.entries_bound = false;
        self.session_controls_bound = false;
    }

    fn mount_session(&mut self, container: &Element) {
        self.menu = Menu::Session(container.clone());
        self.entries_bound = false;
        self.session_controls_bound = true;
    }

    fn show_in_mount(&mut self, element: &Element) {
        if let Menu::Session(container) = &mut self.menu {
            if let Some(mount) = container.find_mut(view::MOUNT_ID) {
                mount.children.push(element.clone());
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_owned());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        if self.fail_fullscreen {
            return Err(Error::Fullscreen(String::from("permission denied")));
        }

        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        if self.fail_fullscreen {
            return Err(Error::Fullscreen(String::from("not allowed")));
        }

        self.fullscreen = false;
        Ok(())
    }

    fn remove_resources(&mut self, prefix: &str) -> usize {
        let mut resources = self.resources.borrow_mut();
        let before = resources.len();

        resources.retain(|resource| !resource.starts_with(prefix));

        before - resources.len()
    }

    fn schedule(&mut self, delay_ms: u32, command: Command) {
        self.timers.push((self.now + delay_ms, command));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitBehavior {
    Missing,
    Succeeds,
    Fails,
}

pub struct ScriptedEmulator {
    pub calls: Vec<String>,
    pub globals: Map<String, Value>,
    pub fail_load: bool,
    pub exit: ExitBehavior,
    /// Shared with [`MemoryPage::resources`] so loads show up on the page.
    pub resources: Rc<RefCell<Vec<String>>>,
    last_load: Option<(String, SessionId)>,
    exit_calls: Rc<Cell<u32>>,
}

impl ScriptedEmulator {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            globals: Map::new(),
            fail_load: false,
            exit: ExitBehavior::Succeeds,
            resources: Rc::new(RefCell::new(Vec::new())),
            last_load: None,
            exit_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn exit_calls(&self) -> u32 {
        self.exit_calls.get()
    }

    /// What the last injected script reports if its fetch fails.
    pub fn loader_failure(&self) -> Option<Command> {
        self.last_load
            .clone()
            .map(|(src, session)| Command::LoaderFailed { src, session })
    }
}

impl Emulator for ScriptedEmulator {
    fn e_set_globals(&mut self, globals: &Map<String, Value>) -> Result<()> {
        self.calls.push(String::from("globals"));
        self.globals = globals.clone();
        Ok(())
    }

    fn e_load(&mut self, src: &str, session: SessionId) -> Result<()> {
        self.calls.push(format!("load {src}"));
        self.last_load = Some((src.to_owned(), session));

        if self.fail_load {
            return Err(Error::ScriptLoad {
                src: src.to_owned(),
            });
        }

        let data_path = src.trim_end_matches(LOADER_SCRIPT);
        let mut resources = self.resources.borrow_mut();
        resources.push(src.to_owned());
        resources.push(format!("{data_path}emulator.min.css"));

        Ok(())
    }

    fn e_exit_hook(&mut self) -> Option<ExitHook> {
        let exit_calls = Rc::clone(&self.exit_calls);

        match self.exit {
            ExitBehavior::Missing => None,
            ExitBehavior::Succeeds => Some(Box::new(move || {
                exit_calls.set(exit_calls.get() + 1);
                Ok(())
            })),
            ExitBehavior::Fails => Some(Box::new(move || {
                exit_calls.set(exit_calls.get() + 1);
                Err(Error::ExitHook(String::from("EJS_emulator.exit threw")))
            })),
        }
    }
}

pub fn game(id: &str, title: &str, rom_path: &str) -> GameEntry {
    GameEntry {
        id: id.to_owned(),
        title: title.to_owned(),
        rom_path: rom_path.to_owned(),
        core: GameDefaults::default().core,
    }
}

/// A launcher over two cards with the page and engine sharing resources.
pub fn launcher() -> Launcher<MemoryPage, ScriptedEmulator> {
    launcher_with(ScriptedEmulator::new())
}

pub fn launcher_with(mut emulator: ScriptedEmulator) -> Launcher<MemoryPage, ScriptedEmulator> {
    let page = MemoryPage::with_cards(vec![
        game("card-pokemon", "Pokemon Esmeralda", "roms/emerald.gba"),
        game("card-zelda", "Zelda Minish Cap", "roms/minish.gba"),
    ]);
    emulator.resources = Rc::clone(&page.resources);

    Launcher::new(page, emulator, LauncherConfig::default())
}
