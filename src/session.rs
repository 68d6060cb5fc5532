//! Menu/game lifecycle.
//!
//! The launcher owns the page and the emulator bridge and is the only thing
//! that moves between [`SessionState::Menu`] and [`SessionState::InGame`].
//! Whether a mount point exists on the page follows from the session, never
//! the other way round.

use tracing::{debug, info, warn};

use crate::config::LauncherConfig;
use crate::emulators::{Emulator, EmulatorBridge, EmulatorConfig};
use crate::game::GameEntry;
use crate::page::{Command, LogoStyle, Page, SessionId};
use crate::search::{SearchAction, SearchFilter};
use crate::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionState {
    Menu,
    InGame,
}

/// Menu markup and logo attributes as they were before any session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSnapshot {
    pub menu_markup: String,
    pub logo: LogoStyle,
}

impl UiSnapshot {
    pub fn capture(page: &impl Page) -> Self {
        Self {
            menu_markup: page.menu_markup(),
            logo: page.logo_style(),
        }
    }

    fn restore(&self, page: &mut impl Page) {
        page.restore_menu_markup(&self.menu_markup);
        page.set_logo_style(&self.logo);
    }
}

enum Session {
    Menu,
    InGame {
        id: SessionId,
        entry: GameEntry,
        config: EmulatorConfig,
        load_failed: bool,
    },
}

pub struct Launcher<P, E> {
    page: P,
    bridge: EmulatorBridge<E>,
    config: LauncherConfig,
    filter: SearchFilter,
    snapshot: UiSnapshot,
    /// Placeholder the search input had at startup; every revert goes back
    /// to this, not to whatever was showing when the notice went up.
    search_placeholder: String,
    session: Session,
    last_session: SessionId,
}

impl<P: Page, E: Emulator> Launcher<P, E> {
    pub fn new(mut page: P, emulator: E, config: LauncherConfig) -> Self {
        let snapshot = UiSnapshot::capture(&page);
        let search_placeholder = page.search_placeholder();
        let filter = SearchFilter::new(&config.keywords, config.not_found_message.clone());

        page.bind_entry_points();

        debug!(
            games = page.game_entries().len(),
            markup_len = snapshot.menu_markup.len(),
            "launcher attached"
        );

        Self {
            page,
            bridge: EmulatorBridge::new(emulator),
            config,
            filter,
            snapshot,
            search_placeholder,
            session: Session::Menu,
            last_session: SessionId::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.session {
            Session::Menu => SessionState::Menu,
            Session::InGame { .. } => SessionState::InGame,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn bridge(&self) -> &EmulatorBridge<E> {
        &self.bridge
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Game being played, if any.
    pub fn current_game(&self) -> Option<&GameEntry> {
        match &self.session {
            Session::InGame { entry, .. } => Some(entry),
            Session::Menu => None,
        }
    }

    pub fn emulator_config(&self) -> Option<&EmulatorConfig> {
        match &self.session {
            Session::InGame { config, .. } => Some(config),
            Session::Menu => None,
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Search => {
                self.search();
            }
            Command::Activate(entry) => self.activate(entry),
            Command::Exit => {
                self.exit();
            }
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::RevertSearchNotice => self.revert_search_notice(),
            Command::LoaderFailed { src, session } => self.loader_failed(&src, session),
        }
    }

    /// Runs the page's current query through the filter and shows the result.
    pub fn search(&mut self) -> SearchAction {
        let query = self.page.search_query();
        let action = self.filter.search(&query, &self.target_label());

        match &action {
            SearchAction::FocusTarget => {
                debug!(%query, "search matched");
                self.page.focus_primary_entry();
            }
            SearchAction::NotFound { message } => {
                debug!(%query, "search found nothing");
                self.page.clear_search();
                self.page.set_search_placeholder(message);
                // Earlier reverts are left pending: whichever fires first
                // clears the notice.
                self.page
                    .schedule(self.config.search_revert_ms, Command::RevertSearchNotice);
            }
        }

        action
    }

    pub fn revert_search_notice(&mut self) {
        self.page.set_search_placeholder(&self.search_placeholder);
    }

    fn target_label(&self) -> String {
        if let Some(label) = &self.config.target_label {
            return label.clone();
        }

        self.page
            .game_entries()
            .into_iter()
            .next()
            .map(|entry| entry.title)
            .unwrap_or_else(|| self.config.defaults.title.clone())
    }

    /// Starts a session for `entry`, or for the first game on the page.
    /// Does nothing while a session is running.
    pub fn activate(&mut self, entry: Option<GameEntry>) {
        if let Session::InGame { entry: current, .. } = &self.session {
            debug!(game = %current.title, "activation ignored, session already running");
            return;
        }

        let entry = entry
            .or_else(|| self.page.game_entries().into_iter().next())
            .unwrap_or_else(|| GameEntry::placeholder(&self.config.defaults));

        info!(game = %entry.title, rom = %entry.rom_path, "starting session");

        self.page.set_controls_hidden(true);
        self.page
            .set_logo_style(&LogoStyle::compact(&self.config.session));
        self.page
            .mount_session(&view::session_container(&self.config.session));

        let id = self.last_session.next();
        self.last_session = id;

        let config = EmulatorConfig::for_game(&entry, &self.config.data_path());
        let load_failed = match self.bridge.activate(&config, id) {
            Ok(()) => false,
            Err(err) => {
                warn!("emulator failed to start: {err}");
                self.show_load_error();
                true
            }
        };

        self.session = Session::InGame {
            id,
            entry,
            config,
            load_failed,
        };
    }

    /// Asks for confirmation and tears the session down. Returns whether the
    /// launcher is back on the menu.
    pub fn exit(&mut self) -> bool {
        if let Session::Menu = self.session {
            debug!("exit ignored, no session running");
            return true;
        }

        if !self.page.confirm(&self.config.exit_prompt) {
            debug!("exit declined");
            return false;
        }

        self.bridge.shutdown();

        let removed = self.page.remove_resources(&self.config.data_path());
        debug!(removed, "removed emulator resources");

        self.snapshot.restore(&mut self.page);
        self.page.bind_entry_points();
        self.page.set_controls_hidden(false);

        if let Session::InGame { entry, .. } = std::mem::replace(&mut self.session, Session::Menu) {
            info!(game = %entry.title, "session ended");
        }

        true
    }

    pub fn toggle_fullscreen(&mut self) {
        if let Session::Menu = self.session {
            debug!("fullscreen toggle ignored outside a session");
            return;
        }

        let result = if self.page.is_fullscreen() {
            self.page.exit_fullscreen()
        } else {
            self.page.request_fullscreen()
        };

        if let Err(err) = result {
            warn!("{err}");
        }
    }

    /// The entry script injected for `session` failed after the fact.
    pub fn loader_failed(&mut self, src: &str, session: SessionId) {
        let Session::InGame { id, load_failed, .. } = &mut self.session else {
            debug!(%src, "ignoring loader failure outside a session");
            return;
        };

        if *id != session {
            debug!(%src, ?session, current = ?id, "ignoring loader failure from an earlier session");
            return;
        }

        if *load_failed {
            debug!(%src, "load error already shown");
            return;
        }

        *load_failed = true;
        warn!(%src, "emulator entry script failed to load");

        self.show_load_error();
    }

    fn show_load_error(&mut self) {
        self.page
            .show_in_mount(&view::load_error(&self.config.load_error_message));
    }
}
