//! Launcher: owns the active screen and every transition between screens.
//!
//! Flow: Startup → Selector → {Configure | Send | Dashboard} → Selector → …
//!
//! Screens never switch to each other. They raise a signal in their own
//! state (`completed`, `quitting`, `selected`, ...) and the launcher reads
//! it after each update, builds the next screen fresh and returns whatever
//! effects that screen needs to start.
//!
//! The remote client is only built here, right before entering Send or
//! Dashboard, from credentials reloaded from the store at that moment.

use std::sync::Arc;

use crate::api::{ApiError, SmsApi, SmsClient};
use crate::config::{CredentialStore, Credentials};

use super::configure::{self, ConfigureState};
use super::dashboard::{self, DashboardState};
use super::selector::{self, Choice, Notice, SelectorState};
use super::send::{self, SendState};
use super::startup::{self, StartupState};
use super::state::{AppEvent, AppState, Effect, Exit, ScreenId, Size};

/// Builds a client from freshly loaded credentials.
pub type Connector =
    Box<dyn Fn(&Credentials) -> Result<Arc<dyn SmsApi>, ApiError> + Send>;

pub struct Launcher {
    state: AppState,
    store: Box<dyn CredentialStore>,
    connect: Connector,
    api: Option<Arc<dyn SmsApi>>,
}

impl Launcher {
    pub fn new(store: Box<dyn CredentialStore>, connect: Connector) -> Self {
        Launcher {
            state: AppState::default(),
            store,
            connect,
            api: None,
        }
    }

    /// Launcher talking to the real service over HTTP.
    pub fn with_http_client(store: Box<dyn CredentialStore>) -> Self {
        Self::new(
            store,
            Box::new(|credentials: &Credentials| {
                let client = SmsClient::new(credentials)?;
                Ok(Arc::new(client) as Arc<dyn SmsApi>)
            }),
        )
    }

    /// Start on the startup screen.
    pub fn init(&mut self) -> Vec<Effect> {
        self.state.active = ScreenId::Startup;
        self.state.startup = StartupState {
            size: self.state.size,
            ..Default::default()
        };
        startup::init()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Client for effects issued by the current screen, if one was built.
    pub fn api(&self) -> Option<Arc<dyn SmsApi>> {
        self.api.clone()
    }

    pub fn exit(&self) -> Option<Exit> {
        self.state.exit
    }

    /// Feed one event to the active screen and follow any transition it signals.
    pub fn handle(&mut self, event: AppEvent) -> Vec<Effect> {
        if self.state.exit.is_some() {
            return Vec::new();
        }

        if let AppEvent::Resize { width, height } = event {
            self.resize(Size { width, height });
            return Vec::new();
        }

        let state = &mut self.state;
        let mut effects = match state.active {
            ScreenId::Startup => {
                let t = startup::update(std::mem::take(&mut state.startup), &event);
                state.startup = t.screen;
                t.effects
            }
            ScreenId::Selector => {
                let t = selector::update(std::mem::take(&mut state.selector), &event);
                state.selector = t.screen;
                t.effects
            }
            ScreenId::Configure => {
                let t = configure::update(std::mem::take(&mut state.configure), &event);
                state.configure = t.screen;
                t.effects
            }
            ScreenId::Send => {
                let t = send::update(std::mem::take(&mut state.send), &event);
                state.send = t.screen;
                t.effects
            }
            ScreenId::Dashboard => {
                let t = dashboard::update(std::mem::take(&mut state.dashboard), &event);
                state.dashboard = t.screen;
                t.effects
            }
        };

        effects.extend(self.follow_signals());
        effects
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Inspect the active screen's signals and switch screens if raised.
    fn follow_signals(&mut self) -> Vec<Effect> {
        match self.state.active {
            ScreenId::Startup => {
                if self.state.startup.quitting {
                    self.finish(Exit::Quit);
                } else if self.state.startup.completed {
                    self.enter_selector(None);
                }
                Vec::new()
            }
            ScreenId::Selector => {
                if self.state.selector.quitting {
                    self.finish(Exit::Quit);
                    return Vec::new();
                }
                match self.state.selector.selected {
                    Some(choice) => self.dispatch(choice),
                    None => Vec::new(),
                }
            }
            ScreenId::Configure => {
                if self.state.configure.completed {
                    let notice = self.save_configuration();
                    self.enter_selector(Some(notice));
                } else if self.state.configure.cancelled {
                    self.enter_selector(None);
                }
                Vec::new()
            }
            ScreenId::Send => {
                if self.state.send.quitting {
                    self.enter_selector(None);
                }
                Vec::new()
            }
            ScreenId::Dashboard => {
                if self.state.dashboard.quitting {
                    self.enter_selector(None);
                }
                Vec::new()
            }
        }
    }

    fn dispatch(&mut self, choice: Choice) -> Vec<Effect> {
        tracing::info!(?choice, "mode selected");
        match choice {
            Choice::Configure => {
                self.state.configure = ConfigureState {
                    size: self.state.size,
                    ..Default::default()
                };
                self.state.active = ScreenId::Configure;
                Vec::new()
            }
            Choice::Send => match self.connect_fresh() {
                Ok(credentials) => {
                    self.state.send = SendState {
                        size: self.state.size,
                        ..SendState::new(credentials.line_number)
                    };
                    self.state.active = ScreenId::Send;
                    Vec::new()
                }
                Err(notice) => {
                    self.enter_selector(Some(notice));
                    Vec::new()
                }
            },
            Choice::Dashboard => match self.connect_fresh() {
                Ok(_) => {
                    self.state.dashboard = DashboardState {
                        size: self.state.size,
                        ..DashboardState::loading()
                    };
                    self.state.active = ScreenId::Dashboard;
                    dashboard::init()
                }
                Err(notice) => {
                    self.enter_selector(Some(notice));
                    Vec::new()
                }
            },
            Choice::CommandLine => {
                self.finish(Exit::Help);
                Vec::new()
            }
        }
    }

    /// Reload, validate and connect. On failure the notice explains why.
    fn connect_fresh(&mut self) -> Result<Credentials, Notice> {
        self.api = None;

        let credentials = self.store.load().map_err(|e| {
            tracing::warn!(error = %e, "failed to load configuration");
            Notice::error(format!("Could not load configuration: {}", e))
        })?;

        credentials.validate().map_err(|e| {
            tracing::warn!(error = %e, "configuration incomplete");
            Notice::error(format!("Configuration incomplete: {}. Choose Configure first.", e))
        })?;

        let api = (self.connect)(&credentials).map_err(|e| {
            tracing::warn!(error = %e, "failed to build client");
            Notice::error(format!("Could not create client: {}", e))
        })?;

        self.api = Some(api);
        Ok(credentials)
    }

    /// Merge the wizard's key and line into the stored record and save it.
    fn save_configuration(&mut self) -> Notice {
        let mut credentials = self.store.load_stored().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "existing configuration unreadable, starting from defaults");
            Credentials::default()
        });
        credentials.api_key = self.state.configure.api_key.as_str().to_string();
        credentials.line_number = self.state.configure.line_number.as_str().to_string();

        match self.store.save(&credentials) {
            Ok(()) => Notice::info("Configuration saved"),
            Err(e) => {
                tracing::error!(error = %e, "failed to save configuration");
                Notice::error(format!("Could not save configuration: {}", e))
            }
        }
    }

    fn enter_selector(&mut self, notice: Option<Notice>) {
        self.state.selector = SelectorState {
            size: self.state.size,
            ..SelectorState::with_notice(notice)
        };
        self.state.active = ScreenId::Selector;
    }

    fn finish(&mut self, exit: Exit) {
        tracing::info!(?exit, "interactive session finished");
        self.state.exit = Some(exit);
    }

    /// Record the new size and pass it to every screen that is live or has
    /// been sized before.
    fn resize(&mut self, size: Size) {
        fn carry(slot: &mut Option<Size>, size: Size, active: bool) {
            if active || slot.is_some() {
                *slot = Some(size);
            }
        }

        let state = &mut self.state;
        let active = state.active;
        state.size = Some(size);
        carry(&mut state.startup.size, size, active == ScreenId::Startup);
        carry(&mut state.selector.size, size, active == ScreenId::Selector);
        carry(&mut state.configure.size, size, active == ScreenId::Configure);
        carry(&mut state.send.size, size, active == ScreenId::Send);
        carry(&mut state.dashboard.size, size, active == ScreenId::Dashboard);
    }
}

// ============================================================================
// TESTS
// ============================================================================
