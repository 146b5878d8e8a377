//! Dialog runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the Elm runtime boundary. The reducer stays pure and returns
//! `UiEffect`s; `EffectRunner` turns them into tokio tasks whose results
//! come back through the inbox as `UiEvent::TaskCompleted`.
//!
//! Structure:
//! - `mod.rs`: `EffectRunner`, `DialogRuntime` and the event loop
//! - `inbox.rs`: inbox channel types
//! - `handlers.rs`: pure async effect handlers

mod handlers;
pub mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use intake_core::Services;
use intake_core::config::Config;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind};
use crate::dialog::{DialogOutcome, FormFields, Status};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame interval while something is animating or in flight (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Executes effects against the collaborators.
///
/// Every spawned task reports back through the inbox. Must be used from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct EffectRunner {
    services: Services,
    inbox_tx: UiEventSender,
}

impl EffectRunner {
    pub fn new(services: Services, inbox_tx: UiEventSender) -> Self {
        Self { services, inbox_tx }
    }

    pub fn execute_all(&self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute(effect);
        }
    }

    pub fn execute(&self, effect: UiEffect) {
        match effect {
            UiEffect::AddWebAccount { task, request } => {
                let store = Arc::clone(&self.services.accounts);
                self.spawn_task(
                    TaskKind::Submit,
                    task,
                    None,
                    handlers::add_web_account(store, request),
                );
            }
            UiEffect::AddApiAccount { task, request } => {
                let store = Arc::clone(&self.services.accounts);
                self.spawn_task(
                    TaskKind::Submit,
                    task,
                    None,
                    handlers::add_api_account(store, request),
                );
            }
            UiEffect::SubscribeOAuth {
                task,
                event,
                cancel,
            } => {
                // Registered here, before the URL request is spawned, so a
                // fast flow cannot emit into an empty bus.
                let subscription = self.services.events.subscribe_once(&event);
                tracing::debug!(%event, "OAuth listener registered");
                self.spawn_task(
                    TaskKind::OAuthListen,
                    task,
                    Some(cancel),
                    handlers::await_oauth(subscription),
                );
            }
            UiEffect::RequestAuthorizationUrl { task, cancel } => {
                let flow = Arc::clone(&self.services.oauth);
                self.spawn_task(
                    TaskKind::OAuthUrl,
                    task,
                    Some(cancel),
                    handlers::authorization_url(flow),
                );
            }
            UiEffect::OpenBrowser { task, url, cancel } => {
                let browser = Arc::clone(&self.services.browser);
                self.spawn_task(
                    TaskKind::Browser,
                    task,
                    Some(cancel),
                    handlers::open_browser(browser, url),
                );
            }
            UiEffect::StartTimer {
                kind,
                task,
                delay,
                cancel,
            } => {
                self.spawn_task(kind, task, Some(cancel), handlers::timer(delay));
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    tracing::trace!(?kind, "cancelling task");
                    cancel.cancel();
                }
            }
        }
    }

    /// Spawns `fut` and sends its result as `TaskCompleted`.
    ///
    /// A cancelled task drops its future and sends nothing.
    fn spawn_task<Fut>(
        &self,
        kind: TaskKind,
        id: TaskId,
        cancel: Option<CancellationToken>,
        fut: Fut,
    ) where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let result = match cancel {
                Some(cancel) => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return,
                        event = fut => event,
                    }
                }
                None => fut.await,
            };
            let completed = TaskCompleted {
                id,
                result: Box::new(result),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }
}

/// Full-screen runtime for one dialog session.
///
/// The terminal is restored on drop.
pub struct DialogRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    runner: EffectRunner,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl DialogRuntime {
    /// Sets up the terminal and the dialog state. The dialog starts closed.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(config: &Config, services: Services) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = inbox::channel();
        Ok(Self {
            terminal,
            state: AppState::new(config),
            runner: EffectRunner::new(services, inbox_tx),
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    pub fn open(&mut self, initial: FormFields) {
        let effects = update::open(&mut self.state, initial);
        self.runner.execute_all(effects);
    }

    /// Runs until the dialog closes and returns how it closed.
    ///
    /// # Errors
    /// Returns an error if reading input or drawing fails.
    pub fn run(&mut self) -> Result<DialogOutcome> {
        terminal::enable_input_features()?;
        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result?;
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> DialogOutcome {
        self.state
            .dialog
            .outcome()
            .unwrap_or(DialogOutcome::Cancelled)
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while self.state.dialog.is_open() {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.runner.execute_all(effects);
            }

            if dirty && self.state.dialog.is_open() {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects inbox results, terminal input and the spinner tick.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let animating =
            self.state.dialog.status == Status::Loading || self.state.tasks.is_any_running();
        let tick_interval = if animating {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }
}

impl Drop for DialogRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
