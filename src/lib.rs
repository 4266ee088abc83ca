//! # learn-web
//!
//! A terminal application for learning Next.js, React and TypeScript:
//! topic pages with tabbed explanations and examples, multiple-choice
//! quizzes, and an email/password account backed by an HTTP API or an
//! in-process store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use learn_web::{Config, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let config = Config::parse();
//!     let app = learn_web::build_app(&config)?;
//!     learn_web::run(app).await
//! }
//! ```

mod app;
pub mod auth;
pub mod config;
mod data;
pub mod logging;
mod models;
pub mod prefs;
pub mod protocol;
pub mod quiz;
pub mod storage;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;
use tracing::info;

pub use app::{App, HomeEntry, Task, TopicTab, View};
pub use auth::{AuthBackend, AuthError, AuthFacade, HttpBackend, MemoryBackend};
pub use config::{BackendKind, Command, Config};
pub use data::{LoadError, builtin_catalog, load_catalog, load_quiz_from_str, load_topic_from_str};
pub use models::{Catalog, DetailGroup, Example, Kind, Question, QuestionSet, Section, Topic};
pub use quiz::{QuizSession, SessionError};
pub use storage::{FileStore, SlotStore, StoreError};

const TICK: Duration = Duration::from_millis(100);

/// Error type for everything outside the auth and quiz state machines.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load content: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The catalog named by `--content`, or the built-in one.
pub fn load_content(config: &Config) -> Result<Catalog, LoadError> {
    match &config.content {
        Some(path) => load_catalog(path),
        None => Catalog::builtin(),
    }
}

pub fn open_store(config: &Config) -> Result<Arc<dyn SlotStore>, StoreError> {
    let store = FileStore::open(config.data_dir())?;
    info!(path = %store.path().display(), "opened state file");
    Ok(Arc::new(store))
}

pub fn auth_facade(config: &Config, store: Arc<dyn SlotStore>) -> AuthFacade {
    let backend: Box<dyn AuthBackend> = match config.backend {
        BackendKind::Http => Box::new(HttpBackend::new(config.api_url.as_str())),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    AuthFacade::new(backend, store)
}

/// Wire the content, slot store, auth and preferences into an [`App`].
pub fn build_app(config: &Config) -> Result<App, Error> {
    let catalog = load_content(config)?;
    let store = open_store(config)?;
    let auth = auth_facade(config, Arc::clone(&store));
    let width = crossterm::terminal::size().map(|(width, _)| width).unwrap_or(80);

    Ok(App::new(
        catalog,
        auth,
        store,
        config.system_scheme(),
        width,
    ))
}

/// Take over the terminal and run until the user quits.
pub async fn run(mut app: App) -> Result<(), Error> {
    let mut guard = terminal::TerminalGuard::enter()?;
    let size = guard.terminal().size()?;
    app.resize(size.width);

    run_event_loop(guard.terminal(), &mut app).await
}

async fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), Error> {
    while !app.should_quit() {
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(task) = app.handle_key(key) {
                    terminal.draw(|frame| ui::render(frame, app))?;
                    app.perform(task).await;
                }
            }
            Event::Resize(width, _) => app.resize(width),
            _ => {}
        }
    }

    info!("quit");
    Ok(())
}
