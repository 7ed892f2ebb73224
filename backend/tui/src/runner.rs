//! Terminal event loop.
//!
//! Owns the terminal, the session controller, and the single analysis in
//! flight. The loop keeps drawing (spinner included) while the request runs.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use mathtutor_core::{Analyzer, Credential};
use mathtutor_understanding::{load_image, InferenceClient};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::app::AppState;
use crate::controller::{InteractionController, PendingAnalysis};
use crate::host::UiHost;
use crate::input::{handle_key_event, UserAction};
use crate::render::draw_ui;

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TuiConfig {
    pub api_base: String,
    pub model: String,
}

/// Runs the interactive UI until the user quits.
pub async fn run_app(config: TuiConfig) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, config).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: TuiConfig,
) -> Result<()> {
    let TuiConfig { api_base, model } = config;
    let mut controller = InteractionController::new(move |credential: Credential| {
        InferenceClient::new(credential)
            .with_base_url(api_base.clone())
            .with_model(model.clone())
    });
    let mut state = AppState::new();
    let mut pending: Option<PendingAnalysis> = None;
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    info!("Session started");
    while !state.should_quit {
        terminal.draw(|f| draw_ui(f, &state))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = handle_key_event(key, &mut state) {
                        apply_action(action, &mut controller, &mut state).await;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            outcome = async {
                match pending.as_mut() {
                    Some(p) => p.outcome().await,
                    None => None,
                }
            }, if pending.is_some() => {
                if let Some(done) = pending.take() {
                    match outcome {
                        Some(outcome) => controller.finish(outcome, &mut state),
                        None => controller.abandon(done.attempt(), &mut state),
                    }
                }
            },
            _ = ticker.tick() => state.tick(),
        }

        if pending.is_none() {
            pending = controller.poll_start(&mut state);
        }
    }

    if let Some(p) = pending.take() {
        controller.cancel(p, &mut state);
    }
    info!(attempts = controller.attempts(), "Session ended");
    Ok(())
}

async fn apply_action<F, A>(
    action: UserAction,
    controller: &mut InteractionController<F>,
    state: &mut AppState,
) where
    F: Fn(Credential) -> A,
    A: Analyzer,
{
    match action {
        UserAction::CommitCredential(raw) => controller.session_mut().set_credential(&raw),
        UserAction::PickImage(path) => pick_image(&path, controller, state).await,
        UserAction::Rerun => controller.session_mut().rearm(),
    }
}

async fn pick_image<F, A>(
    path: &Path,
    controller: &mut InteractionController<F>,
    state: &mut AppState,
) where
    F: Fn(Credential) -> A,
    A: Analyzer,
{
    match load_image(path).await {
        Ok(image) => controller.session_mut().set_image(image),
        Err(e) => {
            controller.session_mut().clear_image();
            state.preview = None;
            state.show_error(&format!("이미지를 불러올 수 없습니다: {e}"));
        }
    }
}
