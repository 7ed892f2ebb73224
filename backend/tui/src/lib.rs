//! Terminal UI for mathtutor.
//!
//! The [`InteractionController`] gates and runs analyses; [`AppState`] is the
//! ratatui-backed [`UiHost`] it drives.

pub mod app;
pub mod controller;
pub mod host;
pub mod input;
pub mod markdown_view;
pub mod preview;
pub mod render;
pub mod runner;
pub mod session;

pub use app::AppState;
pub use controller::{AnalysisOutcome, InteractionController, PendingAnalysis, Phase};
pub use host::UiHost;
pub use input::{handle_key_event, UserAction};
pub use render::draw_ui;
pub use runner::{run_app, TuiConfig};
pub use session::Session;
