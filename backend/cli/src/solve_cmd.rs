//! `mathtutor solve`: one picture, one answer, printed to stdout.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mathtutor_core::Credential;
use mathtutor_understanding::{load_image, InferenceClient};
use tracing::info;
use tui::{InteractionController, Phase};

use crate::config::Config;
use crate::terminal_output::StdoutHost;

/// Returns whether a result (not an error) was shown.
pub async fn run<W: Write>(
    config: &Config,
    image_path: &Path,
    api_key: &str,
    host: &mut StdoutHost<W>,
) -> Result<bool> {
    let image = load_image(image_path)
        .await
        .with_context(|| format!("loading {}", image_path.display()))?;

    let api_base = config.api_base.clone();
    let model = config.model.clone();
    let mut controller = InteractionController::new(move |credential: Credential| {
        InferenceClient::new(credential)
            .with_base_url(api_base.clone())
            .with_model(model.clone())
    });
    controller.session_mut().set_credential(api_key);
    controller.session_mut().set_image(image);

    match controller.run_ready(host).await {
        Some(phase) => {
            info!(?phase, "Solve finished");
            Ok(phase == Phase::ShowResult)
        }
        None => bail!("an API key and a non-empty image are both required"),
    }
}
