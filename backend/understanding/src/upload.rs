//! Picking an image file from disk.
//!
//! Only the extension is checked; the contents are sent as they are.

use std::io;
use std::path::Path;

use mathtutor_core::{ImageBlob, TutorError};
use tracing::info;

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// MIME type for an accepted picture, by extension.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

pub fn is_accepted(path: &Path) -> bool {
    image_mime_type(path).is_some()
}

/// Read a picked file into an [`ImageBlob`].
pub async fn load_image(path: &Path) -> Result<ImageBlob, TutorError> {
    if !is_accepted(path) {
        return Err(TutorError::Input(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} is not one of {}",
                path.display(),
                ACCEPTED_EXTENSIONS.join(", ")
            ),
        )));
    }

    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    info!(file = %name, bytes = data.len(), "Image loaded");
    Ok(ImageBlob::new(name, data))
}
