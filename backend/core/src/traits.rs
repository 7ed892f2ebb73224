use async_trait::async_trait;

use crate::error::TutorError;
use crate::types::{ImageBlob, ResultText};

/// Something that turns a picture of a math problem into an explanation.
///
/// Implemented by the HTTP inference client; tests substitute their own.
#[async_trait]
pub trait Analyzer: Send + Sync + 'static {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Run one analysis. Exactly one remote call per invocation.
    async fn analyze(&self, image: &ImageBlob) -> Result<ResultText, TutorError>;
}
