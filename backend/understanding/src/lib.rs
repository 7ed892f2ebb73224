pub mod prompt;
pub mod request;
#[cfg(any(test, feature = "stub-server"))]
pub mod stub;
pub mod upload;
pub mod vision;

pub use prompt::{is_unrecognized_reply, TUTOR_INSTRUCTION, UNRECOGNIZED_IMAGE_REPLY};
pub use request::{build_messages, build_request, encode, ChatRequest};
pub use upload::{is_accepted, load_image, ACCEPTED_EXTENSIONS};
pub use vision::{InferenceClient, DEFAULT_API_BASE, DEFAULT_MODEL};
