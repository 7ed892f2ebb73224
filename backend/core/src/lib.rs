pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, TutorError};
pub use traits::Analyzer;
pub use types::{Credential, EncodedImage, ImageBlob, ResultText};
