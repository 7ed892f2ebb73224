//! Tutor instruction sent alongside every picture.
//!
//! The wording lives in `prompts/`, one file per revision. Bump
//! [`PROMPT_VERSION`] and point [`TUTOR_INSTRUCTION`] at the new file when it
//! changes.

pub const PROMPT_VERSION: u32 = 1;

/// Math tutor persona plus the two output templates the model must follow.
pub const TUTOR_INSTRUCTION: &str = include_str!("../prompts/tutor_v1.txt");

/// What the model answers when the picture is not a math problem.
pub const UNRECOGNIZED_IMAGE_REPLY: &str = "**죄송합니다. 인식할 수 없는 사진입니다.**";

/// Whether a reply is the "could not recognize" template.
///
/// Such a reply is still a successful result.
pub fn is_unrecognized_reply(text: &str) -> bool {
    text.trim() == UNRECOGNIZED_IMAGE_REPLY
}
