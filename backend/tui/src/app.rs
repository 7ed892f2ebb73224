//! TUI App State
//!
//! Field buffers, focus, and whatever the controller last asked to display.

use markdown::{IrParser, MarkdownNode};
use mathtutor_core::ImageBlob;

use crate::host::UiHost;
use crate::preview::Preview;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    ImagePath,
}

pub enum Output {
    Empty,
    Result(Vec<MarkdownNode>),
    Error(String),
}

pub struct AppState {
    pub api_key_input: String,
    pub image_path_input: String,
    pub focus: Field,
    pub preview: Option<Preview>,
    pub busy: bool,
    pub spinner_frame: usize,
    pub output: Output,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_key_input: String::new(),
            image_path_input: String::new(),
            focus: Field::ApiKey,
            preview: None,
            busy: false,
            spinner_frame: 0,
            output: Output::Empty,
            should_quit: false,
        }
    }

    /// The credential as drawn: one bullet per character.
    pub fn masked_api_key(&self) -> String {
        "•".repeat(self.api_key_input.chars().count())
    }

    pub fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            Field::ApiKey => &mut self.api_key_input,
            Field::ImagePath => &mut self.image_path_input,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::ApiKey => Field::ImagePath,
            Field::ImagePath => Field::ApiKey,
        };
    }

    pub fn tick(&mut self) {
        if self.busy {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHost for AppState {
    fn show_image(&mut self, image: &ImageBlob) {
        self.preview = Some(Preview::from_blob(image));
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.spinner_frame = 0;
    }

    fn show_result(&mut self, markdown: &str) {
        self.output = Output::Result(IrParser::parse(markdown));
    }

    fn show_error(&mut self, message: &str) {
        self.output = Output::Error(message.to_string());
    }

    fn clear_output(&mut self) {
        self.output = Output::Empty;
    }
}
