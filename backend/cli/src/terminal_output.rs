//! Terminal output utilities: ANSI notes and the stdout [`UiHost`].

use std::io::Write;

use markdown::{IrParser, Renderer};
use mathtutor_core::ImageBlob;
use tui::UiHost;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// A formatted INFO note.
pub fn note_info(msg: &str, color: bool) -> String {
    if color {
        format!("{CYAN}{BOLD}ℹ{RESET} {msg}")
    } else {
        format!("INFO: {msg}")
    }
}

/// A formatted ERROR note.
pub fn note_error(msg: &str, color: bool) -> String {
    if color {
        format!("{RED}{BOLD}✗{RESET} {msg}")
    } else {
        format!("ERROR: {msg}")
    }
}

/// Prints what the controller shows, line by line.
///
/// The busy state is a single "working" line since stdout cannot animate.
pub struct StdoutHost<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> StdoutHost<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // A closed stdout is not worth failing the analysis over.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> UiHost for StdoutHost<W> {
    fn show_image(&mut self, image: &ImageBlob) {
        let msg = format!("사진: {} ({} bytes)", image.name(), image.len());
        let note = note_info(&msg, self.color);
        self.line(&note);
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let text = if self.color {
                format!("{DIM}수학 문제 풀이중...{RESET}")
            } else {
                "수학 문제 풀이중...".to_string()
            };
            self.line(&text);
        }
    }

    fn show_result(&mut self, markdown: &str) {
        let nodes = IrParser::parse(markdown);
        let rendered = if self.color {
            Renderer::to_ansi(&nodes)
        } else {
            Renderer::to_plain_text(&nodes)
        };
        self.line(&rendered);
    }

    fn show_error(&mut self, message: &str) {
        let note = note_error(message, self.color);
        self.line(&note);
    }

    fn clear_output(&mut self) {}
}
