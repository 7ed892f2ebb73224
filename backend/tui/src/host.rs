use mathtutor_core::ImageBlob;

/// The display surface the controller drives.
///
/// The terminal UI implements this; the one-shot CLI prints to stdout.
pub trait UiHost {
    /// Show the picture being analyzed.
    fn show_image(&mut self, image: &ImageBlob);

    /// Enter or leave the "working" state.
    fn set_busy(&mut self, busy: bool);

    /// Show a successful reply. `markdown` is the reply verbatim.
    fn show_result(&mut self, markdown: &str);

    /// Show an error banner.
    fn show_error(&mut self, message: &str);

    /// Drop the previous result or error before a new attempt.
    fn clear_output(&mut self);
}
