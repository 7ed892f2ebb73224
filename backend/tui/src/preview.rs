//! Image preview drawn with half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the `▀` foreground, the lower one as the background.

use image::imageops::FilterType;
use image::DynamicImage;
use mathtutor_core::ImageBlob;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tracing::debug;

/// Largest side kept in memory; the preview pane is never wider than this.
const THUMBNAIL_SIDE: u32 = 256;

pub struct Preview {
    pub name: String,
    pub bytes: usize,
    thumbnail: Option<DynamicImage>,
}

impl Preview {
    /// Decodes the picture for display. Undecodable bytes still get a preview
    /// entry (name and size only); they are sent to the service regardless.
    pub fn from_blob(blob: &ImageBlob) -> Self {
        let thumbnail = match image::load_from_memory(blob.bytes()) {
            Ok(img) => Some(img.thumbnail(THUMBNAIL_SIDE, THUMBNAIL_SIDE)),
            Err(e) => {
                debug!(file = %blob.name(), error = %e, "Preview decode failed");
                None
            }
        };
        Self {
            name: blob.name().to_string(),
            bytes: blob.len(),
            thumbnail,
        }
    }

    pub fn is_decoded(&self) -> bool {
        self.thumbnail.is_some()
    }

    /// Lines filling at most `width` x `height` cells, aspect ratio kept.
    pub fn lines(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        let Some(img) = &self.thumbnail else {
            return vec![Line::from(format!("{} ({} bytes)", self.name, self.bytes))];
        };
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let fitted = img
            .resize(width as u32, height as u32 * 2, FilterType::Triangle)
            .to_rgb8();
        let (w, h) = fitted.dimensions();

        (0..h)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..w)
                    .map(|x| {
                        let [r, g, b] = fitted.get_pixel(x, y).0;
                        let style = Style::default().fg(Color::Rgb(r, g, b));
                        if y + 1 < h {
                            let [r2, g2, b2] = fitted.get_pixel(x, y + 1).0;
                            Span::styled("▀", style.bg(Color::Rgb(r2, g2, b2)))
                        } else {
                            Span::styled("▀", style)
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
