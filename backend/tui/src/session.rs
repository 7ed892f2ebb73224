//! Per-session inputs.
//!
//! A [`Session`] is created when the UI starts and dropped when it exits,
//! taking the credential and picture with it.

use mathtutor_core::{Credential, ImageBlob};

#[derive(Debug, Default)]
pub struct Session {
    credential: Option<Credential>,
    image: Option<ImageBlob>,
    /// Set whenever an input changes; cleared when an analysis is taken.
    armed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the credential field. An empty string clears it.
    pub fn set_credential(&mut self, raw: &str) {
        let next = (!raw.is_empty()).then(|| Credential::new(raw));
        if next != self.credential {
            self.credential = next;
            self.armed = true;
        }
    }

    /// Replace the picked picture. Empty files count as no picture.
    pub fn set_image(&mut self, image: ImageBlob) {
        self.image = (!image.is_empty()).then_some(image);
        self.armed = true;
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn image(&self) -> Option<&ImageBlob> {
        self.image.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.credential.is_some() && self.image.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Ask for another analysis of the current pair.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// The pair to analyze, if both are present and something changed since
    /// the last one was taken.
    pub(crate) fn take_ready(&mut self) -> Option<(Credential, ImageBlob)> {
        if !self.armed {
            return None;
        }
        let pair = (self.credential.clone()?, self.image.clone()?);
        self.armed = false;
        Some(pair)
    }
}
