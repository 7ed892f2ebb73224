use std::fmt;
use std::io::Cursor;

use bytes::Bytes;
use serde::Serialize;

/// Bearer token typed in by the user. Never validated, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.chars().count())
    }
}

/// Raw bytes of an uploaded picture, plus the name it was picked under.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    name: String,
    data: Bytes,
}

impl ImageBlob {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A fresh seekable reader over the bytes.
    pub fn cursor(&self) -> Cursor<Bytes> {
        Cursor::new(self.data.clone())
    }
}

/// Base64 text of an [`ImageBlob`]; lives for one request construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(b64: String) -> Self {
        Self(b64)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Answer text as returned by the service, markdown included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultText(String);

impl ResultText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResultText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
