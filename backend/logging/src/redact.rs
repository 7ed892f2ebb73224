//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and inline image data from strings prior
//! to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[A-Za-z0-9_\-]{16,})|(Bearer\s+[A-Za-z0-9\-\._~+/]+=*)").unwrap()
});
static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:image/[a-z]+;base64,[A-Za-z0-9+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    DATA_URL_RE
        .replace_all(&redacted, "data:image;base64,[REDACTED_IMAGE]")
        .into_owned()
}
