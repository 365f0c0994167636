//! Remote file content encoding.
//!
//! A note is stored remotely as `title + "\n" + body`: the first line is
//! the title, everything after the first newline is the body.

/// Encode a note for upload
#[must_use]
pub fn encode(title: &str, body: &str) -> Vec<u8> {
    format!("{title}\n{body}").into_bytes()
}

/// Decode downloaded bytes into `(title, body)`.
///
/// A payload without a newline is all title; invalid UTF-8 is replaced
/// lossily.
#[must_use]
pub fn decode(bytes: &[u8]) -> (String, String) {
    let text = String::from_utf8_lossy(bytes);
    match text.split_once('\n') {
        Some((title, body)) => (title.to_string(), body.to_string()),
        None => (text.into_owned(), String::new()),
    }
}
