//! Response processing toggles applied by the transport.

use serde::{Deserialize, Serialize};

/// A single response-processing toggle.
///
/// Options are applied in order, so a later option addressing the same flag
/// wins over an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOption {
    /// Decode textual bodies to UTF-8 using the declared charset.
    AutoDecodeTextContent,
    /// Keep bodies as received.
    DisableAutoDecode,
    /// Read and drop bodies; responses come back with an empty body.
    DiscardResponseBody,
    /// Keep bodies in memory.
    KeepResponseBody,
}

/// The current state of every response-processing flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseOptionState {
    pub auto_decode_text: bool,
    pub discard_body: bool,
}

impl ResponseOptionState {
    pub fn apply(&mut self, option: ResponseOption) {
        match option {
            ResponseOption::AutoDecodeTextContent => self.auto_decode_text = true,
            ResponseOption::DisableAutoDecode => self.auto_decode_text = false,
            ResponseOption::DiscardResponseBody => self.discard_body = true,
            ResponseOption::KeepResponseBody => self.discard_body = false,
        }
    }

    pub fn apply_all<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        for option in options {
            self.apply(option);
        }
    }
}

/// True for content types whose body is text and may carry a charset.
pub fn is_text_content(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/")
        || mime.ends_with("json")
        || mime.ends_with("xml")
        || mime.ends_with("javascript")
        || mime == "application/x-www-form-urlencoded"
}
