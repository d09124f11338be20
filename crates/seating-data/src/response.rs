//! Buffered HTTP responses.

use crate::FetchError;

/// Longest body excerpt carried in an HTTP error.
const ERROR_EXCERPT_CHARS: usize = 200;

/// A storefront response, read to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Value of the `Content-Type` header, if sent.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server declared a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|mime| {
                let mime = mime.trim();
                mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
            })
            .unwrap_or(false)
    }

    /// Start of the body as text, for error reports.
    pub fn excerpt(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let trimmed = text.trim();
        match trimmed.char_indices().nth(ERROR_EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}...", &trimmed[..cut]),
            None => trimmed.to_string(),
        }
    }

    /// Fail on any non-2xx status, keeping an excerpt of the body.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(FetchError::HttpError {
            status: self.status,
            message: self.excerpt(),
        })
    }
}
