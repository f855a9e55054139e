//! Request/response data types. No parsing, no socket I/O - those are the
//! adapter's job (see `spec.md` §6). `Request`/`Response` are instantiations
//! of the `http` crate's generic types over our `Body`, the same way the
//! rest of the ecosystem wraps `http::Request<T>`/`http::Response<T>`.
use std::cell::{Cell, RefCell};

use bytes::Bytes;

pub type Request = http::Request<Body>;
pub type Response = http::Response<Body>;

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body has already been read")]
    AlreadyRead,
}

/// A single-pass byte payload with a declared or lazily-sniffed MIME type
/// and an optional known length. Reading twice is a programmer error.
pub struct Body {
    payload: RefCell<Option<Bytes>>,
    declared_mime: Option<String>,
    inferred_mime: RefCell<Option<String>>,
    length: Option<u64>,
    consumed: Cell<bool>,
}

impl Body {
    pub fn empty() -> Self {
        Self {
            payload: RefCell::new(Some(Bytes::new())),
            declared_mime: None,
            inferred_mime: RefCell::new(None),
            length: Some(0),
            consumed: Cell::new(false),
        }
    }

    pub fn from_bytes(bytes: impl Into<Bytes>, declared_mime: Option<String>) -> Self {
        let bytes = bytes.into();
        let length = Some(bytes.len() as u64);
        Self {
            payload: RefCell::new(Some(bytes)),
            declared_mime,
            inferred_mime: RefCell::new(None),
            length,
            consumed: Cell::new(false),
        }
    }

    /// The declared length, when known ahead of a read (e.g. from a
    /// `Content-Length` header the adapter already parsed).
    pub fn known_length(&self) -> Option<u64> {
        self.length
    }

    /// The declared MIME type, or a best-effort sniff over the unread
    /// payload's content prefix. Does not consume the body.
    pub fn mime(&self) -> Option<String> {
        if let Some(mime) = &self.declared_mime {
            return Some(mime.clone());
        }
        if let Some(mime) = self.inferred_mime.borrow().as_ref() {
            return Some(mime.clone());
        }
        let sniffed = self
            .payload
            .borrow()
            .as_ref()
            .and_then(|bytes| sniff_mime(bytes));
        if let Some(mime) = &sniffed {
            *self.inferred_mime.borrow_mut() = Some(mime.clone());
        }
        sniffed
    }

    /// Reads the full payload. Fails if already read.
    pub fn read(&self) -> Result<Bytes, BodyError> {
        if self.consumed.get() {
            return Err(BodyError::AlreadyRead);
        }
        self.consumed.set(true);
        self.payload.borrow_mut().take().ok_or(BodyError::AlreadyRead)
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}

fn sniff_mime(bytes: &Bytes) -> Option<String> {
    let prefix = bytes.iter().take(32).copied().collect::<Vec<u8>>();
    let trimmed = prefix
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| &prefix[start..])
        .unwrap_or(&[]);
    match trimmed.first()? {
        b'{' | b'[' => Some("application/json".to_string()),
        b'<' => Some("text/html".to_string()),
        _ => None,
    }
}
