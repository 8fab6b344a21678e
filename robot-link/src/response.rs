//! Controller response collection.
//!
//! Commands on the robot link do not return their outcome directly; the
//! controller streams acknowledgements and error reports back on the same
//! channel. A [`ResponseCollector`] accumulates those messages across a
//! command sequence so callers can fail fast between steps.

use crate::errors::LinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Ack,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Response {
    pub kind: ResponseKind,
    pub msg: String,
}

impl Response {
    pub fn ack(msg: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Ack,
            msg: msg.into(),
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Info,
            msg: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Error,
            msg: msg.into(),
        }
    }
}

/// Accumulates controller responses for one command sequence.
#[derive(Debug, Default)]
pub struct ResponseCollector {
    responses: Vec<Response>,
}

impl ResponseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, response: Response) {
        self.responses.push(response);
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Only the error responses collected so far.
    pub fn errors(&self) -> impl Iterator<Item = &Response> {
        self.responses
            .iter()
            .filter(|r| r.kind == ResponseKind::Error)
    }

    /// Fail-fast check between sequence steps: returns `Err` carrying the
    /// joined error messages when any error response has been collected.
    pub fn ensure_no_errors(&self) -> Result<(), LinkError> {
        let joined: Vec<&str> = self.errors().map(|r| r.msg.as_str()).collect();
        if joined.is_empty() {
            Ok(())
        } else {
            Err(LinkError::Robot(joined.join("; ")))
        }
    }

    pub fn clear(&mut self) {
        self.responses.clear();
    }
}
