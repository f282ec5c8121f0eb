//! MCP server - stdio transport

use std::io::{Read, Write};
use thiserror::Error;
use tracing::{debug, warn};

use super::codec::{Codec, CodecError};
use super::dispatch::Dispatcher;
use super::protocol::{ErrorBody, Request, Response};

/// Errors that stop the serve loop
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("malformed input: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
}

impl From<CodecError> for ServeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(e) => ServeError::Decode(e),
            CodecError::Io(e) => ServeError::Read(e),
        }
    }
}

/// Single-threaded read → dispatch → write loop
pub struct Server<R: Read, W: Write> {
    codec: Codec<R, W>,
    dispatcher: Dispatcher,
}

impl<R: Read, W: Write> Server<R, W> {
    pub fn new(codec: Codec<R, W>, dispatcher: Dispatcher) -> Self {
        Self { codec, dispatcher }
    }

    /// Serve until the input ends.
    ///
    /// Clean end of input returns `Ok(())`. Malformed input or a read failure
    /// stops the loop with an error; nothing is resynchronized. Write failures
    /// are logged and do not stop the loop.
    pub fn serve(&mut self) -> Result<(), ServeError> {
        while let Some(req) = self.codec.read()? {
            if let Some(response) = self.dispatch(&req) {
                if let Err(e) = self.codec.write(&response) {
                    warn!(method = %req.method, error = %e, "failed to write response");
                }
            }
        }
        debug!("input closed");
        Ok(())
    }

    /// Run the handler for `req` and build the response to send, if any
    fn dispatch(&self, req: &Request) -> Option<Response> {
        debug!(method = %req.method, notification = req.is_notification(), "dispatch");

        let outcome = match self.dispatcher.get(&req.method) {
            Some(handler) => handler.handle(req.params.clone()),
            None => Err(ErrorBody::method_not_found()),
        };

        // Notifications never get a reply, whatever the outcome
        let Some(id) = req.id.clone() else {
            if let Err(body) = outcome {
                warn!(method = %req.method, error = %body, "dropping error for notification");
            }
            return None;
        };

        match outcome {
            Err(body) => Some(Response::error(id, body)),
            Ok(Some(result)) if !result.is_null() => Some(Response::success(id, result)),
            Ok(_) => None,
        }
    }
}
