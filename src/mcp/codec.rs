//! Message framing over a byte stream
//!
//! Requests arrive as consecutive JSON values separated by optional whitespace.
//! Responses leave as one compact JSON value per line.

use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::{self, Read, Write};
use thiserror::Error;

use super::protocol::{Request, Response};

#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed, truncated or wrongly shaped JSON
    #[error("failed to decode request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to read request: {0}")]
    Io(#[source] io::Error),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CodecError::Io(io::Error::from(err))
        } else {
            CodecError::Decode(err)
        }
    }
}

/// Reads requests from `R` and writes responses to `W`
pub struct Codec<R: Read, W: Write> {
    requests: StreamDeserializer<'static, IoRead<R>, Request>,
    writer: W,
}

impl<R: Read, W: Write> Codec<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            requests: serde_json::Deserializer::from_reader(reader).into_iter(),
            writer,
        }
    }

    /// Read the next request.
    ///
    /// Returns `Ok(None)` once only whitespace remains. The reader is never
    /// consumed past the closing brace of the returned request.
    pub fn read(&mut self) -> Result<Option<Request>, CodecError> {
        match self.requests.next() {
            None => Ok(None),
            Some(Ok(req)) => Ok(Some(req)),
            Some(Err(e)) => Err(e.into()),
        }
    }

    pub fn write(&mut self, response: &Response) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
