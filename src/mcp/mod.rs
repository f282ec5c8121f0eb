//! MCP (Model Context Protocol) server
//!
//! JSON-RPC 2.0 over stdio. Blocking I/O, one request at a time.
//!
//! - **protocol**: wire types and error codes
//! - **codec**: framing of requests and responses on a byte stream
//! - **dispatch**: method name → handler table
//! - **server**: the read → dispatch → write loop
//! - **handlers** / **tools**: the Ayd-backed MCP methods

pub mod codec;
pub mod dispatch;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use codec::{Codec, CodecError};
pub use dispatch::{Dispatcher, Handler, HandlerResult};
pub use handlers::{AydHandlers, ServerInfo};
pub use protocol::{ErrorBody, ErrorCode, Request, Response};
pub use server::{ServeError, Server};
