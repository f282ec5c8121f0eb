pub mod ayd;
pub mod config;
pub mod mcp;

// Re-export commonly used types
pub use config::Config;
pub use mcp::{Dispatcher, Server};
