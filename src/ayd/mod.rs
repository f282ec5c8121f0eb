//! Ayd - the monitoring backend
//!
//! - **Client**: blocking HTTP client for a running Ayd instance
//! - **Report**: typed model of `status.json` and `log.json`
//!
//! Handlers talk to Ayd through the [`Backend`] trait so they can be tested
//! without a server.

mod internal;
mod report;

pub use internal::{BackendError, Client};
pub use report::{LogQuery, LogResponse, ProbeHistory, Record, Report, Status};

/// Default timeout for a single Ayd request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetch-and-decode operations against Ayd
pub trait Backend: Send + Sync {
    /// `targets.json`: every monitored target URI
    fn targets(&self) -> Result<Vec<String>, BackendError>;

    /// `status.json`: probe history per target
    fn report(&self) -> Result<Report, BackendError>;

    /// `log.json`: records matching `query`
    fn log(&self, query: &LogQuery) -> Result<Vec<Record>, BackendError>;
}
