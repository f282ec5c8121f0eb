//! Method name → handler table

use serde_json::Value;
use std::collections::HashMap;

use super::protocol::ErrorBody;

/// `Ok(None)` means "nothing to reply"
pub type HandlerResult = Result<Option<Value>, ErrorBody>;

/// A unit of logic bound to one method name.
///
/// Receives the raw `params` member and is responsible for decoding it.
pub trait Handler: Send + Sync {
    fn handle(&self, params: Value) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(Value) -> HandlerResult + Send + Sync,
{
    fn handle(&self, params: Value) -> HandlerResult {
        self(params)
    }
}

/// Filled once before serving, read-only afterwards
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `method`, replacing any previous entry
    pub fn register<H>(&mut self, method: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.handlers.insert(method.into(), Box::new(handler));
        self
    }

    pub fn get(&self, method: &str) -> Option<&dyn Handler> {
        self.handlers.get(method).map(|h| h.as_ref())
    }

    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
