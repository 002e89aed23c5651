//! Execution scope around one synchronous call into script code

use super::value::{ScriptFunction, ScriptValue};
use crate::core::types::ScriptError;
use std::panic::{self, AssertUnwindSafe};

/// Brackets synchronous script invocations made from native code.
///
/// Errors raised by the callee, including Rust panics inside a callable, are
/// captured here instead of unwinding through the caller's frames. Only the
/// first error is kept.
#[derive(Debug, Default)]
pub struct ExecutionScope {
    pending: Option<ScriptError>,
}

impl ExecutionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `function` with `args`, returning its result or `None` if it raised
    pub fn call_sync(&mut self, function: &ScriptFunction, args: &[ScriptValue]) -> Option<ScriptValue> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| function.call(args)))
            .unwrap_or_else(|payload| Err(ScriptError::from_panic(payload)));

        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                self.capture(error);
                None
            }
        }
    }

    fn capture(&mut self, error: ScriptError) {
        if self.pending.is_none() {
            self.pending = Some(error);
        }
    }

    /// True once any call in this scope raised
    pub fn has_pending_error(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_error(&self) -> Option<&ScriptError> {
        self.pending.as_ref()
    }

    /// Removes the captured error for reporting
    pub fn take_error(&mut self) -> Option<ScriptError> {
        self.pending.take()
    }
}
