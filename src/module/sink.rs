//! Host error sinks for script errors captured during enumeration

use crate::core::types::ScriptError;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::error;

/// Receives errors that script callbacks raised inside an execution scope.
///
/// Called once per failed session, after its completion callback ran.
/// Implementations must not fail.
pub trait ErrorSink {
    fn report(&self, error: &ScriptError);
}

/// Logs reported errors through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, err: &ScriptError) {
        error!(name = %err.name, message = %err.message, "unhandled script error");
    }
}

/// Keeps every reported error for later inspection
#[derive(Debug, Default)]
pub struct RecordingErrorSink {
    errors: RefCell<Vec<ScriptError>>,
}

impl RecordingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<ScriptError> {
        self.errors.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Drains the recorded errors
    pub fn take(&self) -> Vec<ScriptError> {
        self.errors.take()
    }
}

impl ErrorSink for RecordingErrorSink {
    fn report(&self, error: &ScriptError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for &S {
    fn report(&self, error: &ScriptError) {
        (**self).report(error)
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for Rc<S> {
    fn report(&self, error: &ScriptError) {
        (**self).report(error)
    }
}
