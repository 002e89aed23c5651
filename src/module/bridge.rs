//! Enumeration bridge: drives a provider walk and feeds script callbacks
//!
//! One call to an `enumerate*` operation is one session. The session lives on
//! the caller's stack frame and owns nothing past the call, so a callback may
//! start another session on the same bridge while the first is still walking.

use super::record::RecordBuilder;
use super::sink::{ErrorSink, TracingErrorSink};
use crate::core::types::{
    ArgumentError, ExportDescriptor, ImportDescriptor, PageProtection, PointerFormat, RangeDescriptor,
    ScriptError,
};
use crate::provider::{IntrospectionProvider, Visit};
use crate::script::args::{
    ArgumentDecoder, EnumerateArgs, EnumerateRangesArgs, MatchCallbacks, ENUMERATE_EXPORTS,
    ENUMERATE_IMPORTS,
};
use crate::script::scope::ExecutionScope;
use crate::script::value::{ScriptObject, ScriptValue};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// Return value of `onMatch` that ends a session early
pub const STOP_TOKEN: &str = "stop";

/// Bridge-wide settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeOptions {
    #[serde(default)]
    pub pointer_format: PointerFormat,
}

/// How an enumeration session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The provider ran out of items
    Exhausted,
    /// `onMatch` returned `"stop"`
    Stopped,
    /// `onMatch` raised; the error went to the error sink
    Failed,
}

/// Outcome of a completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Number of `onMatch` invocations
    pub delivered: usize,
    pub end: SessionEnd,
}

/// The script-visible "Module" facility.
///
/// Constructed once per script runtime and shared immutably; every session's
/// state is local to the call that started it.
pub struct ModuleBridge<P, S = TracingErrorSink> {
    provider: P,
    sink: S,
    options: BridgeOptions,
    records: RecordBuilder,
}

impl<P: IntrospectionProvider> ModuleBridge<P> {
    /// Bridge reporting captured script errors through `tracing`
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, TracingErrorSink)
    }
}

impl<P: IntrospectionProvider, S: ErrorSink> ModuleBridge<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self::with_options(provider, sink, BridgeOptions::default())
    }

    pub fn with_options(provider: P, sink: S, options: BridgeOptions) -> Self {
        debug!(pointer_format = ?options.pointer_format, "module bridge initialized");
        ModuleBridge {
            provider,
            sink,
            options,
            records: RecordBuilder::new(options.pointer_format),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn error_sink(&self) -> &S {
        &self.sink
    }

    pub fn options(&self) -> BridgeOptions {
        self.options
    }

    /// Logs a decoding failure and yields the "no result" sentinel
    pub(crate) fn argument_error(&self, err: ArgumentError) -> ScriptValue {
        warn!(operation = err.operation(), error = %err, "rejected call arguments");
        ScriptValue::Null
    }

    /// `enumerateImports(moduleName, {onMatch, onComplete})`
    ///
    /// Returns `null` on bad arguments without calling anything, `undefined`
    /// after a completed session, or the error `onComplete` raised.
    pub fn enumerate_imports(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        let args = match ArgumentDecoder::decode_with::<EnumerateArgs>(&ENUMERATE_IMPORTS, args) {
            Ok(args) => args,
            Err(err) => return Ok(self.argument_error(err)),
        };
        self.enumerate_imports_with(args.module_name, args.callbacks)?;
        Ok(ScriptValue::Undefined)
    }

    /// `enumerateExports(moduleName, {onMatch, onComplete})`
    pub fn enumerate_exports(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        let args = match ArgumentDecoder::decode_with::<EnumerateArgs>(&ENUMERATE_EXPORTS, args) {
            Ok(args) => args,
            Err(err) => return Ok(self.argument_error(err)),
        };
        self.enumerate_exports_with(args.module_name, args.callbacks)?;
        Ok(ScriptValue::Undefined)
    }

    /// `enumerateRanges(moduleName, protection, {onMatch, onComplete})`
    pub fn enumerate_ranges(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        let args = match ArgumentDecoder::decode::<EnumerateRangesArgs>(args) {
            Ok(args) => args,
            Err(err) => return Ok(self.argument_error(err)),
        };
        self.enumerate_ranges_with(args.module_name, args.protection, args.callbacks)?;
        Ok(ScriptValue::Undefined)
    }

    /// Import enumeration for already-decoded arguments
    pub fn enumerate_imports_with(
        &self,
        module_name: &str,
        callbacks: MatchCallbacks<'_>,
    ) -> Result<SessionSummary, ScriptError> {
        MatchSession::new("enumerateImports", module_name, callbacks).run(
            |visitor| self.provider.enumerate_imports(module_name, visitor),
            |import: &ImportDescriptor| self.records.import(import),
            &self.sink,
        )
    }

    /// Export enumeration for already-decoded arguments
    pub fn enumerate_exports_with(
        &self,
        module_name: &str,
        callbacks: MatchCallbacks<'_>,
    ) -> Result<SessionSummary, ScriptError> {
        MatchSession::new("enumerateExports", module_name, callbacks).run(
            |visitor| self.provider.enumerate_exports(module_name, visitor),
            |export: &ExportDescriptor| self.records.export(export),
            &self.sink,
        )
    }

    /// Range enumeration for already-decoded arguments
    pub fn enumerate_ranges_with(
        &self,
        module_name: &str,
        protection: PageProtection,
        callbacks: MatchCallbacks<'_>,
    ) -> Result<SessionSummary, ScriptError> {
        MatchSession::new("enumerateRanges", module_name, callbacks).run(
            |visitor| self.provider.enumerate_ranges(module_name, protection, visitor),
            |range: &RangeDescriptor| self.records.range(range),
            &self.sink,
        )
    }
}

/// State of one enumeration session
struct MatchSession<'a> {
    operation: &'static str,
    module_name: &'a str,
    callbacks: MatchCallbacks<'a>,
    delivered: usize,
    end: Option<SessionEnd>,
    pending: Option<ScriptError>,
}

impl<'a> MatchSession<'a> {
    fn new(operation: &'static str, module_name: &'a str, callbacks: MatchCallbacks<'a>) -> Self {
        MatchSession {
            operation,
            module_name,
            callbacks,
            delivered: 0,
            end: None,
            pending: None,
        }
    }

    /// Walks the provider, then fires `onComplete` and reports any captured error
    fn run<D, E, B, S>(mut self, enumerate: E, build: B, sink: &S) -> Result<SessionSummary, ScriptError>
    where
        E: FnOnce(&mut dyn FnMut(&D) -> Visit),
        B: Fn(&D) -> ScriptObject,
        S: ErrorSink + ?Sized,
    {
        debug!(
            operation = self.operation,
            module = self.module_name,
            "enumeration started"
        );

        let mut visitor = |descriptor: &D| self.visit(descriptor, &build);
        enumerate(&mut visitor);

        self.finish(sink)
    }

    fn visit<D, B>(&mut self, descriptor: &D, build: &B) -> Visit
    where
        B: Fn(&D) -> ScriptObject,
    {
        if self.end.is_some() {
            warn!(
                operation = self.operation,
                module = self.module_name,
                "provider kept visiting after stop"
            );
            return ControlFlow::Break(());
        }

        let mut scope = ExecutionScope::new();
        // The record is owned by this frame and dropped when the call returns;
        // script code that keeps it holds its own copy.
        let args = [ScriptValue::Object(build(descriptor))];
        let result = scope.call_sync(self.callbacks.on_match.function(), &args);
        self.delivered += 1;
        trace!(operation = self.operation, index = self.delivered - 1, "delivered match");

        if scope.has_pending_error() {
            self.pending = scope.take_error();
            self.end = Some(SessionEnd::Failed);
            return ControlFlow::Break(());
        }

        match result {
            Some(value) if value.to_display_string() == STOP_TOKEN => {
                self.end = Some(SessionEnd::Stopped);
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        }
    }

    fn finish<S: ErrorSink + ?Sized>(self, sink: &S) -> Result<SessionSummary, ScriptError> {
        let summary = SessionSummary {
            delivered: self.delivered,
            end: self.end.unwrap_or(SessionEnd::Exhausted),
        };
        debug!(
            operation = self.operation,
            module = self.module_name,
            delivered = summary.delivered,
            end = ?summary.end,
            "enumeration finished"
        );

        // Outside any scope: an error here belongs to the caller, but a
        // captured onMatch error is reported even if onComplete unwinds
        let completed = panic::catch_unwind(AssertUnwindSafe(|| self.callbacks.on_complete.call(&[])));

        if let Some(err) = &self.pending {
            sink.report(err);
        }

        match completed {
            Ok(result) => result.map(|_| summary),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
