//! Module-Bridge: loaded-module introspection for script callbacks
//!
//! A [`ModuleBridge`] sits between a blocking, native
//! [`IntrospectionProvider`] and script code. Script calls are decoded
//! against fixed signatures, each discovered import, export or range is
//! turned into a record and handed to an `onMatch` callback inside an
//! [`ExecutionScope`], and `onComplete` fires exactly once per session.

pub mod config;
pub mod core;
pub mod module;
pub mod provider;
pub mod script;

// Re-export main types from core module
pub use crate::core::types::{
    Address, ArgumentError, BridgeError, BridgeResult, ExportDescriptor, ExportKind,
    ImportDescriptor, ImportKind, NativePointer, PageProtection, PointerFormat, RangeDescriptor,
    ScriptError,
};

pub use module::{
    BridgeOptions, ErrorSink, ModuleBridge, RecordingErrorSink, SessionEnd, SessionSummary,
    TracingErrorSink,
};
pub use provider::{IntrospectionProvider, ModuleSnapshot, ProcessSnapshot, SnapshotProvider};
pub use script::{ExecutionScope, MatchCallbacks, ScriptFunction, ScriptObject, ScriptValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(crate::core::VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(crate::core::AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_address_reexport() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_u64(), 0x1000);
        assert!(Address::null().is_null());
    }

    #[test]
    fn test_pointer_reexport() {
        assert!(NativePointer::new(Address::null()).is_none());
        let ptr = NativePointer::new(Address::new(0x10)).unwrap();
        assert_eq!(ScriptValue::from(ptr).to_display_string(), "0x10");
    }

    #[test]
    fn test_bridge_reexport() {
        let bridge = ModuleBridge::new(SnapshotProvider::default(), RecordingErrorSink::new());
        assert_eq!(bridge.options(), BridgeOptions::default());
        assert!(bridge.resolve_base_address("anything").is_none());
    }
}
