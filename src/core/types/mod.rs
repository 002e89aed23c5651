//! Core type definitions for Module-Bridge
//!
//! Addresses and the opaque pointers wrapping them, page protections, the
//! descriptors an introspection provider hands out, and the error types.

mod address;
mod descriptor;
mod error;
mod pointer;
mod protection;

// Re-export all public types
pub use address::Address;
pub use descriptor::{ExportDescriptor, ExportKind, ImportDescriptor, ImportKind, RangeDescriptor};
pub use error::{ArgumentError, BridgeError, BridgeResult, ScriptError};
pub use pointer::{NativePointer, PointerFormat};
pub use protection::PageProtection;
