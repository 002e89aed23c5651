//! Core module containing the fundamental types for Module-Bridge
//!
//! Everything the bridge, the providers and the script value model share:
//! addresses, opaque pointers, protections, descriptors and errors.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address,
    ArgumentError,
    BridgeError,
    BridgeResult,
    NativePointer,
    PageProtection,
    ScriptError,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
