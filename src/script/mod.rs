//! Script runtime boundary
//!
//! The value model the bridge hands to script code, the execution scope that
//! contains errors raised by script callbacks, and the argument decoder that
//! validates script calls before anything native runs.

pub mod args;
pub mod scope;
pub mod value;

pub use args::{
    ArgumentDecoder, CallbackHandle, EnumerateArgs, EnumerateRangesArgs, FindBaseAddressArgs,
    FindExportByNameArgs, FromArguments, MatchCallbacks, Param, Signature,
};
pub use scope::ExecutionScope;
pub use value::{Callable, ScriptFunction, ScriptObject, ScriptValue, MAX_SAFE_INTEGER};
