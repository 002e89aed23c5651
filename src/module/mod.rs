//! The script-visible `Module` facility
//!
//! [`ModuleBridge`] drives an [`IntrospectionProvider`](crate::provider::IntrospectionProvider)
//! on behalf of script code: enumeration sessions that feed `onMatch`
//! callbacks one record at a time, and direct address lookups.

mod bridge;
mod facility;
mod record;
mod resolver;
mod sink;

pub use bridge::{BridgeOptions, ModuleBridge, SessionEnd, SessionSummary, STOP_TOKEN};
pub use facility::MODULE_FUNCTIONS;
pub use record::RecordBuilder;
pub use sink::{ErrorSink, RecordingErrorSink, TracingErrorSink};
