//! Conversion of native descriptors into script-visible records
//!
//! A field appears on a record only when the descriptor actually carries that
//! information. Absent fields are left off the object, never filled with
//! `null` or an empty string.

use crate::core::types::{
    Address, ExportDescriptor, ExportKind, ImportDescriptor, ImportKind, NativePointer, PointerFormat,
    RangeDescriptor,
};
use crate::script::value::{ScriptObject, MAX_SAFE_INTEGER};
use tracing::warn;

/// Builds records for one bridge; holds only the pointer display format
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder {
    format: PointerFormat,
}

impl RecordBuilder {
    pub fn new(format: PointerFormat) -> Self {
        RecordBuilder { format }
    }

    fn pointer(&self, address: Address) -> Option<NativePointer> {
        NativePointer::with_format(address, self.format)
    }

    /// `{type?, name, module?, address?}`
    pub fn import(&self, import: &ImportDescriptor) -> ScriptObject {
        let mut record = ScriptObject::new();

        match import.kind {
            ImportKind::Function => record.set("type", "function"),
            ImportKind::Variable => record.set("type", "variable"),
            ImportKind::Unknown => {}
        }

        record.set("name", import.name.as_str());

        if let Some(module) = &import.module {
            record.set("module", module.as_str());
        }

        if let Some(address) = self.pointer(import.address) {
            record.set("address", address);
        }

        record
    }

    /// `{type, name, address}`
    pub fn export(&self, export: &ExportDescriptor) -> ScriptObject {
        let kind = match export.kind {
            ExportKind::Function => "function",
            ExportKind::Variable => "variable",
        };

        let mut record = ScriptObject::new().with("type", kind).with("name", export.name.as_str());
        // A provider handing out a null export address would be breaking its
        // contract; the null still must not become a pointer.
        if let Some(address) = self.pointer(export.address) {
            record.set("address", address);
        }
        record
    }

    /// `{base, size, protection}`
    ///
    /// `size` is a script number, so sizes above [`MAX_SAFE_INTEGER`] round.
    pub fn range(&self, range: &RangeDescriptor) -> ScriptObject {
        let mut record = ScriptObject::new();
        if let Some(base) = self.pointer(range.base) {
            record.set("base", base);
        }
        if range.size > MAX_SAFE_INTEGER {
            warn!(size = range.size, "range size is not exactly representable as a script number");
        }
        record.set("size", range.size);
        record.set("protection", range.protection.to_string());
        record
    }
}
