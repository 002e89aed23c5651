//! Module introspection providers
//!
//! A provider walks a module's imports, exports or mapped ranges and hands
//! each item to a visitor until the walk is exhausted or the visitor answers
//! [`ControlFlow::Break`]. Providers must check that answer between items.

mod snapshot;

pub use snapshot::{ModuleSnapshot, ProcessSnapshot, SnapshotProvider};

use crate::core::types::{Address, ExportDescriptor, ImportDescriptor, PageProtection, RangeDescriptor};
use std::ops::ControlFlow;

/// Visitor answer: keep going or stop the walk
pub type Visit = ControlFlow<()>;

/// Blocking, callback-driven module introspection
pub trait IntrospectionProvider {
    /// Visits the imports of `module_name` in discovery order
    fn enumerate_imports(&self, module_name: &str, visitor: &mut dyn FnMut(&ImportDescriptor) -> Visit);

    /// Visits the exports of `module_name` in discovery order
    fn enumerate_exports(&self, module_name: &str, visitor: &mut dyn FnMut(&ExportDescriptor) -> Visit);

    /// Visits the ranges of `module_name` granting at least `protection`
    fn enumerate_ranges(
        &self,
        module_name: &str,
        protection: PageProtection,
        visitor: &mut dyn FnMut(&RangeDescriptor) -> Visit,
    );

    /// Base address of a loaded module, or null if none is loaded under `name`
    fn find_base_address(&self, module_name: &str) -> Address;

    /// Address of an exported symbol, or null. `None` searches every module.
    fn find_export_by_name(&self, module_name: Option<&str>, symbol_name: &str) -> Address;
}

impl<P: IntrospectionProvider + ?Sized> IntrospectionProvider for &P {
    fn enumerate_imports(&self, module_name: &str, visitor: &mut dyn FnMut(&ImportDescriptor) -> Visit) {
        (**self).enumerate_imports(module_name, visitor)
    }

    fn enumerate_exports(&self, module_name: &str, visitor: &mut dyn FnMut(&ExportDescriptor) -> Visit) {
        (**self).enumerate_exports(module_name, visitor)
    }

    fn enumerate_ranges(
        &self,
        module_name: &str,
        protection: PageProtection,
        visitor: &mut dyn FnMut(&RangeDescriptor) -> Visit,
    ) {
        (**self).enumerate_ranges(module_name, protection, visitor)
    }

    fn find_base_address(&self, module_name: &str) -> Address {
        (**self).find_base_address(module_name)
    }

    fn find_export_by_name(&self, module_name: Option<&str>, symbol_name: &str) -> Address {
        (**self).find_export_by_name(module_name, symbol_name)
    }
}
