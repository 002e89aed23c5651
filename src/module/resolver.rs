//! Address resolution: single-shot lookups without callbacks

use super::bridge::ModuleBridge;
use super::sink::ErrorSink;
use crate::core::types::{Address, NativePointer};
use crate::provider::IntrospectionProvider;
use crate::script::args::{ArgumentDecoder, FindBaseAddressArgs, FindExportByNameArgs};
use crate::script::value::ScriptValue;
use tracing::trace;

impl<P: IntrospectionProvider, S: ErrorSink> ModuleBridge<P, S> {
    /// `findBaseAddress(moduleName)`: a pointer, or `null` when not loaded
    pub fn find_base_address(&self, args: &[ScriptValue]) -> ScriptValue {
        match ArgumentDecoder::decode::<FindBaseAddressArgs>(args) {
            Ok(args) => self.resolve_base_address(args.module_name).into(),
            Err(err) => self.argument_error(err),
        }
    }

    /// `findExportByName(moduleName | null, symbolName)`: a pointer, or `null`
    pub fn find_export_by_name(&self, args: &[ScriptValue]) -> ScriptValue {
        match ArgumentDecoder::decode::<FindExportByNameArgs>(args) {
            Ok(args) => self.resolve_export(args.module_name, args.symbol_name).into(),
            Err(err) => self.argument_error(err),
        }
    }

    /// Base address of a loaded module
    pub fn resolve_base_address(&self, module_name: &str) -> Option<NativePointer> {
        let address = self.provider().find_base_address(module_name);
        trace!(module = module_name, %address, "resolved base address");
        self.wrap(address)
    }

    /// Address of an exported symbol; `None` module searches every module
    pub fn resolve_export(&self, module_name: Option<&str>, symbol_name: &str) -> Option<NativePointer> {
        let address = self.provider().find_export_by_name(module_name, symbol_name);
        trace!(module = ?module_name, symbol = symbol_name, %address, "resolved export");
        self.wrap(address)
    }

    fn wrap(&self, address: Address) -> Option<NativePointer> {
        NativePointer::with_format(address, self.options().pointer_format)
    }
}
