//! Name-based dispatch and the script-side `Module` object

use super::bridge::ModuleBridge;
use super::sink::ErrorSink;
use crate::core::types::{BridgeError, BridgeResult, ScriptError};
use crate::provider::IntrospectionProvider;
use crate::script::args::{
    EnumerateRangesArgs, FindBaseAddressArgs, FindExportByNameArgs, FromArguments, Signature,
    ENUMERATE_EXPORTS, ENUMERATE_IMPORTS,
};
use crate::script::value::{ScriptFunction, ScriptObject, ScriptValue};
use std::rc::Rc;

/// Every operation of the facility, with its declared parameters
pub const MODULE_FUNCTIONS: &[Signature] = &[
    ENUMERATE_IMPORTS,
    ENUMERATE_EXPORTS,
    EnumerateRangesArgs::SIGNATURE,
    FindBaseAddressArgs::SIGNATURE,
    FindExportByNameArgs::SIGNATURE,
];

impl<P: IntrospectionProvider, S: ErrorSink> ModuleBridge<P, S> {
    /// Calls the operation script code knows as `name`
    pub fn invoke(&self, name: &str, args: &[ScriptValue]) -> BridgeResult<ScriptValue> {
        match name {
            "enumerateImports" => Ok(self.enumerate_imports(args)?),
            "enumerateExports" => Ok(self.enumerate_exports(args)?),
            "enumerateRanges" => Ok(self.enumerate_ranges(args)?),
            "findBaseAddress" => Ok(self.find_base_address(args)),
            "findExportByName" => Ok(self.find_export_by_name(args)),
            other => Err(BridgeError::UnknownOperation(other.to_string())),
        }
    }
}

impl<P, S> ModuleBridge<P, S>
where
    P: IntrospectionProvider + 'static,
    S: ErrorSink + 'static,
{
    /// Builds the object script code sees as `Module`.
    ///
    /// Each property is a function holding a reference to this bridge, so the
    /// bridge lives as long as script code keeps the object.
    pub fn to_script_object(self: &Rc<Self>) -> ScriptObject {
        let mut object = ScriptObject::new();
        for signature in MODULE_FUNCTIONS {
            let bridge = Rc::clone(self);
            let name = signature.name;
            object.set(
                name,
                ScriptFunction::new(move |args| {
                    bridge.invoke(name, args).map_err(|err| match err {
                        BridgeError::Script(err) => err,
                        other => ScriptError::new(other.to_string()),
                    })
                }),
            );
        }
        object
    }
}
