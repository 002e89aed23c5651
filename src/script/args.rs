//! Argument decoding against fixed per-operation signatures
//!
//! Each script-visible operation declares its parameters statically. The
//! decoder checks raw call arguments against that list and produces typed
//! values that borrow from the arguments, so callback handles cannot escape
//! the call that received them.

use super::value::{ScriptFunction, ScriptValue};
use crate::core::types::{ArgumentError, PageProtection, ScriptError};

/// Names of the two callbacks every enumeration takes
pub const MATCH_CALLBACKS: &[&str] = &["onMatch", "onComplete"];

const ENUMERATE_PARAMS: &[Param] = &[Param::String, Param::Callbacks(MATCH_CALLBACKS)];

pub const ENUMERATE_IMPORTS: Signature = Signature {
    name: "enumerateImports",
    params: ENUMERATE_PARAMS,
};

pub const ENUMERATE_EXPORTS: Signature = Signature {
    name: "enumerateExports",
    params: ENUMERATE_PARAMS,
};

/// Expected shape of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Non-empty string
    String,
    /// String, or `null`/`undefined` for absent
    NullableString,
    /// Protection mask string such as `"rw-"`
    Protection,
    /// Object whose named properties are all functions
    Callbacks(&'static [&'static str]),
}

impl Param {
    fn expected(&self) -> &'static str {
        match self {
            Param::String => "a string",
            Param::NullableString => "a string or null",
            Param::Protection => "a protection string",
            Param::Callbacks(_) => "a callbacks object",
        }
    }
}

/// Declared name and parameter list of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub params: &'static [Param],
}

impl Signature {
    pub const fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A borrowed script callable, valid for one call only
#[derive(Debug, Clone, Copy)]
pub struct CallbackHandle<'a>(&'a ScriptFunction);

impl<'a> CallbackHandle<'a> {
    pub fn new(function: &'a ScriptFunction) -> Self {
        CallbackHandle(function)
    }

    pub fn function(&self) -> &'a ScriptFunction {
        self.0
    }

    pub fn call(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        self.0.call(args)
    }
}

/// The `{onMatch, onComplete}` pair of an enumeration session
#[derive(Debug, Clone, Copy)]
pub struct MatchCallbacks<'a> {
    pub on_match: CallbackHandle<'a>,
    pub on_complete: CallbackHandle<'a>,
}

impl<'a> MatchCallbacks<'a> {
    pub fn new(on_match: &'a ScriptFunction, on_complete: &'a ScriptFunction) -> Self {
        MatchCallbacks {
            on_match: CallbackHandle::new(on_match),
            on_complete: CallbackHandle::new(on_complete),
        }
    }
}

/// One decoded argument
#[derive(Debug, Clone)]
pub enum Decoded<'a> {
    String(&'a str),
    NullableString(Option<&'a str>),
    Protection(PageProtection),
    Callbacks(Vec<CallbackHandle<'a>>),
}

/// Typed argument set of one operation
pub trait FromArguments<'a>: Sized {
    const SIGNATURE: Signature;

    /// Assembles the typed form from values already checked against `SIGNATURE`
    fn from_decoded(values: Vec<Decoded<'a>>) -> Option<Self>;
}

/// Validates raw call arguments against a [`Signature`]
pub struct ArgumentDecoder;

impl ArgumentDecoder {
    /// Decodes `args` into `T`, failing fast on the first bad argument
    pub fn decode<'a, T: FromArguments<'a>>(args: &'a [ScriptValue]) -> Result<T, ArgumentError> {
        Self::decode_with(&T::SIGNATURE, args)
    }

    /// Decodes `args` into `T` under another operation name with the same parameters
    pub fn decode_with<'a, T: FromArguments<'a>>(
        signature: &Signature,
        args: &'a [ScriptValue],
    ) -> Result<T, ArgumentError> {
        debug_assert_eq!(signature.params, T::SIGNATURE.params);
        let values = Self::decode_signature(signature, args)?;
        // Only reachable if a FromArguments impl disagrees with its own signature
        T::from_decoded(values).ok_or(ArgumentError::Missing {
            operation: signature.name,
            index: signature.arity(),
        })
    }

    /// Decodes `args` positionally; trailing extra arguments are ignored
    pub fn decode_signature<'a>(
        signature: &Signature,
        args: &'a [ScriptValue],
    ) -> Result<Vec<Decoded<'a>>, ArgumentError> {
        signature
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| Self::decode_param(signature.name, index, param, args.get(index)))
            .collect()
    }

    fn decode_param<'a>(
        operation: &'static str,
        index: usize,
        param: &Param,
        value: Option<&'a ScriptValue>,
    ) -> Result<Decoded<'a>, ArgumentError> {
        let mismatch = |actual: &ScriptValue| ArgumentError::TypeMismatch {
            operation,
            index,
            expected: param.expected(),
            actual: actual.type_name(),
        };

        if let Param::NullableString = param {
            return match value {
                None | Some(ScriptValue::Undefined) | Some(ScriptValue::Null) => {
                    Ok(Decoded::NullableString(None))
                }
                Some(ScriptValue::String(s)) => Ok(Decoded::NullableString(Some(s.as_str()))),
                Some(other) => Err(mismatch(other)),
            };
        }

        let value = match value {
            None | Some(ScriptValue::Undefined) => {
                return Err(ArgumentError::Missing { operation, index })
            }
            Some(value) => value,
        };

        match param {
            Param::String => match value {
                ScriptValue::String(s) if s.is_empty() => {
                    Err(ArgumentError::Empty { operation, index })
                }
                ScriptValue::String(s) => Ok(Decoded::String(s.as_str())),
                other => Err(mismatch(other)),
            },
            Param::Protection => match value {
                ScriptValue::String(s) => PageProtection::parse_mask(s)
                    .map(Decoded::Protection)
                    .map_err(|_| ArgumentError::InvalidProtection {
                        operation,
                        mask: s.clone(),
                    }),
                other => Err(mismatch(other)),
            },
            Param::Callbacks(names) => match value {
                ScriptValue::Object(object) => names
                    .iter()
                    .map(|&name| match object.get(name) {
                        Some(ScriptValue::Function(f)) => Ok(CallbackHandle::new(f)),
                        None | Some(ScriptValue::Undefined) => {
                            Err(ArgumentError::MissingCallback { operation, name })
                        }
                        Some(_) => Err(ArgumentError::NotCallable { operation, name }),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Decoded::Callbacks),
                other => Err(mismatch(other)),
            },
            Param::NullableString => unreachable!("handled above"),
        }
    }
}

fn match_callbacks<'a>(handles: &[CallbackHandle<'a>]) -> Option<MatchCallbacks<'a>> {
    match handles {
        [on_match, on_complete] => Some(MatchCallbacks {
            on_match: *on_match,
            on_complete: *on_complete,
        }),
        _ => None,
    }
}

/// `enumerateImports(moduleName, callbacks)` and `enumerateExports(moduleName, callbacks)`
#[derive(Debug, Clone)]
pub struct EnumerateArgs<'a> {
    pub module_name: &'a str,
    pub callbacks: MatchCallbacks<'a>,
}

impl<'a> FromArguments<'a> for EnumerateArgs<'a> {
    const SIGNATURE: Signature = ENUMERATE_IMPORTS;

    fn from_decoded(values: Vec<Decoded<'a>>) -> Option<Self> {
        match <[Decoded<'a>; 2]>::try_from(values).ok()? {
            [Decoded::String(module_name), Decoded::Callbacks(handles)] => Some(EnumerateArgs {
                module_name,
                callbacks: match_callbacks(&handles)?,
            }),
            _ => None,
        }
    }
}

/// `enumerateRanges(moduleName, protection, callbacks)`
#[derive(Debug, Clone)]
pub struct EnumerateRangesArgs<'a> {
    pub module_name: &'a str,
    pub protection: PageProtection,
    pub callbacks: MatchCallbacks<'a>,
}

impl<'a> FromArguments<'a> for EnumerateRangesArgs<'a> {
    const SIGNATURE: Signature = Signature {
        name: "enumerateRanges",
        params: &[
            Param::String,
            Param::Protection,
            Param::Callbacks(MATCH_CALLBACKS),
        ],
    };

    fn from_decoded(values: Vec<Decoded<'a>>) -> Option<Self> {
        match <[Decoded<'a>; 3]>::try_from(values).ok()? {
            [Decoded::String(module_name), Decoded::Protection(protection), Decoded::Callbacks(handles)] => {
                Some(EnumerateRangesArgs {
                    module_name,
                    protection,
                    callbacks: match_callbacks(&handles)?,
                })
            }
            _ => None,
        }
    }
}

/// `findBaseAddress(moduleName)`
#[derive(Debug, Clone)]
pub struct FindBaseAddressArgs<'a> {
    pub module_name: &'a str,
}

impl<'a> FromArguments<'a> for FindBaseAddressArgs<'a> {
    const SIGNATURE: Signature = Signature {
        name: "findBaseAddress",
        params: &[Param::String],
    };

    fn from_decoded(values: Vec<Decoded<'a>>) -> Option<Self> {
        match <[Decoded<'a>; 1]>::try_from(values).ok()? {
            [Decoded::String(module_name)] => Some(FindBaseAddressArgs { module_name }),
            _ => None,
        }
    }
}

/// `findExportByName(moduleName | null, symbolName)`
#[derive(Debug, Clone)]
pub struct FindExportByNameArgs<'a> {
    pub module_name: Option<&'a str>,
    pub symbol_name: &'a str,
}

impl<'a> FromArguments<'a> for FindExportByNameArgs<'a> {
    const SIGNATURE: Signature = Signature {
        name: "findExportByName",
        params: &[Param::NullableString, Param::String],
    };

    fn from_decoded(values: Vec<Decoded<'a>>) -> Option<Self> {
        match <[Decoded<'a>; 2]>::try_from(values).ok()? {
            [Decoded::NullableString(module_name), Decoded::String(symbol_name)] => {
                Some(FindExportByNameArgs {
                    module_name,
                    symbol_name,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::value::ScriptObject;

    fn noop() -> ScriptFunction {
        ScriptFunction::new(|_| Ok(ScriptValue::Undefined))
    }

    fn callbacks() -> ScriptValue {
        ScriptObject::new()
            .with("onMatch", noop())
            .with("onComplete", noop())
            .into()
    }

    #[test]
    fn test_decode_enumerate_args() {
        let args = vec![ScriptValue::from("libc.so.6"), callbacks()];
        let decoded: EnumerateArgs = ArgumentDecoder::decode(&args).unwrap();
        assert_eq!(decoded.module_name, "libc.so.6");
    }

    #[test]
    fn test_missing_and_empty_module_name() {
        let args = vec![];
        let err = ArgumentDecoder::decode::<EnumerateArgs>(&args).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::Missing {
                operation: "enumerateImports",
                index: 0
            }
        );

        let args = vec![ScriptValue::from(""), callbacks()];
        let err = ArgumentDecoder::decode::<EnumerateArgs>(&args).unwrap_err();
        assert!(matches!(err, ArgumentError::Empty { index: 0, .. }));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let args = vec![ScriptValue::Number(3.0), callbacks()];
        let err = ArgumentDecoder::decode::<FindBaseAddressArgs>(&args).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::TypeMismatch {
                operation: "findBaseAddress",
                index: 0,
                expected: "a string",
                actual: "number",
            }
        );
    }

    #[test]
    fn test_callbacks_must_be_functions() {
        let missing = ScriptObject::new().with("onMatch", noop());
        let args = vec![ScriptValue::from("a.so"), missing.into()];
        let err = ArgumentDecoder::decode::<EnumerateArgs>(&args).unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::MissingCallback {
                name: "onComplete",
                ..
            }
        ));

        let not_callable = ScriptObject::new()
            .with("onMatch", "nope")
            .with("onComplete", noop());
        let args = vec![ScriptValue::from("a.so"), not_callable.into()];
        let err = ArgumentDecoder::decode::<EnumerateArgs>(&args).unwrap_err();
        assert!(matches!(err, ArgumentError::NotCallable { name: "onMatch", .. }));
    }

    #[test]
    fn test_protection_argument() {
        let args = vec![ScriptValue::from("a.so"), ScriptValue::from("r-x"), callbacks()];
        let decoded: EnumerateRangesArgs = ArgumentDecoder::decode(&args).unwrap();
        assert_eq!(decoded.protection, PageProtection::read_execute());

        let args = vec![ScriptValue::from("a.so"), ScriptValue::from("rwq"), callbacks()];
        let err = ArgumentDecoder::decode::<EnumerateRangesArgs>(&args).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::InvalidProtection {
                operation: "enumerateRanges",
                mask: "rwq".to_string()
            }
        );
    }

    #[test]
    fn test_nullable_module_name() {
        let args = vec![ScriptValue::Null, ScriptValue::from("open")];
        let decoded: FindExportByNameArgs = ArgumentDecoder::decode(&args).unwrap();
        assert_eq!(decoded.module_name, None);
        assert_eq!(decoded.symbol_name, "open");

        let args = vec![ScriptValue::from("libc.so.6"), ScriptValue::from("open")];
        let decoded: FindExportByNameArgs = ArgumentDecoder::decode(&args).unwrap();
        assert_eq!(decoded.module_name, Some("libc.so.6"));

        let args = vec![ScriptValue::Bool(true), ScriptValue::from("open")];
        assert!(ArgumentDecoder::decode::<FindExportByNameArgs>(&args).is_err());
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let args = vec![ScriptValue::from("a.so"), ScriptValue::Number(1.0)];
        let decoded: FindBaseAddressArgs = ArgumentDecoder::decode(&args).unwrap();
        assert_eq!(decoded.module_name, "a.so");
    }

    #[test]
    fn test_decode_with_renames_operation() {
        let args = vec![ScriptValue::from("")];
        let err = ArgumentDecoder::decode_with::<EnumerateArgs>(&ENUMERATE_EXPORTS, &args)
            .unwrap_err();
        assert_eq!(err.operation(), "enumerateExports");
    }

    #[test]
    fn test_signature_arity() {
        assert_eq!(EnumerateArgs::SIGNATURE.arity(), 2);
        assert_eq!(EnumerateRangesArgs::SIGNATURE.arity(), 3);
        assert_eq!(FindBaseAddressArgs::SIGNATURE.arity(), 1);
        assert_eq!(FindExportByNameArgs::SIGNATURE.arity(), 2);
    }
}
