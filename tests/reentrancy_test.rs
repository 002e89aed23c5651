//! Sessions started from inside a callback of another session

use module_bridge::{
    Address, ExportDescriptor, ImportDescriptor, ModuleBridge, ModuleSnapshot, ProcessSnapshot,
    RecordingErrorSink, ScriptError, ScriptFunction, ScriptObject, ScriptValue, SnapshotProvider,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

type Trace = Rc<RefCell<Vec<String>>>;

fn snapshot() -> ProcessSnapshot {
    ProcessSnapshot::new()
        .with_module(
            ModuleSnapshot::new("app", Address::new(0x10000), 0x1000)
                .with_import(ImportDescriptor::new("open").with_module("libc.so"))
                .with_import(ImportDescriptor::new("close").with_module("libc.so")),
        )
        .with_module(
            ModuleSnapshot::new("libc.so", Address::new(0x20000), 0x1000)
                .with_export(ExportDescriptor::function("open", Address::new(0x20100)))
                .with_export(ExportDescriptor::function("close", Address::new(0x20200))),
        )
}

fn name_of(args: &[ScriptValue]) -> String {
    args.first()
        .and_then(ScriptValue::as_object)
        .and_then(|record| record.get("name"))
        .map(ScriptValue::to_display_string)
        .unwrap_or_default()
}

/// Callbacks appending `prefix:name` per match and `prefix:done` at the end
fn tracing_callbacks(trace: &Trace, prefix: &'static str) -> ScriptObject {
    let on_match = Rc::clone(trace);
    let on_complete = Rc::clone(trace);
    ScriptObject::new()
        .with(
            "onMatch",
            ScriptFunction::new(move |args| {
                on_match.borrow_mut().push(format!("{prefix}:{}", name_of(args)));
                Ok(ScriptValue::Undefined)
            }),
        )
        .with(
            "onComplete",
            ScriptFunction::new(move |_| {
                on_complete.borrow_mut().push(format!("{prefix}:done"));
                Ok(ScriptValue::Undefined)
            }),
        )
}

#[test]
fn test_nested_session_through_module_object() {
    let bridge = Rc::new(ModuleBridge::new(
        SnapshotProvider::new(snapshot()),
        RecordingErrorSink::new(),
    ));
    let module = bridge.to_script_object();
    let trace: Trace = Rc::default();

    let enumerate_exports = module
        .get("enumerateExports")
        .and_then(ScriptValue::as_function)
        .cloned()
        .unwrap();

    let outer_trace = Rc::clone(&trace);
    let inner_trace = Rc::clone(&trace);
    let outer = ScriptObject::new()
        .with(
            "onMatch",
            ScriptFunction::new(move |args| {
                outer_trace
                    .borrow_mut()
                    .push(format!("outer:{}", name_of(args)));
                enumerate_exports.call(&[
                    ScriptValue::from("libc.so"),
                    tracing_callbacks(&inner_trace, "inner").into(),
                ])?;
                Ok(ScriptValue::Undefined)
            }),
        )
        .with(
            "onComplete",
            ScriptFunction::new({
                let trace = Rc::clone(&trace);
                move |_| {
                    trace.borrow_mut().push("outer:done".to_string());
                    Ok(ScriptValue::Undefined)
                }
            }),
        );

    let result = bridge
        .invoke("enumerateImports", &[ScriptValue::from("app"), outer.into()])
        .unwrap();

    assert_eq!(result, ScriptValue::Undefined);
    assert_eq!(
        *trace.borrow(),
        vec![
            "outer:open",
            "inner:open",
            "inner:close",
            "inner:done",
            "outer:close",
            "inner:open",
            "inner:close",
            "inner:done",
            "outer:done",
        ]
    );
    assert!(bridge.error_sink().is_empty());
}

#[test]
fn test_inner_stop_does_not_stop_outer_session() {
    let bridge = Rc::new(ModuleBridge::new(
        SnapshotProvider::new(snapshot()),
        RecordingErrorSink::new(),
    ));
    let trace: Trace = Rc::default();

    let nested_bridge = Rc::clone(&bridge);
    let nested_trace = Rc::clone(&trace);
    let outer = tracing_callbacks(&trace, "outer").with(
        "onMatch",
        ScriptFunction::new(move |args| {
            nested_trace
                .borrow_mut()
                .push(format!("outer:{}", name_of(args)));

            let inner_trace = Rc::clone(&nested_trace);
            let inner = tracing_callbacks(&nested_trace, "inner").with(
                "onMatch",
                ScriptFunction::new(move |args| {
                    inner_trace
                        .borrow_mut()
                        .push(format!("inner:{}", name_of(args)));
                    Ok(ScriptValue::from("stop"))
                }),
            );
            nested_bridge.enumerate_exports(&[ScriptValue::from("libc.so"), inner.into()])?;
            Ok(ScriptValue::Undefined)
        }),
    );

    bridge
        .enumerate_imports(&[ScriptValue::from("app"), outer.into()])
        .unwrap();

    assert_eq!(
        *trace.borrow(),
        vec![
            "outer:open",
            "inner:open",
            "inner:done",
            "outer:close",
            "inner:open",
            "inner:done",
            "outer:done",
        ]
    );
}

#[test]
fn test_inner_error_is_reported_by_inner_session_only() {
    let bridge = Rc::new(ModuleBridge::new(
        SnapshotProvider::new(snapshot()),
        RecordingErrorSink::new(),
    ));
    let trace: Trace = Rc::default();

    let nested_bridge = Rc::clone(&bridge);
    let outer = tracing_callbacks(&trace, "outer").with(
        "onMatch",
        ScriptFunction::new(move |_| {
            let inner = ScriptObject::new()
                .with(
                    "onMatch",
                    ScriptFunction::new(|_| Err(ScriptError::new("inner failure"))),
                )
                .with(
                    "onComplete",
                    ScriptFunction::new(|_| Ok(ScriptValue::Undefined)),
                );
            nested_bridge.enumerate_exports(&[ScriptValue::from("libc.so"), inner.into()])?;
            Ok(ScriptValue::Undefined)
        }),
    );

    bridge
        .enumerate_imports(&[ScriptValue::from("app"), outer.into()])
        .unwrap();

    // one report per inner session; the outer session saw no error
    assert_eq!(
        bridge.error_sink().errors(),
        vec![
            ScriptError::new("inner failure"),
            ScriptError::new("inner failure")
        ]
    );
    assert_eq!(*trace.borrow(), vec!["outer:done"]);
}
