//! End-to-end visits over dynamic objects.
//!
//! The visitor records what it saw on itself (`visited`,
//! `acceptMethodInvoked`, `context`), so every test checks which handler
//! ran, on which entity, with which context.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use visita_core::{Context, ErrorCode, Object, ObjectRef, Value};
use visita_dispatch::{resolve_and_invoke, Dispatcher, ReportMode};

const HANDLERS: &[&str] = &[
    "acceptFoo",
    "acceptBar",
    "acceptUnknownVisited",
    "acceptThingFoo",
    "acceptThingBar",
    "acceptThingUnknownVisited",
    "__acceptAbc",
    "__acceptStuffAbc",
    "__acceptUnknownVisited",
    "__acceptStuffUnknownVisited",
    "acceptAdd",
    "acceptSubtract",
    "acceptOperatorAdd",
    "acceptOperatorSubtract",
    "acceptOperatorUnknownVisited",
];

fn visitor() -> ObjectRef {
    HANDLERS
        .iter()
        .fold(Object::builder().class_name("MyApp.Visitor"), |builder, &name| {
            builder.method(name, move |this, visited, context| {
                this.set("visited", visited.clone());
                this.set("acceptMethodInvoked", name);
                this.set("context", context.cloned().map_or(Value::Nil, Value::Map));
                Ok(Value::Nil)
            })
        })
        .build()
}

fn thing(class_name: &str) -> ObjectRef {
    Object::builder().class_name(class_name).build()
}

fn stuff(class_name: &str) -> ObjectRef {
    Object::builder()
        .class_name(class_name)
        .accept_prefix("__accept")
        .build()
}

fn operator(value: &str) -> ObjectRef {
    Object::builder()
        .class_name("MyApp.Operator")
        .visit_key("value")
        .property("value", value)
        .build()
}

fn context() -> Context {
    Context::new().with("value", 100)
}

/// Assert the visitor's record of the last visit.
#[track_caller]
fn assert_visit(visitor: &ObjectRef, visited: &ObjectRef, handler: &str, ctx: Option<Context>) {
    assert_eq!(visitor.get("visited"), Some(Value::Object(visited.clone())));
    assert_eq!(visitor.get("acceptMethodInvoked"), Some(Value::from(handler)));
    assert_eq!(
        visitor.get("context"),
        Some(ctx.map_or(Value::Nil, Value::Map))
    );
}

// === By type ===

#[test]
fn visit_by_type() {
    for (class, handler) in [
        ("MyApp.Foo", "acceptFoo"),
        ("MyApp.Bar", "acceptBar"),
        ("MyApp.Mah", "acceptUnknownVisited"),
    ] {
        let (entity, v) = (thing(class), visitor());
        resolve_and_invoke(&entity, &v, ()).unwrap().unwrap().unwrap();
        assert_visit(&v, &entity, handler, None);
    }
}

#[test]
fn visit_by_type_with_prefix() {
    for (class, handler) in [
        ("MyApp.Foo", "acceptThingFoo"),
        ("MyApp.Bar", "acceptThingBar"),
        ("MyApp.Mah", "acceptThingUnknownVisited"),
    ] {
        let (entity, v) = (thing(class), visitor());
        resolve_and_invoke(&entity, &v, "acceptThing").unwrap().unwrap().unwrap();
        assert_visit(&v, &entity, handler, None);
    }
}

#[test]
fn visit_by_type_with_context() {
    for (class, handler) in [
        ("MyApp.Foo", "acceptFoo"),
        ("MyApp.Bar", "acceptBar"),
        ("MyApp.Mah", "acceptUnknownVisited"),
    ] {
        let (entity, v) = (thing(class), visitor());
        resolve_and_invoke(&entity, &v, context()).unwrap().unwrap().unwrap();
        assert_visit(&v, &entity, handler, Some(context()));
    }
}

#[test]
fn visit_by_type_with_prefix_and_context() {
    for (class, handler) in [
        ("MyApp.Foo", "acceptThingFoo"),
        ("MyApp.Bar", "acceptThingBar"),
        ("MyApp.Mah", "acceptThingUnknownVisited"),
    ] {
        let (entity, v) = (thing(class), visitor());
        resolve_and_invoke(&entity, &v, ("acceptThing", context()))
            .unwrap()
            .unwrap()
            .unwrap();
        assert_visit(&v, &entity, handler, Some(context()));
    }
}

// === By property ===

#[test]
fn visit_by_property() {
    for (value, handler) in [
        ("add", "acceptAdd"),
        ("subtract", "acceptSubtract"),
        ("multiply", "acceptUnknownVisited"),
    ] {
        let (entity, v) = (operator(value), visitor());
        resolve_and_invoke(&entity, &v, ()).unwrap().unwrap().unwrap();
        assert_visit(&v, &entity, handler, None);
    }
}

#[test]
fn visit_by_property_with_prefix() {
    for (value, handler) in [
        ("add", "acceptOperatorAdd"),
        ("subtract", "acceptOperatorSubtract"),
        ("multiply", "acceptOperatorUnknownVisited"),
    ] {
        let (entity, v) = (operator(value), visitor());
        resolve_and_invoke(&entity, &v, "acceptOperator").unwrap().unwrap().unwrap();
        assert_visit(&v, &entity, handler, None);
    }
}

#[test]
fn visit_by_property_with_prefix_and_context() {
    for (value, handler) in [
        ("add", "acceptOperatorAdd"),
        ("subtract", "acceptOperatorSubtract"),
        ("multiply", "acceptOperatorUnknownVisited"),
    ] {
        let (entity, v) = (operator(value), visitor());
        resolve_and_invoke(&entity, &v, ("acceptOperator", context()))
            .unwrap()
            .unwrap()
            .unwrap();
        assert_visit(&v, &entity, handler, Some(context()));
    }
}

// === Entity-level prefix ===

#[test]
fn visit_with_entity_prefix() {
    for (class, prefix, handler) in [
        ("MyApp.Abc", None, "__acceptAbc"),
        ("MyApp.Abc", Some("__acceptStuff"), "__acceptStuffAbc"),
        ("MyApp.Xyz", None, "__acceptUnknownVisited"),
        ("MyApp.Xyz", Some("__acceptStuff"), "__acceptStuffUnknownVisited"),
    ] {
        let (entity, v) = (stuff(class), visitor());
        let mut values = Vec::new();
        if let Some(prefix) = prefix {
            values.push(Value::from(prefix));
        }
        values.push(Value::Map(context()));
        Dispatcher::new()
            .visit_with_values(&entity, &v, &values)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_visit(&v, &entity, handler, Some(context()));
    }
}

// === Silent and failing visits ===

#[test]
fn no_handler_is_silent() {
    let v = Object::builder().method("acceptFoo", |_, _, _| Ok(Value::Nil)).build();
    assert_eq!(resolve_and_invoke(&thing("MyApp.Mah"), &v, ()), Ok(None));
}

#[test]
fn empty_discriminant_fails_before_any_handler() {
    let (entity, v) = (operator(""), visitor());
    let err = resolve_and_invoke(&entity, &v, ()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
    assert_eq!(v.get("acceptMethodInvoked"), None);
}

#[test]
fn non_ascii_discriminant_invokes_nothing() {
    let v = Object::builder()
        .method("acceptÉdit", |_, _, _| Ok(Value::Nil))
        .build();
    let err = resolve_and_invoke(&operator("édit"), &v, ()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
}

#[test]
fn non_string_discriminant_fails() {
    let entity = Object::builder()
        .class_name("MyApp.Operator")
        .visit_key("value")
        .property("value", 3)
        .build();
    let err = resolve_and_invoke(&entity, &visitor(), ()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
}

#[test]
fn invalid_trailing_value_fails() {
    let (entity, v) = (thing("MyApp.Foo"), visitor());
    let err = Dispatcher::new()
        .visit_with_values(&entity, &v, &[Value::from(42)])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0002);
    assert_eq!(v.get("acceptMethodInvoked"), None);
}

#[test]
fn nil_visitor_fails() {
    let err = resolve_and_invoke(&thing("MyApp.Foo"), &Value::Nil, ()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0001);
}

#[test]
fn lenient_dispatcher_logs_instead() {
    visita_dispatch::init_tracing();
    let dispatcher = Dispatcher::builder().mode(ReportMode::Lenient).build();
    let result = dispatcher.visit(&thing("MyApp.Foo"), &Value::Nil, ());
    assert_eq!(result, Ok(None));
}

// === Handler results ===

#[test]
fn handler_errors_are_returned_untouched() {
    let v = Object::builder()
        .method("acceptFoo", |_, _, _| {
            Err(visita_core::MethodError::new("boom"))
        })
        .build();
    let result = resolve_and_invoke(&thing("MyApp.Foo"), &v, ()).unwrap();
    assert_eq!(result.unwrap().unwrap_err().message(), "boom");
}

#[test]
fn handler_reads_its_context() {
    let v = Object::builder()
        .method("acceptOperatorSubtract", |_, visited, ctx| {
            let x = ctx.and_then(|c| c.get("x")).cloned().unwrap_or_default();
            Ok(Value::List(vec![visited.get("value").unwrap_or_default(), x]))
        })
        .build();
    let ctx = Context::new().with("x", 1);
    let result = resolve_and_invoke(&operator("subtract"), &v, ("acceptOperator", ctx));
    assert_eq!(
        result,
        Ok(Some(Ok(Value::List(vec![Value::from("subtract"), Value::from(1)]))))
    );
}
