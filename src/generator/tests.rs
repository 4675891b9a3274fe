#![allow(clippy::unwrap_used)]

use std::cell::Cell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;
use crate::diagnostics::CollectReporter;
use crate::value::FunctionError;

fn generator(config: StubConfig) -> StubGenerator<CollectReporter> {
    let _ = pretty_env_logger::try_init();
    StubGenerator::with_reporter(config, CollectReporter::new())
}

fn exports() -> Value {
    Value::object([
        ("version", Value::from(2.0)),
        ("name", Value::from("quote \"me\"\n")),
        ("enabled", Value::Bool(true)),
        ("nothing", Value::Null),
        (
            "since",
            Value::Date(Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()),
        ),
        ("connect", Value::function("connect", || Ok(Value::Null))),
        ("tags", Value::from(json!(["a", "b"]))),
        (
            "nested",
            Value::object([
                ("deeper", Value::object([("run", Value::function("run", || Ok(Value::Null)))])),
                ("empty", Value::Object(Default::default())),
            ]),
        ),
    ])
}

#[test]
fn test_primitive_stubs() {
    let g = generator(StubConfig::default());
    assert_eq!(g.generate(&Value::Null, "x", "pkg").unwrap(), "null");
    assert_eq!(g.generate(&Value::Undefined, "x", "pkg").unwrap(), "undefined");
    assert_eq!(g.generate(&Value::from(42.0), "x", "pkg").unwrap(), "42");
    assert_eq!(g.generate(&Value::from(0.5), "x", "pkg").unwrap(), "0.5");
    assert_eq!(g.generate(&Value::from("hi"), "x", "pkg").unwrap(), "hi");
    assert!(g.reporter().is_empty());
}

#[test]
fn test_object_with_function() {
    let g = generator(StubConfig::default());
    let target = Value::object([
        ("a", Value::from(1.0)),
        ("b", Value::function("b", || Ok(Value::from(2.0)))),
    ]);
    let text = g.generate(&target, "x", "pkg").unwrap();
    assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": function() {}\n}");
}

#[test]
fn test_unsupported_types_are_fatal() {
    let g = generator(StubConfig::default());
    let cases = [
        (Value::Symbol(Some("id".into())), ValueKind::Symbol),
        (Value::Bool(false), ValueKind::Boolean),
        (Value::BigInt("7".into()), ValueKind::Bigint),
    ];
    for (target, expected) in cases {
        let err = g.generate(&target, "x", "pkg").unwrap_err();
        match &err {
            StubError::MissingStubGenerator {
                name,
                package,
                kind,
            } => {
                assert_eq!(name, "x");
                assert_eq!(package, "pkg");
                assert_eq!(*kind, expected);
            }
            other => panic!("wrong error: {other:?}"),
        }
        assert!(err.to_string().contains(&expected.to_string()));
        assert!(err.is_fatal());
    }
}

#[test]
fn test_symbol_error_names_symbol() {
    let err = generate_stub_js_code(&Value::Symbol(None), "x", "pkg").unwrap_err();
    assert!(err.to_string().ends_with("of type symbol"));
}

#[test]
fn test_throwing_function_falls_back() {
    let g = generator(StubConfig::default());
    let target = Value::function("needsArgs", || {
        Err(FunctionError::new("TypeError: options is undefined"))
    });
    let text = g.generate(&target, "needsArgs", "left-pad").unwrap();
    assert_eq!(text, "function() {}");

    let diagnostics = g.reporter().take();
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.kind, DiagnosticKind::FunctionCall);
    assert_eq!(d.export, "needsArgs");
    assert_eq!(d.package, "left-pad");
    assert_eq!(d.message, "TypeError: options is undefined");
    let line = d.to_string();
    assert!(line.contains("needsArgs") && line.contains("left-pad"));
}

#[test]
fn test_factory_function_is_called_once() {
    let g = generator(StubConfig::default());
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let target = Value::function("createClient", move || {
        counter.set(counter.get() + 1);
        Ok(Value::object([
            ("get", Value::function("get", || Ok(Value::Null))),
            ("retries", Value::from(3.0)),
        ]))
    });

    let text = g.generate(&target, "createClient", "http").unwrap();
    assert_eq!(
        text,
        "function() { return {\n  \"get\": function() {},\n  \"retries\": 3\n}; }"
    );
    assert_eq!(calls.get(), 1);
    assert!(g.reporter().is_empty());
}

#[test]
fn test_function_returning_primitive_stubs_empty_object() {
    let g = generator(StubConfig::default());
    let target = Value::function("version", || Ok(Value::from("1.0.0")));
    let text = g.generate(&target, "version", "pkg").unwrap();
    assert_eq!(text, "function() { return {}; }");

    let diagnostics = g.reporter().take();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ObjectCopy);
    assert_eq!(diagnostics[0].export, "version");
}

#[test]
fn test_strategies_agree() {
    let direct = generator(StubConfig::default());
    let two_phase =
        generator(StubConfig::default().with_object_strategy(ObjectStrategy::CopyRewrite));
    let target = exports();

    let a = direct.generate(&target, "root", "pkg").unwrap();
    let b = two_phase.generate(&target, "root", "pkg").unwrap();
    assert_eq!(a, b);
    assert!(a.contains("\"since\": \"2021-06-01T00:00:00.000Z\""));
    assert!(a.contains("\"tags\": {\n    \"0\": \"a\",\n    \"1\": \"b\"\n  }"));
    assert!(a.contains("\"run\": function() {}"));
    assert!(!a.contains("enabled"));
}

#[test]
fn test_placeholder_collision() {
    let config = StubConfig::default().with_placeholder("FN");
    let target = Value::object([
        ("label", Value::from("FN")),
        ("f", Value::function("f", || Ok(Value::Null))),
    ]);

    let direct = generator(config.clone()).generate(&target, "x", "pkg").unwrap();
    assert_eq!(direct, "{\n  \"label\": \"FN\",\n  \"f\": function() {}\n}");

    // the two phase path can't tell the string from a function marker
    let two_phase = generator(config.with_object_strategy(ObjectStrategy::CopyRewrite))
        .generate(&target, "x", "pkg")
        .unwrap();
    assert_eq!(
        two_phase,
        "{\n  \"label\": function() {},\n  \"f\": function() {}\n}"
    );
}

#[test]
fn test_custom_function_code() {
    let g = generator(StubConfig::default().with_function_code("() => {}"));
    let target = Value::object([("f", Value::function("f", || Ok(Value::Null)))]);
    assert_eq!(
        g.generate(&target, "x", "pkg").unwrap(),
        "{\n  \"f\": () => {}\n}"
    );

    let failing = Value::function("f", || Err(FunctionError::new("nope")));
    assert_eq!(g.generate(&failing, "f", "pkg").unwrap(), "() => {}");
}

#[test]
fn test_root_date_and_array() {
    let g = generator(StubConfig::default());
    let at = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
    assert_eq!(
        g.generate(&Value::Date(at), "epoch", "pkg").unwrap(),
        "new Date(\"1999-12-31T23:59:59.000Z\")"
    );
    assert_eq!(
        g.generate(&Value::from(json!([1, 2])), "list", "pkg").unwrap(),
        "{\n  \"0\": 1,\n  \"1\": 2\n}"
    );
}

#[test]
fn test_classify() {
    let f = Value::function("f", || Ok(Value::Null));
    assert!(matches!(StubKind::classify(&f), StubKind::Function(_)));
    assert_eq!(StubKind::classify(&Value::Null), StubKind::Null);
    assert_eq!(StubKind::classify(&Value::from(1.0)), StubKind::Number(1.0));
    assert_eq!(
        StubKind::classify(&Value::Bool(true)),
        StubKind::Unsupported(ValueKind::Boolean)
    );
}
