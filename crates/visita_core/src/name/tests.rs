use super::*;
use crate::{DispatchError, ErrorCode};
use pretty_assertions::assert_eq;

// === capitalize_first ===

#[test]
fn capitalize_first_only_touches_first_char() {
    assert_eq!(capitalize_first("add"), "Add");
    assert_eq!(capitalize_first("aBC"), "ABC");
    assert_eq!(capitalize_first("subtractAll"), "SubtractAll");
    assert_eq!(capitalize_first("Already"), "Already");
    assert_eq!(capitalize_first("_private"), "_private");
    assert_eq!(capitalize_first("9lives"), "9lives");
    assert_eq!(capitalize_first(""), "");
}

#[test]
fn capitalize_first_handles_non_ascii() {
    assert_eq!(capitalize_first("éclair"), "Éclair");
}

// === simple_type_name ===

#[test]
fn simple_type_name_takes_last_dot_segment() {
    assert_eq!(simple_type_name("MyApp.Foo"), Some("Foo"));
    assert_eq!(simple_type_name("MyApp.Things.Bar"), Some("Bar"));
}

#[test]
fn simple_type_name_takes_last_path_segment() {
    assert_eq!(simple_type_name("my_app::shapes::Circle"), Some("Circle"));
    assert_eq!(simple_type_name("ns::Outer.Inner"), Some("Inner"));
}

#[test]
fn simple_type_name_accepts_unqualified() {
    assert_eq!(simple_type_name("Foo"), Some("Foo"));
}

#[test]
fn simple_type_name_rejects_empty_or_malformed() {
    assert_eq!(simple_type_name(""), None);
    assert_eq!(simple_type_name("MyApp."), None);
    assert_eq!(simple_type_name("shapes::"), None);
    assert_eq!(simple_type_name("Vec<u8>"), None);
    assert_eq!(simple_type_name("MyApp.Foo Bar"), None);
}

// === Discriminant ===

#[test]
fn discriminant_from_string_property() {
    let value = Value::from("add");
    let d = Discriminant::from_property("value", Some(&value)).unwrap();
    assert_eq!(d.as_str(), "Add");
}

#[test]
fn discriminant_from_empty_property_fails() {
    let value = Value::from("");
    let err = Discriminant::from_property("value", Some(&value)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
}

#[test]
fn discriminant_from_missing_property_fails() {
    let err = Discriminant::from_property("value", None).unwrap_err();
    assert_eq!(
        err,
        DispatchError::DiscriminantResolution {
            reason: "property `value` has no value".to_owned()
        }
    );
    let nil = Value::Nil;
    assert!(Discriminant::from_property("value", Some(&nil)).is_err());
}

#[test]
fn discriminant_from_non_string_property_fails() {
    let value = Value::from(7);
    let err = Discriminant::from_property("value", Some(&value)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to resolve discriminant: property `value` holds a number, expected a string"
    );
}

#[test]
fn discriminant_must_start_with_word_char() {
    assert!(Discriminant::new("-add").is_err());
    assert!(Discriminant::new(" add").is_err());
    assert!(Discriminant::new("_add").is_ok());
}

#[test]
fn word_chars_are_ascii_only() {
    let err = Discriminant::new("édit").unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
    assert!(Discriminant::new("ünter").is_err());
    // Only the first character is checked; the tail stays verbatim.
    assert_eq!(Discriminant::new("café").unwrap().as_str(), "Café");
}

#[test]
fn simple_type_name_rejects_non_ascii_segment() {
    assert_eq!(simple_type_name("MyApp.Éclair"), None);
    assert_eq!(simple_type_name("shapes::Círculo"), None);
    assert!(Discriminant::from_type_identifier(Some("MyApp.Éclair")).is_err());
}

#[test]
fn discriminant_rejects_multiline_values() {
    assert!(Discriminant::new("add\nsubtract").is_err());
    assert!(Discriminant::new("add\r").is_err());
}

#[test]
fn discriminant_keeps_tail_verbatim() {
    assert_eq!(Discriminant::new("a-b c").unwrap().as_str(), "A-b c");
}

#[test]
fn discriminant_from_type_identifier() {
    let d = Discriminant::from_type_identifier(Some("MyApp.Foo")).unwrap();
    assert_eq!(d.to_string(), "Foo");
}

#[test]
fn discriminant_from_type_identifier_does_not_capitalize() {
    let d = Discriminant::from_type_identifier(Some("app.lowercase")).unwrap();
    assert_eq!(d.as_str(), "lowercase");
}

#[test]
fn discriminant_without_type_identifier_fails() {
    let err = Discriminant::from_type_identifier(None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0003);
    assert!(Discriminant::from_type_identifier(Some("MyApp.")).is_err());
}

// === HandlerName ===

#[test]
fn handler_name_concatenates() {
    let d = Discriminant::new("add").unwrap();
    let name = HandlerName::compose("acceptOperator", &d).unwrap();
    assert_eq!(name.as_str(), "acceptOperatorAdd");
}

#[test]
fn handler_name_rejects_empty_prefix() {
    let d = Discriminant::new("add").unwrap();
    let err = HandlerName::compose("", &d).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V0004);
}

#[test]
fn fallback_name_uses_prefix() {
    assert_eq!(
        HandlerName::fallback("__accept").unwrap().to_string(),
        "__acceptUnknownVisited"
    );
    assert!(HandlerName::fallback("").is_err());
}
