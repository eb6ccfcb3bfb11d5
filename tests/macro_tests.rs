use chrono::{TimeZone, Utc};
use serde_tesql::{raw, section, to_string, Error, Raw, Value};

#[test]
fn test_raw_macro_null() {
    assert_eq!(raw!(None::<String>), Raw::Null);
    assert_eq!(raw!(Some("x")), Raw::String("x".to_string()));
}

#[test]
fn test_raw_macro_scalars() {
    assert_eq!(raw!(true), Raw::Bool(true));
    assert_eq!(raw!(42), Raw::Integer(42));
    assert_eq!(raw!(-123), Raw::Integer(-123));
    assert_eq!(raw!(3.5), Raw::Float(3.5));
    assert_eq!(raw!("hello world"), Raw::String("hello world".to_string()));

    let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(raw!(date), Raw::Date(date));
}

#[test]
fn test_raw_macro_arrays() {
    assert_eq!(raw!([]), Raw::List(vec![]));
    assert_eq!(
        raw!([1, "two", true]),
        Raw::List(vec![Raw::Integer(1), Raw::from("two"), Raw::Bool(true)])
    );
}

#[test]
fn test_raw_macro_nested_objects() {
    let value = raw!({
        "user": { "id": 123, "name": "Bob" },
        "tags": ["admin", "developer"],
        "count": 42,
    });

    let Raw::Map(map) = value else {
        panic!("expected a map");
    };
    assert_eq!(map.keys().collect::<Vec<_>>(), ["user", "tags", "count"]);
    assert_eq!(map["count"], Raw::Integer(42));

    let Raw::Map(user) = &map["user"] else {
        panic!("expected user to be a map");
    };
    assert_eq!(user["name"], Raw::from("Bob"));
}

#[test]
fn test_section_macro_classifies_entries() {
    let doc = section!("Post", {
        "title": "Hello",
        "tags": ["a", "b"],
        "views": 10,
        "author": { "name": "Bob" },
    })
    .unwrap();

    assert!(doc["title"].is_text());
    assert!(doc["tags"].is_sequence());
    assert_eq!(doc["views"], "10");
    assert!(doc["author"].is_section());
    assert_eq!(doc.section("author").unwrap().name(), "author");
}

#[test]
fn test_section_macro_writes_flat_entries_first() {
    let doc = section!("Person", {
        "address": { "city": "Springfield" },
        "pk": 1,
        "surname": "Simpson",
    })
    .unwrap();

    assert_eq!(
        to_string(&Value::Section(doc)).unwrap(),
        "\n[Person]\n\npk: 1\nsurname: Simpson\n\n[Person.address]\n\ncity: Springfield\n"
    );
}

#[test]
fn test_section_macro_errors() {
    // Dots are only reserved in section names
    assert!(section!("S", { "a.b": 1 }).is_ok());
    assert_eq!(
        section!("S", { "a.b": {} }).unwrap_err(),
        Error::invalid_key("a.b")
    );
    assert!(matches!(
        section!("S", { "nothing": (None::<u8>) }),
        Err(Error::Type(_))
    ));
}
