//! Wire-format conformance: exact text produced for sections, text and
//! sequences, and the values read back from it.

use serde_tesql::codec::{decode, encode};
use serde_tesql::{
    documents_from_str, from_str, section, to_string, to_string_with_options, Codec, Error,
    FormatOptions, LineReader, Raw, Section, Separator, Sequence, Text, Value,
};

fn write(value: &Value) -> String {
    to_string(value).unwrap()
}

fn read_one(text: &str) -> Value {
    let mut reader = LineReader::new(text.as_bytes());
    decode(&mut reader, false).unwrap().unwrap()
}

fn strings(name: &str) -> Section {
    Section::with_entries(
        name,
        [("Key1", "Value1"), ("Key2", "Value2"), ("Key3", "Value3")],
    )
    .unwrap()
}

#[test]
fn test_empty_root_section() {
    let root = Value::Section(Section::new(""));
    assert_eq!(write(&root), "\n");

    let mut reader = LineReader::new("\n".as_bytes());
    assert_eq!(decode(&mut reader, true).unwrap(), Some(root.clone()));
    assert_eq!(from_str("\n").unwrap(), root);
}

#[test]
fn test_empty_named_section() {
    let section = Value::Section(Section::new("Section"));
    assert_eq!(write(&section), "\n[Section]\n\n");
    assert_eq!(read_one("\n[Section]\n\n"), section);
}

#[test]
fn test_named_section_with_strings() {
    let section = Value::Section(strings("Section"));
    let text = write(&section);
    assert_eq!(text, "\n[Section]\n\nKey1: Value1\nKey2: Value2\nKey3: Value3\n");

    let back = read_one(&text);
    assert_eq!(back, section);
    assert_eq!(
        back.as_section().unwrap().keys().collect::<Vec<_>>(),
        ["Key1", "Key2", "Key3"]
    );
}

#[test]
fn test_unnamed_section_with_strings() {
    let section = Value::Section(strings(""));
    let text = write(&section);
    assert_eq!(text, "\nKey1: Value1\nKey2: Value2\nKey3: Value3\n");
    assert_eq!(from_str(&text).unwrap(), section);
}

#[test]
fn test_nested_section() {
    let mut section = Section::new("Section");
    section.append("Key1", "Value1", true).unwrap();
    section.append("Key2", "Value2", true).unwrap();
    section.append("SubSection", Raw::map(), true).unwrap();
    assert_eq!(
        write(&Value::Section(section.clone())),
        "\n[Section]\n\nKey1: Value1\nKey2: Value2\n\n[Section.SubSection]\n\n"
    );

    section
        .section_mut("SubSection")
        .unwrap()
        .append("SubKey1", "SubValue1", true)
        .unwrap();
    let text = write(&Value::Section(section.clone()));
    assert_eq!(
        text,
        "\n[Section]\n\nKey1: Value1\nKey2: Value2\n\n[Section.SubSection]\n\nSubKey1: SubValue1\n"
    );

    let back = read_one(&text);
    assert_eq!(back, Value::Section(section));
    assert_eq!(back.as_section().unwrap().section("SubSection").unwrap().name(), "SubSection");
}

#[test]
fn test_deep_nesting() {
    let doc = section!("A", {
        "k": "a",
        "B": { "k": "b", "C": { "k": "c", "D": {} } },
        "E": { "k": "e" },
    })
    .unwrap();
    let text = write(&Value::Section(doc.clone()));
    assert_eq!(
        text,
        "\n[A]\n\nk: a\n\n[A.B]\n\nk: b\n\n[A.B.C]\n\nk: c\n\n[A.B.C.D]\n\n\n[A.E]\n\nk: e\n"
    );
    assert_eq!(read_one(&text), Value::Section(doc));
}

#[test]
fn test_text_values() {
    let cases = [
        ("Key0", "", "Key0: \n"),
        ("Key1", "Simple Text", "Key1: Simple Text\n"),
        ("Key2", "MultiLine text\nSecondLine", "Key2: MultiLine text\n SecondLine\n"),
        ("Key3", "MultiLine\n\nw/ empty line", "Key3: MultiLine\n .\n w/ empty line\n"),
    ];

    for (name, payload, expected) in cases {
        let value = Value::Text(Text::new(name, payload));
        assert_eq!(write(&value), expected);

        let back = read_one(expected);
        assert_eq!(back.name(), name);
        assert_eq!(back, value);
    }
}

#[test]
fn test_text_edge_lines() {
    let value = Value::Text(Text::new("k", "\nleading and trailing\n"));
    let text = write(&value);
    // The empty first line is the header value itself, not a continuation
    assert_eq!(text, "k: \n leading and trailing\n .\n");
    assert_eq!(read_one(&text), value);

    // A payload line that is exactly "." reads back empty
    let dot = Value::Text(Text::new("k", "a\n.\nb"));
    assert_eq!(read_one(&write(&dot)), "a\n\nb");
}

#[test]
fn test_indented_continuation_keeps_extra_spaces() {
    let value = Value::Text(Text::new("code", "fn main() {\n    body();\n}"));
    let text = write(&value);
    assert_eq!(text, "code: fn main() {\n     body();\n }\n");
    assert_eq!(read_one(&text), value);
}

#[test]
fn test_sequences() {
    let value = Value::Sequence(Sequence::new("tags", ["red", "green", "blue"]));
    assert_eq!(write(&value), "tags[]: red, green, blue\n");
    assert_eq!(read_one("tags[]: red, green, blue\n"), value);

    let empty = Value::Sequence(Sequence::new("none", Vec::<String>::new()));
    assert_eq!(write(&empty), "none[]: \n");
    assert_eq!(read_one("none[]: \n"), empty);
}

#[test]
fn test_separator_option() {
    let doc = Value::Section(strings("Section"));
    let options = FormatOptions::new().with_separator(Separator::Equals);
    let text = to_string_with_options(&doc, options).unwrap();
    assert_eq!(text, "\n[Section]\n\nKey1= Value1\nKey2= Value2\nKey3= Value3\n");
    assert_eq!(from_str(&text).unwrap(), doc);
}

#[test]
fn test_encode_with_prefix() {
    let mut out = Vec::new();
    encode(&Value::Section(strings("Child")), &mut out, "Parent.").unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("\n[Parent.Child]\n\n"));
}

#[test]
fn test_codec_dispatch_order() {
    assert_eq!(Codec::ALL, [Codec::Section, Codec::Text, Codec::Sequence]);
    assert!(Codec::ALL.windows(2).all(|w| w[0].priority() > w[1].priority()));

    let text = Value::Text(Text::new("k", "v"));
    assert!(Codec::Text.matches(&text));
    assert!(!Codec::Section.matches(&text));
}

#[test]
fn test_sibling_sections_end_each_other() {
    let text = "\n[Person]\n\npk: 1\n\n[Person.address]\n\ncity: Springfield\n\n[Pet]\n\nname: Santa's Little Helper\n";
    let docs: Vec<Value> = documents_from_str(text).collect::<Result<_, _>>().unwrap();
    assert_eq!(docs.len(), 2);

    let person = docs[0].as_section().unwrap();
    assert_eq!(person.keys().collect::<Vec<_>>(), ["pk", "address"]);
    assert_eq!(docs[1].as_section().unwrap()["name"], "Santa's Little Helper");
}

#[test]
fn test_malformed_lines() {
    for bad in ["no separator here", "key:no-space", "[unclosed", "bad key: v"] {
        let text = format!("\n[S]\n\nok: 1\n{}\n", bad);
        let err = from_str(&text).unwrap_err();
        assert!(err.is_decode(), "{:?} should not decode", bad);
        assert_eq!(err, Error::decode(5, bad));
    }
}

#[test]
fn test_unwritable_values() {
    let comma = Value::Sequence(Sequence::new("tags", ["a, b"]));
    assert!(matches!(to_string(&comma), Err(Error::Encode(_))));

    let newline = Value::Sequence(Sequence::new("tags", ["a\nb"]));
    assert!(matches!(to_string(&newline), Err(Error::Encode(_))));
}
