use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_tesql::{
    documents_from_reader, documents_from_str, from_document, from_str, to_document, to_string,
    Error, Raw, Section, Value,
};
use std::io::Cursor;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Address {
    street: String,
    city: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Role {
    Parent,
    Child,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Person {
    pk: u32,
    firstname: String,
    surname: String,
    role: Role,
    age: Option<u8>,
    quote: Option<String>,
    address: Address,
}

fn homer() -> Person {
    Person {
        pk: 1,
        firstname: "Homer".to_string(),
        surname: "Simpson".to_string(),
        role: Role::Parent,
        age: Some(39),
        quote: Some("D'oh!\n\nMmm... donuts.".to_string()),
        address: Address {
            street: "742 Evergreen Terrace".to_string(),
            city: "Springfield".to_string(),
        },
    }
}

fn bart() -> Person {
    Person {
        pk: 2,
        firstname: "Bart".to_string(),
        surname: "Simpson".to_string(),
        role: Role::Child,
        age: None,
        quote: None,
        address: Address {
            street: "742 Evergreen Terrace".to_string(),
            city: "Springfield".to_string(),
        },
    }
}

#[test]
fn test_struct_round_trip() {
    init_tracing();
    let doc = to_document("Person", &homer()).unwrap();
    let text = to_string(&doc).unwrap();
    println!("Person document:\n{}", text);

    let back = from_str(&text).unwrap();
    assert_eq!(back.name(), "Person");
    assert_eq!(from_document::<Person>(&back).unwrap(), homer());
}

#[test]
fn test_struct_layout() {
    let doc = to_document("Person", &bart()).unwrap();
    assert_eq!(
        to_string(&doc).unwrap(),
        "\n[Person]\n\n\
         pk: 2\nfirstname: Bart\nsurname: Simpson\nrole: Child\n\
         \n[Person.address]\n\n\
         street: 742 Evergreen Terrace\ncity: Springfield\n"
    );
}

#[test]
fn test_multiple_documents() {
    let mut text = String::new();
    for (name, person) in [("Homer", homer()), ("Bart", bart())] {
        text.push_str(&to_string(&to_document(name, &person).unwrap()).unwrap());
    }

    let docs: Vec<Value> = documents_from_str(&text).collect::<Result<_, _>>().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name(), "Homer");
    assert_eq!(docs[1].name(), "Bart");
    assert_eq!(from_document::<Person>(&docs[1]).unwrap(), bart());

    let from_reader: Vec<Value> = documents_from_reader(Cursor::new(text.into_bytes()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(from_reader, docs);
}

#[test]
fn test_top_level_entries_are_documents_too() {
    let docs: Vec<Value> = documents_from_str("version: 3\n\n[Person]\n\npk: 1\n")
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(docs[0].is_text());
    assert_eq!(docs[0], "3");
    assert!(docs[1].is_section());
}

#[test]
fn test_hand_edited_document() {
    // Tolerates CRLF, '=' separators and extra blank lines
    let text = "\r\n\r\n[Person]\r\n\r\npk= 1\r\nfirstname: Homer\r\n\r\n\r\nsurname= Simpson\r\n";
    let doc = from_str(text).unwrap();
    let section = doc.as_section().unwrap();
    assert_eq!(section.keys().collect::<Vec<_>>(), ["pk", "firstname", "surname"]);
    assert_eq!(section["surname"], "Simpson");
}

#[test]
fn test_decode_error_reports_line() {
    init_tracing();
    let text = "\n[Person]\n\npk: 1\nfirstname Homer\n";
    match from_str(text) {
        Err(Error::Decode { line, text }) => {
            assert_eq!(line, 5);
            assert_eq!(text, "firstname Homer");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_unreadable_document_name_is_not_written() {
    let doc = to_document("my doc", &bart()).unwrap();
    assert!(matches!(to_string(&doc), Err(Error::Encode(_))));

    let doc = to_document("Person.2", &bart()).unwrap();
    assert!(matches!(to_string(&doc), Err(Error::Encode(_))));
}

#[test]
fn test_duplicate_key_in_text() {
    let err = from_str("\n[Person]\n\npk: 1\npk: 2\n").unwrap_err();
    assert_eq!(err, Error::duplicate_key("pk"));
}

#[test]
fn test_missing_field_is_reported() {
    let doc = from_str("\n[Person]\n\npk: 1\n").unwrap();
    let err = from_document::<Person>(&doc).unwrap_err();
    assert!(err.to_string().contains("firstname"));
}

#[test]
fn test_typed_text_accessors() {
    let created = Utc.with_ymd_and_hms(2010, 3, 14, 15, 9, 26).unwrap();
    let mut section = Section::new("Meta");
    section.append("created", created, true).unwrap();
    section.append("big", Raw::from(u64::MAX), true).unwrap();

    let text = to_string(&Value::Section(section)).unwrap();
    let doc = from_str(&text).unwrap();
    let meta = doc.as_section().unwrap();

    assert_eq!(meta["created"].as_text().unwrap().as_date().unwrap(), created);
    assert_eq!(
        meta["big"].as_text().unwrap().as_bigint().unwrap().to_string(),
        u64::MAX.to_string()
    );
}

#[test]
fn test_edit_after_decode() {
    let mut doc = from_str(&to_string(&to_document("Person", &bart()).unwrap()).unwrap()).unwrap();
    let person = doc.as_section_mut().unwrap();

    person.select("firstname").unwrap();
    person.append("nickname", "El Barto", true).unwrap();
    person.replace("pk", 3, false).unwrap();
    person
        .section_mut("address")
        .unwrap()
        .insert("zip", "49007")
        .unwrap();

    let text = to_string(&doc).unwrap();
    assert!(text.starts_with("\n[Person]\n\npk: 3\nfirstname: Bart\nnickname: El Barto\n"));
    assert!(text.ends_with("city: Springfield\nzip: 49007\n"));
}

#[test]
fn test_list_of_records_has_no_representation() {
    #[derive(Serialize)]
    struct Family {
        members: Vec<Address>,
    }

    let family = Family {
        members: vec![Address {
            street: "a".to_string(),
            city: "b".to_string(),
        }],
    };
    assert!(matches!(to_document("Family", &family), Err(Error::Type(_))));
}
