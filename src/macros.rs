/// Builds a [`Raw`](crate::Raw) input from a literal-like syntax.
///
/// Objects become maps (keeping their written order), arrays become lists,
/// anything else goes through `Raw::from`.
///
/// ```rust
/// use serde_tesql::{raw, Raw};
///
/// let value = raw!({ "pk": 1, "tags": ["a", "b"], "address": { "city": "Springfield" } });
/// let Raw::Map(map) = value else { panic!("expected a map") };
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["pk", "tags", "address"]);
/// ```
#[macro_export]
macro_rules! raw {
    ([]) => {
        $crate::Raw::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Raw::List(vec![$($crate::raw!($elem)),*])
    };

    ({}) => {
        $crate::Raw::map()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Raw::from_iter([$(($key, $crate::raw!($value))),*])
    };

    ($e:expr) => {
        $crate::Raw::from($e)
    };
}

/// Builds a [`Section`](crate::Section), returning a `Result`.
///
/// Entries are appended in the written order, so flat entries end up ahead
/// of nested sections regardless of where they appear.
///
/// ```rust
/// use serde_tesql::{section, to_string, Value};
///
/// let person = section!("Person", {
///     "address": { "city": "Springfield" },
///     "pk": 1,
///     "surname": "Simpson",
/// })
/// .unwrap();
///
/// assert_eq!(person.keys().collect::<Vec<_>>(), ["pk", "surname", "address"]);
/// assert_eq!(
///     to_string(&Value::Section(person)).unwrap(),
///     "\n[Person]\n\npk: 1\nsurname: Simpson\n\n[Person.address]\n\ncity: Springfield\n"
/// );
/// ```
#[macro_export]
macro_rules! section {
    ($name:expr) => {
        $crate::Section::from_raw($name, $crate::Raw::map())
    };

    ($name:expr, { $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Section::from_raw($name, $crate::raw!({ $($key : $value),* }))
    };
}
