//! Test fixtures - descriptor sets and manifests for testing

use enumgen_core::{Enumerant, EnumerantSet, Repr, Value};

/// Build a set whose constants are named `V0`, `V1`, .. and labelled with
/// their lowercase name.
pub fn set_of(type_name: &str, repr: Repr, values: &[i128]) -> EnumerantSet {
    let enumerants = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let name = format!("V{}", i);
            let label = name.to_lowercase();
            Enumerant::new(name, Value::new(v), repr.is_signed(), label)
        })
        .collect();
    EnumerantSet::new(type_name, repr, enumerants).expect("fixture values fit the repr")
}

/// Build a set from explicit `(name, value, label)` triples.
pub fn labelled(type_name: &str, repr: Repr, entries: &[(&str, i128, &str)]) -> EnumerantSet {
    let enumerants = entries
        .iter()
        .map(|&(name, value, label)| {
            Enumerant::new(name, Value::new(value), repr.is_signed(), label)
        })
        .collect();
    EnumerantSet::new(type_name, repr, enumerants).expect("fixture values fit the repr")
}

/// `{A=0, B=1, C=2}`, unsigned
pub fn single_run_unsigned() -> EnumerantSet {
    labelled("Abc", Repr::U8, &[("A", 0, "a"), ("B", 1, "b"), ("C", 2, "c")])
}

/// `{A=5, B=6, C=7}`, signed
pub fn offset_run_signed() -> EnumerantSet {
    labelled("Offset", Repr::I32, &[("A", 5, "a"), ("B", 6, "b"), ("C", 7, "c")])
}

/// `{A=0, B=1, C=5, D=6}`, unsigned
pub fn two_runs_unsigned() -> EnumerantSet {
    labelled(
        "Pair",
        Repr::U16,
        &[("A", 0, "a"), ("B", 1, "b"), ("C", 5, "c"), ("D", 6, "d")],
    )
}

/// Twelve singleton runs at `0, 10, .., 110`
pub fn twelve_sparse() -> EnumerantSet {
    let values: Vec<i128> = (0..12).map(|i| i * 10).collect();
    set_of("Sparse", Repr::U32, &values)
}

/// `{"apple" -> A, "banana" -> B, "cherry" -> C}`
pub fn fruit() -> EnumerantSet {
    labelled(
        "Fruit",
        Repr::U8,
        &[("A", 0, "apple"), ("B", 1, "banana"), ("C", 2, "cherry")],
    )
}

/// A type with no constants
pub fn empty() -> EnumerantSet {
    set_of("Empty", Repr::U8, &[])
}

/// Manifest covering every validity strategy plus an empty type
pub fn manifest_yaml() -> &'static str {
    r#"types:
  - name: Color
    repr: u8
    enumerants:
      - { name: ColorRed, value: 0 }
      - { name: ColorGreen, value: 1 }
      - { name: ColorBlue, value: 2 }
  - name: Errno
    repr: i32
    enumerants:
      - { name: EPERM, value: 1, label: operation not permitted }
      - { name: ENOENT, value: 2, label: no such file or directory }
      - { name: EIO, value: 5, label: i/o error }
  - name: Port
    repr: u16
    enumerants:
      - { name: Ftp, value: 21 }
      - { name: Ssh, value: 22 }
      - { name: Smtp, value: 25 }
      - { name: Dns, value: 53 }
      - { name: Http, value: 80 }
      - { name: Pop3, value: 110 }
      - { name: Ntp, value: 123 }
      - { name: Imap, value: 143 }
      - { name: Irc, value: 194 }
      - { name: Snmp, value: 161 }
      - { name: Ldap, value: 389 }
      - { name: Https, value: 443 }
  - name: Nothing
    repr: u8
"#
}
