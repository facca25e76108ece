//! Reserved-character escaping for document keys.
//!
//! The document store treats `.` and `$` in field names as operators, so keys
//! are rewritten to their fullwidth look-alikes before a document is
//! persisted and rewritten back when it is loaded.
//!
//! Only keys of mappings reachable through other mappings are rewritten.
//! Sequences are never descended into, so a mapping stored inside a list keeps
//! its keys verbatim. Values are never touched.
//!
//! If rewriting a key produces a key that already exists in the same mapping
//! (for instance `a.b` next to `a．b`), the value of the rewritten key wins in
//! both directions. The collision is logged at warn level.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// `(reserved, substitute)` pairs. Escaping maps left to right.
const TRANSLATIONS: [(char, char); 2] = [('.', '\u{FF0E}'), ('$', '\u{FF04}')];

#[derive(Debug, Clone, Copy)]
enum Direction {
    Escape,
    Unescape,
}

impl Direction {
    fn pair(self, (reserved, substitute): (char, char)) -> (char, char) {
        match self {
            Direction::Escape => (reserved, substitute),
            Direction::Unescape => (substitute, reserved),
        }
    }
}

/// Rewrite reserved characters in every mapping key of `field`.
pub fn escape_chars(mut field: Value) -> Value {
    translate_in_place(&mut field, Direction::Escape);
    field
}

/// Undo [`escape_chars`].
pub fn unescape_chars(mut field: Value) -> Value {
    translate_in_place(&mut field, Direction::Unescape);
    field
}

fn translate_key(key: &str, direction: Direction) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(key);
    for pair in TRANSLATIONS {
        let (from, to) = direction.pair(pair);
        if out.contains(from) {
            out = Cow::Owned(out.replace(from, &to.to_string()));
        }
    }
    out
}

fn translate_in_place(field: &mut Value, direction: Direction) {
    let Value::Object(map) = field else {
        return;
    };
    if map.is_empty() {
        return;
    }

    let entries = std::mem::take(map);
    let mut rebuilt = Map::with_capacity(entries.len());
    let mut rewritten = Vec::new();
    for (key, mut value) in entries {
        // Nested mappings only; arrays are left as they are.
        if value.is_object() {
            translate_in_place(&mut value, direction);
        }
        if let Cow::Owned(new_key) = translate_key(&key, direction) {
            rewritten.push((new_key, value));
        } else {
            rebuilt.insert(key, value);
        }
    }
    // Rewritten keys go in last so they replace an existing spelling.
    for (key, value) in rewritten {
        if rebuilt.contains_key(&key) {
            tracing::warn!(key = %key, "key collision while translating document keys; rewritten key wins");
        }
        rebuilt.insert(key, value);
    }
    *map = rebuilt;
}
