// Data shapes exchanged with the service and stored in the cache.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Decrypted inputs keyed by part label (`"1"`, `"2"`, `"3"`). May be partial.
pub type Inputs = BTreeMap<String, String>;

/// Hex ciphertext keyed by part label, as served by the CDN.
pub type EncryptedInputs = BTreeMap<String, String>;

/// Labels that must all be present before inputs are written to the cache.
pub const ALL_PARTS: [&str; 3] = ["1", "2", "3"];

/// A puzzle within an event, e.g. quest 1 of event 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestId {
    pub quest: u32,
    pub event: u32,
}

impl QuestId {
    pub fn new(quest: u32, event: u32) -> Self {
        QuestId { quest, event }
    }

    /// Build from positional arguments that may have been given in either
    /// order, so `2024 1` and `1 2024` both mean quest 1 of 2024.
    pub fn from_loose(quest: u32, event: u32) -> Self {
        if (1..=20).contains(&event) && quest >= 2024 {
            QuestId::new(event, quest)
        } else {
            QuestId::new(quest, event)
        }
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quest {} of {}", self.quest, self.event)
    }
}

/// One of the three parts of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    One,
    Two,
    Three,
}

impl Part {
    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
            Part::Three => 3,
        }
    }

    /// Map key used in `Inputs` and `EncryptedInputs`.
    pub fn label(self) -> String {
        self.number().to_string()
    }
}

impl TryFrom<u8> for Part {
    type Error = u8;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Part::One),
            2 => Ok(Part::Two),
            3 => Ok(Part::Three),
            other => Err(other),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Per-part decryption keys, stored under `key1`, `key2`, `key3`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(BTreeMap<String, String>);

impl KeySet {
    /// Keep the string-valued entries of a keys response; other fields the
    /// service sends alongside the keys are dropped.
    pub fn from_json(map: serde_json::Map<String, serde_json::Value>) -> Self {
        KeySet(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    serde_json::Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Key for the part labelled `label`, looked up as `key{label}`.
    pub fn for_label(&self, label: &str) -> Option<&str> {
        self.0.get(&format!("key{label}")).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        KeySet(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An answer is submitted as a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Int(i64),
    Text(String),
}

impl Answer {
    /// Integers in canonical form are sent as numbers, anything else as
    /// text exactly as typed, so `007` or `+5` are not rewritten.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) if n.to_string() == raw.trim() => Answer::Int(n),
            _ => Answer::Text(raw.to_string()),
        }
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Answer::Int(n)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Int(n) => write!(f, "{n}"),
            Answer::Text(s) => write!(f, "{s}"),
        }
    }
}
