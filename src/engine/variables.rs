use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const PROMPT_OUTPUT_PREFIX: &str = "prompt_";

/// Variable name under which step `index` (0-based) publishes its output.
pub fn prompt_output_name(index: usize) -> String {
    format!("{PROMPT_OUTPUT_PREFIX}{}", index + 1)
}

/// 0-based step index a `prompt_N` variable name refers to, if it is one.
pub fn prompt_reference_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(PROMPT_OUTPUT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let position: usize = digits.parse().ok()?;
    position.checked_sub(1)
}

/// Name-to-value snapshot supplied by the caller. An empty value is the
/// same as an unset one, so empty entries are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableBag {
    entries: BTreeMap<String, String>,
}

impl VariableBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut bag = Self::new();
        for (name, value) in entries {
            bag.insert(name, value);
        }
        bag
    }

    pub fn insert(&mut self, name: String, value: String) {
        if value.is_empty() {
            self.entries.remove(&name);
        } else {
            self.entries.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest of the bag contents, used to detect structural changes
    /// between evaluations. Names and values are length-prefixed so
    /// adjacent entries cannot collide.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, value) in &self.entries {
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}
