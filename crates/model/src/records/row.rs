use crate::core::value::Value;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// An ordered label → value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    /// Missing labels read as `Null`.
    pub fn get_or_null(&self, label: &str) -> Value {
        self.get(label).cloned().unwrap_or(Value::Null)
    }

    /// Replaces the value in place when `label` exists, appends otherwise.
    pub fn insert(&mut self, label: impl Into<String>, value: Value) {
        let label = label.into();
        match self.get_mut(&label) {
            Some(existing) => *existing = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (label, value) in iter {
            row.insert(label, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}
