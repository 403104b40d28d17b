//! Ordered member descriptor map

use serde::{Deserialize, Serialize};

/// Resolved member descriptors keyed by effective name
///
/// Iteration follows declaration order. The first insertion for a name wins;
/// later insertions under the same name are dropped, so a rename that
/// collides with an earlier member cannot displace it. Serializes as the
/// ordered pair list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Members<T> {
    entries: Vec<(String, T)>,
}

impl<T> Members<T> {
    /// Empty map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor for `name`, if present
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Check if a member is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Insert a descriptor under `name`; the first insertion for a name wins
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push((name, value));
        }
    }

    /// Iterate name/descriptor pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Member names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Fold `ancestor` members under this map's own
    ///
    /// Ancestor entries come first. A name present in both keeps the
    /// subject's descriptor in the ancestor's position; subject-only names
    /// follow in their own order.
    pub fn merge_inherited(self, ancestor: Members<T>) -> Members<T> {
        let mut merged = ancestor;
        let mut appended = Vec::new();
        for (name, value) in self.entries {
            match merged.entries.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => slot.1 = value,
                None => appended.push((name, value)),
            }
        }
        merged.entries.extend(appended);
        merged
    }
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Members<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> FromIterator<(String, T)> for Members<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut members = Members::new();
        for (name, value) in iter {
            members.insert(name, value);
        }
        members
    }
}
