//! Operator dictionaries.
//!
//! Copy, delta, and increment relate each message to the previous one
//! through a dictionary: a mutable map from field key to the last known
//! value for that key. An entry is one of three states — absent (the key
//! has never been seen), defined, or explicitly null — and the engine
//! distinguishes all three.

use fastwire_core::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scope of a dictionary instance.
///
/// Scope is resolved once at session setup; within one session the same key
/// always resolves to the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DictionaryScope {
    /// One dictionary shared across all templates.
    #[default]
    Global,
    /// One dictionary per template id.
    Template,
    /// One dictionary per application type name.
    Type,
}

/// A single dictionary: field key to last known value.
///
/// Absence from the map means "never seen"; `FieldValue::Null` is the
/// explicit null state left behind by an optional field that transmitted
/// the null sentinel.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, FieldValue>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the last known value for a key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<FieldValue> {
        self.entries.get(key).copied()
    }

    /// Records the last known value for a key, replacing any prior entry.
    pub fn add(&mut self, key: impl Into<String>, value: FieldValue) {
        self.entries.insert(key.into(), value);
    }

    /// Returns the number of keys with a recorded state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets all recorded state (a schema-defined reset boundary).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The scoped dictionary instances owned by one session.
///
/// One global dictionary, one per template id, one per application type
/// name. Both decode and encode sessions carry one of these; the engine
/// only ever borrows a resolved instance for the duration of one field.
#[derive(Debug, Clone, Default)]
pub struct DictionarySet {
    global: Dictionary,
    templates: HashMap<u32, Dictionary>,
    types: HashMap<String, Dictionary>,
}

impl DictionarySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a scope to its dictionary instance.
    ///
    /// Template scope keys on the session's current template id; type scope
    /// keys on the field's application type name.
    pub fn resolve(
        &mut self,
        scope: DictionaryScope,
        template_id: u32,
        type_ref: &str,
    ) -> &mut Dictionary {
        match scope {
            DictionaryScope::Global => &mut self.global,
            DictionaryScope::Template => self.templates.entry(template_id).or_default(),
            DictionaryScope::Type => self.types.entry(type_ref.to_string()).or_default(),
        }
    }

    /// Clears every instance (a schema-defined reset boundary).
    pub fn reset(&mut self) {
        self.global.clear();
        self.templates.clear();
        self.types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastwire_core::IntKind;

    #[test]
    fn test_find_absent_vs_null() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.find("Px"), None);

        dict.add("Px", FieldValue::Null(IntKind::Int32));
        let entry = dict.find("Px").unwrap();
        assert!(!entry.is_defined());
        assert_eq!(entry.kind(), IntKind::Int32);
    }

    #[test]
    fn test_add_replaces() {
        let mut dict = Dictionary::new();
        dict.add("Qty", FieldValue::UInt32(100));
        dict.add("Qty", FieldValue::UInt32(250));
        assert_eq!(dict.find("Qty"), Some(FieldValue::UInt32(250)));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut dict = Dictionary::new();
        dict.add("Qty", FieldValue::UInt32(1));
        dict.clear();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_scope_resolution_is_disjoint() {
        let mut set = DictionarySet::new();
        set.resolve(DictionaryScope::Global, 0, "")
            .add("Qty", FieldValue::UInt32(1));
        set.resolve(DictionaryScope::Template, 7, "")
            .add("Qty", FieldValue::UInt32(2));
        set.resolve(DictionaryScope::Type, 0, "Quantity")
            .add("Qty", FieldValue::UInt32(3));

        assert_eq!(
            set.resolve(DictionaryScope::Global, 99, "x").find("Qty"),
            Some(FieldValue::UInt32(1))
        );
        assert_eq!(
            set.resolve(DictionaryScope::Template, 7, "").find("Qty"),
            Some(FieldValue::UInt32(2))
        );
        assert_eq!(
            set.resolve(DictionaryScope::Template, 8, "").find("Qty"),
            None
        );
        assert_eq!(
            set.resolve(DictionaryScope::Type, 0, "Quantity").find("Qty"),
            Some(FieldValue::UInt32(3))
        );
    }
}
