//! The field set: ordered mapping from field identity to decoded value.
//!
//! Decoding writes fields into a [`FieldSet`] in schema declaration order;
//! encoding reads application values back out of one. Messages on market
//! data feeds are small, so the backing store keeps the first entries
//! inline.

use crate::field::{FieldIdentity, FieldValue};
use smallvec::SmallVec;

/// Number of field slots stored inline before spilling to the heap.
const INLINE_FIELDS: usize = 16;

/// An ordered collection of decoded (or to-be-encoded) fields.
///
/// Lookup is by local field name and linear; field sets are message-sized,
/// not schema-sized, and the common case is a handful of entries.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: SmallVec<[(FieldIdentity, FieldValue); INLINE_FIELDS]>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any existing entry with the same identity.
    pub fn add_field(&mut self, identity: &FieldIdentity, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(id, _)| id == identity) {
            slot.1 = value;
        } else {
            self.fields.push((identity.clone(), value));
        }
    }

    /// Looks up a field by local name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(id, _)| id.name() == name)
            .map(|(_, value)| *value)
    }

    /// Returns true if a field with the given local name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(id, _)| id.name() == name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldIdentity, FieldValue)> {
        self.fields.iter().map(|(id, value)| (id, *value))
    }

    /// Removes all fields, keeping the allocation.
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
