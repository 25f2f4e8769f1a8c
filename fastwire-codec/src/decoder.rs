//! Decode session state.
//!
//! A [`Decoder`] owns everything that outlives a single field: the scoped
//! dictionaries, the current template id, and the strict-mode flag. The
//! operator engine borrows it per call and never keeps state of its own.
//! Concurrent decode streams must each use their own `Decoder`.

use crate::dictionary::{Dictionary, DictionaryScope, DictionarySet};

/// FAST decode session.
#[derive(Debug, Default)]
pub struct Decoder {
    dictionaries: DictionarySet,
    current_template: u32,
    strict: bool,
}

impl Decoder {
    /// Creates a decoder in strict mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dictionaries: DictionarySet::new(),
            current_template: 0,
            strict: true,
        }
    }

    /// Creates a decoder with an explicit strict-mode setting.
    ///
    /// Lenient mode substitutes a zero where a copy or increment decode
    /// would otherwise fail for lack of any value; strict mode makes that
    /// condition fatal.
    #[must_use]
    pub fn with_strict(strict: bool) -> Self {
        Self {
            strict,
            ..Self::new()
        }
    }

    /// Returns the strict-mode flag.
    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    /// Changes the strict-mode flag for subsequent fields.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Returns the template id in effect for template-scoped dictionaries.
    #[must_use]
    pub const fn current_template(&self) -> u32 {
        self.current_template
    }

    /// Sets the template id for subsequent template-scoped lookups.
    pub fn set_current_template(&mut self, id: u32) {
        self.current_template = id;
    }

    /// Resolves a dictionary scope for the field being decoded.
    pub fn dictionary_mut(&mut self, scope: DictionaryScope, type_ref: &str) -> &mut Dictionary {
        self.dictionaries
            .resolve(scope, self.current_template, type_ref)
    }

    /// Clears all dictionary state (schema-defined reset boundary).
    pub fn reset(&mut self) {
        self.dictionaries.reset();
        self.current_template = 0;
    }
}
