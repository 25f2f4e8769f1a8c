//! Field operator taxonomy.
//!
//! An operator is the per-field strategy governing how the field's value
//! relates to the wire bytes and to prior messages. The integer engine
//! supports the six integer operators; `Tail` applies only to string and
//! byte-vector fields and is out of scope here.

use serde::{Deserialize, Serialize};

/// FAST field operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Operator {
    /// No operator: the value (or its null encoding) is always on the wire.
    #[default]
    None,
    /// Value is never on the wire; the schema's initial value is implied.
    Constant,
    /// If the pmap bit is clear, use the schema's initial value.
    Default,
    /// If the pmap bit is clear, reuse the previous value from the dictionary.
    Copy,
    /// The wire carries a signed delta from the previous value.
    Delta,
    /// If the pmap bit is clear, the new value is the previous value plus one.
    Increment,
}

/// Whether a field must be present in every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Presence {
    /// The field appears in every message; no null sentinel is reserved.
    #[default]
    Mandatory,
    /// The field may be absent; the wire encoding reserves a null sentinel.
    Optional,
}

impl Presence {
    /// Returns true for mandatory fields.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(self, Self::Mandatory)
    }
}

impl Operator {
    /// Returns true if this operator reads or writes dictionary state.
    #[must_use]
    pub const fn uses_dictionary(self) -> bool {
        matches!(self, Self::Copy | Self::Delta | Self::Increment)
    }

    /// Returns the number of presence-map bits one occurrence of this
    /// operator consumes and produces (0 or 1).
    ///
    /// `None` and `Delta` never take a bit; `Constant` takes one only when
    /// the field is optional; the rest always take one.
    #[must_use]
    pub const fn pmap_bits(self, presence: Presence) -> usize {
        match self {
            Self::None | Self::Delta => 0,
            Self::Constant => {
                if presence.is_mandatory() {
                    0
                } else {
                    1
                }
            }
            Self::Default | Self::Copy | Self::Increment => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_dictionary() {
        assert!(!Operator::None.uses_dictionary());
        assert!(!Operator::Constant.uses_dictionary());
        assert!(!Operator::Default.uses_dictionary());
        assert!(Operator::Copy.uses_dictionary());
        assert!(Operator::Delta.uses_dictionary());
        assert!(Operator::Increment.uses_dictionary());
    }

    #[test]
    fn test_pmap_bits() {
        for presence in [Presence::Mandatory, Presence::Optional] {
            assert_eq!(Operator::None.pmap_bits(presence), 0);
            assert_eq!(Operator::Delta.pmap_bits(presence), 0);
            assert_eq!(Operator::Default.pmap_bits(presence), 1);
            assert_eq!(Operator::Copy.pmap_bits(presence), 1);
            assert_eq!(Operator::Increment.pmap_bits(presence), 1);
        }
        assert_eq!(Operator::Constant.pmap_bits(Presence::Mandatory), 0);
        assert_eq!(Operator::Constant.pmap_bits(Presence::Optional), 1);
    }
}
