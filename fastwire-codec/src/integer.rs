//! The integer field operator engine.
//!
//! One [`IntegerInstruction`] describes one integer field occurrence in a
//! template: its identity, mandatory/optional presence, operator, dictionary
//! scope, and the schema-configured initial value. The six decode and six
//! encode algorithms live here, written once against [`FastInt`] and
//! monomorphized per concrete integer type.
//!
//! Statefulness rules, shared by every operator:
//! - the engine never owns the presence map or the dictionary; it borrows
//!   them from the caller for the duration of one field
//! - immediately after a successful decode, the dictionary and the field
//!   set agree on the field's defined-vs-null state
//! - failures propagate before committing dictionary mutations, except
//!   where an operator's wire contract requires the earlier write

use crate::decoder::Decoder;
use crate::dictionary::{Dictionary, DictionaryScope};
use crate::encoder::Encoder;
use crate::error::FastError;
use crate::operators::{Operator, Presence};
use crate::pmap::{PresenceMap, PresenceMapBuilder};
use crate::stopbit;
use fastwire_core::{FastInt, FieldIdentity, FieldSet, FieldValue, IntKind};
use tracing::trace;

/// A field instruction for one integer field.
///
/// Immutable once built; every decode/encode invocation shares the same
/// schema-derived configuration. All per-message state lives in the session
/// and the field set.
#[derive(Debug, Clone)]
pub struct IntegerInstruction<T: FastInt> {
    identity: FieldIdentity,
    presence: Presence,
    operator: Operator,
    scope: DictionaryScope,
    type_ref: String,
    initial: Option<T>,
}

impl<T: FastInt> IntegerInstruction<T> {
    /// Creates an instruction with no initial value and global scope.
    #[must_use]
    pub fn new(identity: FieldIdentity, presence: Presence, operator: Operator) -> Self {
        Self {
            identity,
            presence,
            operator,
            scope: DictionaryScope::Global,
            type_ref: String::new(),
            initial: None,
        }
    }

    /// Sets the dictionary scope.
    #[must_use]
    pub fn with_scope(mut self, scope: DictionaryScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the application type name used by type-scoped dictionaries.
    #[must_use]
    pub fn with_type_ref(mut self, type_ref: impl Into<String>) -> Self {
        self.type_ref = type_ref.into();
        self
    }

    /// Sets the operator's initial value directly.
    #[must_use]
    pub fn with_initial(mut self, value: T) -> Self {
        self.initial = Some(value);
        self
    }

    /// Parses the operator's initial value from a schema literal.
    ///
    /// An empty literal means zero.
    ///
    /// # Errors
    /// Returns a construction error when the literal does not parse as this
    /// field's integer type.
    pub fn with_literal(mut self, literal: &str) -> Result<Self, FastError> {
        self.initial = Some(T::parse_literal(literal)?);
        Ok(self)
    }

    /// Applies the increment operator's implicit default of 1.
    #[must_use]
    pub fn with_default_increment(mut self) -> Self {
        self.initial = Some(T::one());
        self
    }

    /// Returns the field identity.
    #[must_use]
    pub fn identity(&self) -> &FieldIdentity {
        &self.identity
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the presence flag.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    /// Returns the configured initial value, if any.
    #[must_use]
    pub const fn initial(&self) -> Option<T> {
        self.initial
    }

    fn initial_or_zero(&self) -> T {
        self.initial.unwrap_or_else(T::zero)
    }

    fn decode_dictionary<'a>(&self, decoder: &'a mut Decoder) -> &'a mut Dictionary {
        decoder.dictionary_mut(self.scope, &self.type_ref)
    }

    fn encode_dictionary<'a>(&self, encoder: &'a mut Encoder) -> &'a mut Dictionary {
        encoder.dictionary_mut(self.scope, &self.type_ref)
    }

    /// Reads one value via the primitive matching this type's signedness.
    fn read_value(src: &[u8], pos: &mut usize) -> Result<T, FastError> {
        if T::SIGNED {
            Ok(T::from_wire_i64(stopbit::decode_int(src, pos)?))
        } else {
            Ok(T::from_wire_u64(stopbit::decode_uint(src, pos)?))
        }
    }

    /// Writes one value via the primitive matching this type's signedness.
    fn write_value(encoder: &mut Encoder, value: T) {
        if T::SIGNED {
            stopbit::encode_int(encoder.buffer_mut(), value.to_wire_i64());
        } else {
            stopbit::encode_uint(encoder.buffer_mut(), value.to_wire_u64());
        }
    }

    /// Extracts this field's value from the application data.
    ///
    /// An application-provided null counts as absent. A value of the wrong
    /// kind is rejected; it means the caller is driving the wrong template.
    fn own_value(&self, set: &FieldSet) -> Result<Option<T>, FastError> {
        match set.get_field(self.identity.name()) {
            None => Ok(None),
            Some(value) if !value.is_defined() => Ok(None),
            Some(value) => T::from_value(value).map(Some).ok_or_else(|| {
                FastError::encoding(format!(
                    "value for field {} is not {}",
                    self.identity.key(),
                    T::KIND
                ))
            }),
        }
    }

    /// Kind-checks a dictionary entry against this field's declared type.
    fn check_previous_kind(&self, previous: FieldValue) -> Result<(), FastError> {
        if previous.kind() == T::KIND {
            Ok(())
        } else {
            Err(FastError::template("[ERR D4] Previous value type mismatch."))
        }
    }

    /// Decodes one occurrence of this field.
    ///
    /// Consumes exactly the presence-map bits and wire bytes the operator
    /// requires, and leaves the dictionary and field set consistent.
    ///
    /// # Errors
    /// Template-definition errors for schema defects (`[ERR D4]`,
    /// `[ERR D6]`), encoding errors for uncodable data (`[ERR D5]`,
    /// `[ERRD5]`), and stream errors from the stop-bit primitives.
    pub fn decode(
        &self,
        src: &[u8],
        pos: &mut usize,
        pmap: &mut PresenceMap,
        decoder: &mut Decoder,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        trace!(field = %self.identity, operator = ?self.operator, "decode integer field");
        match self.operator {
            Operator::None => self.decode_nop(src, pos, set),
            Operator::Constant => self.decode_constant(pmap, set),
            Operator::Default => self.decode_default(src, pos, pmap, set),
            Operator::Copy => self.decode_copy(src, pos, pmap, decoder, set),
            Operator::Delta => self.decode_delta(src, pos, decoder, set),
            Operator::Increment => self.decode_increment(src, pos, pmap, decoder, set),
        }
    }

    /// Encodes one occurrence of this field from the application data.
    ///
    /// # Errors
    /// Template-definition errors for schema defects, encoding errors for
    /// missing mandatory values or constant mismatches.
    pub fn encode(
        &self,
        pmap: &mut PresenceMapBuilder,
        encoder: &mut Encoder,
        set: &FieldSet,
    ) -> Result<(), FastError> {
        trace!(field = %self.identity, operator = ?self.operator, "encode integer field");
        match self.operator {
            Operator::None => self.encode_nop(encoder, set),
            Operator::Constant => self.encode_constant(pmap, set),
            Operator::Default => self.encode_default(pmap, encoder, set),
            Operator::Copy => self.encode_copy(pmap, encoder, set),
            Operator::Delta => self.encode_delta(encoder, set),
            Operator::Increment => self.encode_increment(pmap, encoder, set),
        }
    }

    // nop never touches the presence map; optional fields ride the
    // primitive's null channel instead.
    fn decode_nop(&self, src: &[u8], pos: &mut usize, set: &mut FieldSet) -> Result<(), FastError> {
        let mut value = Self::read_value(src, pos)?;
        if self.presence.is_mandatory() {
            set.add_field(&self.identity, value.into_value());
        } else if !stopbit::check_null(&mut value) {
            set.add_field(&self.identity, value.into_value());
        }
        Ok(())
    }

    fn decode_constant(&self, pmap: &mut PresenceMap, set: &mut FieldSet) -> Result<(), FastError> {
        if self.presence.is_mandatory() || pmap.check_next_field() {
            set.add_field(&self.identity, self.initial_or_zero().into_value());
        }
        Ok(())
    }

    fn decode_default(
        &self,
        src: &[u8],
        pos: &mut usize,
        pmap: &mut PresenceMap,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        if pmap.check_next_field() {
            // The default operator's present branch always reads the signed
            // primitive, even for unsigned fields. Deployed encoders of this
            // codec family share the quirk, so the wire format keeps it.
            let mut value = T::from_wire_i64(stopbit::decode_int(src, pos)?);
            if self.presence.is_mandatory() {
                set.add_field(&self.identity, value.into_value());
            } else if !stopbit::check_null(&mut value) {
                set.add_field(&self.identity, value.into_value());
            }
        } else if let Some(initial) = self.initial {
            set.add_field(&self.identity, initial.into_value());
        } else if self.presence.is_mandatory() {
            return Err(FastError::encoding(
                "[ERR D5]Mandatory default operator with no value.",
            ));
        }
        Ok(())
    }

    fn decode_copy(
        &self,
        src: &[u8],
        pos: &mut usize,
        pmap: &mut PresenceMap,
        decoder: &mut Decoder,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        if pmap.check_next_field() {
            // fresh value on the wire
            let mut value = Self::read_value(src, pos)?;
            if !self.presence.is_mandatory() && stopbit::check_null(&mut value) {
                self.decode_dictionary(decoder)
                    .add(self.identity.key(), FieldValue::Null(T::KIND));
            } else {
                let value = value.into_value();
                set.add_field(&self.identity, value);
                self.decode_dictionary(decoder).add(self.identity.key(), value);
            }
            return Ok(());
        }

        // pmap says not present; reuse the previous value
        match self.decode_dictionary(decoder).find(self.identity.key()) {
            Some(previous) => {
                self.check_previous_kind(previous)?;
                if previous.is_defined() {
                    set.add_field(&self.identity, previous);
                } else if self.presence.is_mandatory() {
                    return Err(FastError::template("[ERR D6] Mandatory field is missing."));
                }
            }
            None => {
                if let Some(initial) = self.initial {
                    let value = initial.into_value();
                    set.add_field(&self.identity, value);
                    self.decode_dictionary(decoder).add(self.identity.key(), value);
                } else if self.presence.is_mandatory() {
                    if decoder.strict() {
                        return Err(FastError::encoding(
                            "[ERR D5] Copy operator missing mandatory integer field/no initial value",
                        ));
                    }
                    let value = T::zero().into_value();
                    set.add_field(&self.identity, value);
                    self.decode_dictionary(decoder).add(self.identity.key(), value);
                }
            }
        }
        Ok(())
    }

    fn decode_delta(
        &self,
        src: &[u8],
        pos: &mut usize,
        decoder: &mut Decoder,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        // deltas are signed regardless of the field's own signedness
        let mut delta = stopbit::decode_int(src, pos)?;
        if !self.presence.is_mandatory() && stopbit::check_null(&mut delta) {
            // no change; the previous value stays authoritative
            return Ok(());
        }

        let base = match self.decode_dictionary(decoder).find(self.identity.key()) {
            Some(previous) => {
                self.check_previous_kind(previous)?;
                T::from_value(previous).unwrap_or_else(|| self.initial_or_zero())
            }
            None => self.initial_or_zero(),
        };

        let value = base.add_delta(delta).into_value();
        set.add_field(&self.identity, value);
        self.decode_dictionary(decoder).add(self.identity.key(), value);
        Ok(())
    }

    fn decode_increment(
        &self,
        src: &[u8],
        pos: &mut usize,
        pmap: &mut PresenceMap,
        decoder: &mut Decoder,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        if pmap.check_next_field() {
            // same as copy's present branch
            let mut value = Self::read_value(src, pos)?;
            if !self.presence.is_mandatory() && stopbit::check_null(&mut value) {
                self.decode_dictionary(decoder)
                    .add(self.identity.key(), FieldValue::Null(T::KIND));
            } else {
                let value = value.into_value();
                set.add_field(&self.identity, value);
                self.decode_dictionary(decoder).add(self.identity.key(), value);
            }
            return Ok(());
        }

        let value = match self.decode_dictionary(decoder).find(self.identity.key()) {
            Some(previous) => {
                self.check_previous_kind(previous)?;
                match T::from_value(previous) {
                    Some(previous) => previous.add_delta(1),
                    None => {
                        // previous is explicitly null
                        if self.presence.is_mandatory() {
                            return Err(FastError::template(
                                "[ERR D6] Mandatory field is missing.",
                            ));
                        }
                        return Ok(());
                    }
                }
            }
            None => {
                if let Some(initial) = self.initial {
                    initial
                } else if self.presence.is_mandatory() {
                    if decoder.strict() {
                        return Err(FastError::encoding(
                            "[ERRD5]: Missing initial value for Increment operator",
                        ));
                    }
                    T::zero()
                } else {
                    // optional with no value anywhere; the field stays absent
                    return Ok(());
                }
            }
        };

        let value = value.into_value();
        set.add_field(&self.identity, value);
        self.decode_dictionary(decoder).add(self.identity.key(), value);
        Ok(())
    }

    fn encode_nop(&self, encoder: &mut Encoder, set: &FieldSet) -> Result<(), FastError> {
        match self.own_value(set)? {
            Some(value) => {
                let value = if self.presence.is_mandatory() {
                    value
                } else {
                    stopbit::shift_for_null(value)
                };
                Self::write_value(encoder, value);
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                encoder.put_byte(stopbit::NULL_BYTE);
            }
        }
        Ok(())
    }

    fn encode_constant(&self, pmap: &mut PresenceMapBuilder, set: &FieldSet) -> Result<(), FastError> {
        match self.own_value(set)? {
            Some(value) => {
                if value != self.initial_or_zero() {
                    return Err(FastError::encoding(
                        "Constant value does not match application data.",
                    ));
                }
                if !self.presence.is_mandatory() {
                    pmap.set_next_field(true);
                }
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                pmap.set_next_field(false);
            }
        }
        Ok(())
    }

    fn encode_default(
        &self,
        pmap: &mut PresenceMapBuilder,
        encoder: &mut Encoder,
        set: &FieldSet,
    ) -> Result<(), FastError> {
        match self.own_value(set)? {
            Some(value) => {
                if Some(value) == self.initial {
                    // matches the configured default; nothing on the wire
                    pmap.set_next_field(false);
                } else {
                    pmap.set_next_field(true);
                    let value = if self.presence.is_mandatory() {
                        value
                    } else {
                        stopbit::shift_for_null(value)
                    };
                    Self::write_value(encoder, value);
                }
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                if self.initial.is_some() {
                    // the decoder would otherwise supply the default, so an
                    // explicit null must go on the wire
                    pmap.set_next_field(true);
                    encoder.put_byte(stopbit::NULL_BYTE);
                } else {
                    pmap.set_next_field(false);
                }
            }
        }
        Ok(())
    }

    fn encode_copy(
        &self,
        pmap: &mut PresenceMapBuilder,
        encoder: &mut Encoder,
        set: &FieldSet,
    ) -> Result<(), FastError> {
        let previous = self.encode_dictionary(encoder).find(self.identity.key());
        if let Some(previous) = previous {
            self.check_previous_kind(previous)?;
        }
        let previous_defined = previous.and_then(T::from_value);

        match self.own_value(set)? {
            Some(value) => {
                if previous_defined == Some(value) {
                    pmap.set_next_field(false);
                } else {
                    pmap.set_next_field(true);
                    let wire = if self.presence.is_mandatory() {
                        value
                    } else {
                        stopbit::shift_for_null(value)
                    };
                    Self::write_value(encoder, wire);
                    self.encode_dictionary(encoder)
                        .add(self.identity.key(), value.into_value());
                }
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                match previous {
                    Some(previous) if !previous.is_defined() => {
                        // already null; nothing to transmit
                        pmap.set_next_field(false);
                    }
                    _ => {
                        pmap.set_next_field(true);
                        encoder.put_byte(stopbit::NULL_BYTE);
                        self.encode_dictionary(encoder)
                            .add(self.identity.key(), FieldValue::Null(T::KIND));
                    }
                }
            }
        }
        Ok(())
    }

    fn encode_delta(&self, encoder: &mut Encoder, set: &FieldSet) -> Result<(), FastError> {
        let previous = self.encode_dictionary(encoder).find(self.identity.key());
        if let Some(previous) = previous {
            self.check_previous_kind(previous)?;
        }
        let previous_defined = previous.and_then(T::from_value);
        let previous_value = previous_defined.unwrap_or_else(T::zero);

        match self.own_value(set)? {
            Some(value) => {
                let mut delta = value.delta_from(previous_value);
                if !self.presence.is_mandatory() {
                    delta = stopbit::shift_for_null(delta);
                }
                // the delta is never pmap-gated; it is always on the wire
                stopbit::encode_int(encoder.buffer_mut(), delta);
                if previous_defined != Some(value) {
                    self.encode_dictionary(encoder)
                        .add(self.identity.key(), value.into_value());
                }
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                encoder.put_byte(stopbit::NULL_BYTE);
            }
        }
        Ok(())
    }

    fn encode_increment(
        &self,
        pmap: &mut PresenceMapBuilder,
        encoder: &mut Encoder,
        set: &FieldSet,
    ) -> Result<(), FastError> {
        let previous = self.encode_dictionary(encoder).find(self.identity.key());
        if let Some(previous) = previous {
            self.check_previous_kind(previous)?;
        }
        let previous_defined = previous.and_then(T::from_value);

        match self.own_value(set)? {
            Some(value) => {
                if previous_defined.map(|p| p.add_delta(1)) == Some(value) {
                    // the free increment path
                    pmap.set_next_field(false);
                } else {
                    pmap.set_next_field(true);
                    let wire = if self.presence.is_mandatory() {
                        value
                    } else {
                        stopbit::shift_for_null(value)
                    };
                    Self::write_value(encoder, wire);
                }
                // the dictionary advances on both paths
                self.encode_dictionary(encoder)
                    .add(self.identity.key(), value.into_value());
            }
            None => {
                if self.presence.is_mandatory() {
                    return Err(FastError::encoding("Missing mandatory field."));
                }
                pmap.set_next_field(true);
                encoder.put_byte(stopbit::NULL_BYTE);
                self.encode_dictionary(encoder)
                    .add(self.identity.key(), FieldValue::Null(T::KIND));
            }
        }
        Ok(())
    }
}

/// A field instruction for any of the four integer instantiations.
///
/// Lets a template walker hold heterogeneous integer fields without trait
/// objects; dispatch is a closed match.
#[derive(Debug, Clone)]
pub enum IntegerField {
    /// 32-bit signed instruction.
    Int32(IntegerInstruction<i32>),
    /// 32-bit unsigned instruction.
    UInt32(IntegerInstruction<u32>),
    /// 64-bit signed instruction.
    Int64(IntegerInstruction<i64>),
    /// 64-bit unsigned instruction.
    UInt64(IntegerInstruction<u64>),
}

impl IntegerField {
    /// Returns the field identity.
    #[must_use]
    pub fn identity(&self) -> &FieldIdentity {
        match self {
            Self::Int32(f) => f.identity(),
            Self::UInt32(f) => f.identity(),
            Self::Int64(f) => f.identity(),
            Self::UInt64(f) => f.identity(),
        }
    }

    /// Returns the integer kind.
    #[must_use]
    pub const fn kind(&self) -> IntKind {
        match self {
            Self::Int32(_) => IntKind::Int32,
            Self::UInt32(_) => IntKind::UInt32,
            Self::Int64(_) => IntKind::Int64,
            Self::UInt64(_) => IntKind::UInt64,
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Int32(f) => f.operator(),
            Self::UInt32(f) => f.operator(),
            Self::Int64(f) => f.operator(),
            Self::UInt64(f) => f.operator(),
        }
    }

    /// Returns the presence flag.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        match self {
            Self::Int32(f) => f.presence(),
            Self::UInt32(f) => f.presence(),
            Self::Int64(f) => f.presence(),
            Self::UInt64(f) => f.presence(),
        }
    }

    /// Decodes one occurrence of this field.
    ///
    /// # Errors
    /// See [`IntegerInstruction::decode`].
    pub fn decode(
        &self,
        src: &[u8],
        pos: &mut usize,
        pmap: &mut PresenceMap,
        decoder: &mut Decoder,
        set: &mut FieldSet,
    ) -> Result<(), FastError> {
        match self {
            Self::Int32(f) => f.decode(src, pos, pmap, decoder, set),
            Self::UInt32(f) => f.decode(src, pos, pmap, decoder, set),
            Self::Int64(f) => f.decode(src, pos, pmap, decoder, set),
            Self::UInt64(f) => f.decode(src, pos, pmap, decoder, set),
        }
    }

    /// Encodes one occurrence of this field.
    ///
    /// # Errors
    /// See [`IntegerInstruction::encode`].
    pub fn encode(
        &self,
        pmap: &mut PresenceMapBuilder,
        encoder: &mut Encoder,
        set: &FieldSet,
    ) -> Result<(), FastError> {
        match self {
            Self::Int32(f) => f.encode(pmap, encoder, set),
            Self::UInt32(f) => f.encode(pmap, encoder, set),
            Self::Int64(f) => f.encode(pmap, encoder, set),
            Self::UInt64(f) => f.encode(pmap, encoder, set),
        }
    }
}

impl From<IntegerInstruction<i32>> for IntegerField {
    fn from(f: IntegerInstruction<i32>) -> Self {
        Self::Int32(f)
    }
}

impl From<IntegerInstruction<u32>> for IntegerField {
    fn from(f: IntegerInstruction<u32>) -> Self {
        Self::UInt32(f)
    }
}

impl From<IntegerInstruction<i64>> for IntegerField {
    fn from(f: IntegerInstruction<i64>) -> Self {
        Self::Int64(f)
    }
}

impl From<IntegerInstruction<u64>> for IntegerField {
    fn from(f: IntegerInstruction<u64>) -> Self {
        Self::UInt64(f)
    }
}
