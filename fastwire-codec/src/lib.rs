//! # FastWire Codec
//!
//! FAST (FIX Adapted for Streaming) wire codec centered on the integer
//! field operator engine.
//!
//! FAST trades CPU for bandwidth: per-field *operators* (nop, constant,
//! default, copy, delta, increment) exploit redundancy across consecutive
//! messages of the same shape, so most fields cost one presence-map bit or
//! nothing at all.
//!
//! ## Layers
//!
//! - **Stop-bit primitives**: variable-length integers, 7 payload bits per
//!   byte, high bit terminates
//! - **Presence map**: one bit per pmap-using operator occurrence, consumed
//!   in schema declaration order
//! - **Dictionary**: scoped cache of last known values, keyed per field
//! - **Operator engine**: [`IntegerInstruction`], the six decode and six
//!   encode algorithms, monomorphized over i32/u32/i64/u64

pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod error;
pub mod integer;
pub mod operators;
pub mod pmap;
pub mod stopbit;

pub use decoder::Decoder;
pub use dictionary::{Dictionary, DictionaryScope};
pub use encoder::Encoder;
pub use error::FastError;
pub use integer::{IntegerField, IntegerInstruction};
pub use operators::{Operator, Presence};
pub use pmap::{PresenceMap, PresenceMapBuilder};
