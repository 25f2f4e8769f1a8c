//! # FastWire Core
//!
//! Core types for the FastWire FAST (FIX Adapted for Streaming) codec.
//!
//! This crate provides the building blocks shared by the codec crates:
//! - **Field types**: `FieldIdentity`, `FieldValue`, `IntKind`
//! - **Integer abstraction**: the `FastInt` trait, implemented for the four
//!   wire integer types (i32, u32, i64, u64)
//! - **Message container**: `FieldSet`, the ordered field-to-value mapping
//!   produced by decoding and consumed by encoding
//! - **Error types**: construction-time errors via `thiserror`

pub mod error;
pub mod field;
pub mod message;

pub use error::CoreError;
pub use field::{FastInt, FieldIdentity, FieldValue, IntKind};
pub use message::FieldSet;
