//! Core markup primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: character reference decoding with Cow (zero-copy when possible)
//! - Normalize: raw text → comparable content for the content predicate

pub mod entities;
pub mod normalize;
pub mod scanner;

pub use normalize::{DefaultNormalizer, TextNormalizer};
