//! Text normalization for the content predicate.

use super::entities::decode_text;
use unicode_normalization::UnicodeNormalization;

/// Turns a node's raw direct text into comparable content.
///
/// Returns `None` when the node carries no meaningful content.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> Option<String>;
}

/// Entity decoding, NFKC, then trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNormalizer;

impl TextNormalizer for DefaultNormalizer {
    fn normalize(&self, raw: &str) -> Option<String> {
        let decoded = decode_text(raw);
        let normalized: String = decoded.nfkc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
