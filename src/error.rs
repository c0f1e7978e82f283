//! Fingerprinting errors.

use crate::dom::NodeId;
use thiserror::Error;

/// Errors surfaced by fingerprint construction, lookup and resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FingerprintError {
    /// Depth bound below zero, rejected at the call boundary.
    #[error("Invalid depth: {0} (must be >= 0)")]
    InvalidDepth(i64),

    /// A selector or lookup matched nothing.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A path could not be re-walked against the tree.
    #[error("Unresolvable path {path}: {reason}")]
    UnresolvablePath { path: String, reason: String },

    /// Broken parent chain or dangling node id.
    #[error("Malformed tree at node {node}")]
    MalformedTree { node: NodeId },

    /// Canonical path text could not be parsed.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Canonical fingerprint text could not be parsed.
    #[error("Invalid fingerprint text: {0}")]
    InvalidFingerprint(String),

    /// Key is not present in the index.
    #[error("Key not indexed: {0}")]
    KeyNotFound(String),

    /// Selector syntax not understood by the resolver.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Configuration could not be loaded.
    #[error("Invalid config: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FingerprintError {
    fn from(err: toml::de::Error) -> Self {
        FingerprintError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FingerprintError {
    fn from(err: serde_json::Error) -> Self {
        FingerprintError::InvalidFingerprint(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Validate a caller-supplied depth bound.
pub fn validate_depth(depth: i64) -> Result<usize> {
    if depth < 0 {
        return Err(FingerprintError::InvalidDepth(depth));
    }
    usize::try_from(depth).map_err(|_| FingerprintError::InvalidDepth(depth))
}
