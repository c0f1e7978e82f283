//! Elixir Term Conversion Utilities
//!
//! Errors become `{:error, {reason, message}}`; fingerprint kinds travel as
//! atoms.

use crate::dom::Document;
use crate::error::FingerprintError;
use crate::fingerprint::FingerprintKind;
use crate::search::Match;
use rustler::Atom;

rustler::atoms! {
    paths,
    detailed,
    invalid_depth,
    node_not_found,
    unresolvable_path,
    malformed_tree,
    invalid_path,
    invalid_fingerprint,
    key_not_found,
    invalid_selector,
    invalid_config,
    invalid_kind,
}

/// Reason atom for an error
pub fn error_reason(err: &FingerprintError) -> Atom {
    match err {
        FingerprintError::InvalidDepth(_) => invalid_depth(),
        FingerprintError::NodeNotFound(_) => node_not_found(),
        FingerprintError::UnresolvablePath { .. } => unresolvable_path(),
        FingerprintError::MalformedTree { .. } => malformed_tree(),
        FingerprintError::InvalidPath(_) => invalid_path(),
        FingerprintError::InvalidFingerprint(_) => invalid_fingerprint(),
        FingerprintError::KeyNotFound(_) => key_not_found(),
        FingerprintError::InvalidSelector(_) => invalid_selector(),
        FingerprintError::Config(_) => invalid_config(),
    }
}

/// Raise-free NIF error carrying `{reason, message}`
pub fn to_nif_error(err: FingerprintError) -> rustler::Error {
    rustler::Error::Term(Box::new((error_reason(&err), err.to_string())))
}

pub fn kind_from_atom(kind: Atom) -> Result<FingerprintKind, rustler::Error> {
    if kind == paths() {
        Ok(FingerprintKind::Paths)
    } else if kind == detailed() {
        Ok(FingerprintKind::Detailed)
    } else {
        Err(rustler::Error::Term(Box::new(invalid_kind())))
    }
}

/// `{node_id, location_path, score}` per match
pub fn matches_to_tuples(doc: &Document, matches: &[Match]) -> Vec<(u32, Option<String>, f64)> {
    matches
        .iter()
        .map(|m| (m.node, doc.node_path(m.node), m.score))
        .collect()
}
