//! NIF surface for `Elixir.WebLeaf.Native`
//!
//! Documents are parsed once into a [`DocumentResource`]; every other call
//! works against that read-only snapshot.

use crate::config::FingerprintConfig;
use crate::dom::Document;
use crate::error::validate_depth;
use crate::fingerprint::{score, Fingerprint};
use crate::resolve::SelectorResolver;
use crate::resource::{DocumentRef, DocumentResource};
use crate::search;
use crate::term::{kind_from_atom, matches_to_tuples, to_nif_error};
use rustler::{Atom, Binary, NifResult, ResourceArc};

// ============================================================================
// Documents
// ============================================================================

/// Parse markup with the default configuration
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(input: Binary<'a>) -> DocumentRef {
    let doc = Document::parse(input.as_slice());
    ResourceArc::new(DocumentResource::new(doc, FingerprintConfig::default()))
}

/// Parse markup with configuration given as TOML
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_with_config<'a>(input: Binary<'a>, config: &str) -> NifResult<DocumentRef> {
    let config = FingerprintConfig::from_toml(config).map_err(to_nif_error)?;
    let doc = Document::parse(input.as_slice());
    Ok(ResourceArc::new(DocumentResource::new(doc, config)))
}

// ============================================================================
// Fingerprints
// ============================================================================

/// Fingerprint text of the first node matching `selector`
#[rustler::nif]
fn fingerprint(doc_ref: DocumentRef, selector: &str, depth: i64, kind: Atom) -> NifResult<String> {
    let node = doc_ref
        .resolver
        .resolve(&doc_ref.doc, selector)
        .map_err(to_nif_error)?;
    fingerprint_node(&doc_ref, node, depth, kind)
}

/// Fingerprint text of a node id
#[rustler::nif]
fn fingerprint_at(doc_ref: DocumentRef, node_id: u32, depth: i64, kind: Atom) -> NifResult<String> {
    fingerprint_node(&doc_ref, node_id, depth, kind)
}

fn fingerprint_node(doc: &DocumentResource, node: u32, depth: i64, kind: Atom) -> NifResult<String> {
    let depth = validate_depth(depth).map_err(to_nif_error)?;
    let kind = kind_from_atom(kind)?;
    doc.fingerprinter()
        .build(node, depth, kind)
        .map(|fp| fp.to_text())
        .map_err(to_nif_error)
}

/// Similarity of two fingerprint texts
#[rustler::nif]
fn compare(a: &str, b: &str) -> NifResult<f64> {
    let a = Fingerprint::from_text(a).map_err(to_nif_error)?;
    let b = Fingerprint::from_text(b).map_err(to_nif_error)?;
    Ok(score(&a, &b))
}

// ============================================================================
// Search
// ============================================================================

/// Best match for a fingerprint text as `{node_id, path, score}`
#[rustler::nif(schedule = "DirtyCpu")]
fn find_best_match(
    doc_ref: DocumentRef,
    fingerprint: &str,
    depth: i64,
) -> NifResult<(u32, Option<String>, f64)> {
    let target = Fingerprint::from_text(fingerprint).map_err(to_nif_error)?;
    let depth = validate_depth(depth).map_err(to_nif_error)?;
    let best = search::find_best_match(&target, &doc_ref.fingerprinter(), depth).map_err(to_nif_error)?;
    Ok((best.node, doc_ref.doc.node_path(best.node), best.score))
}

/// Up to `n` matches, best first
#[rustler::nif(schedule = "DirtyCpu")]
fn find_top_n(
    doc_ref: DocumentRef,
    fingerprint: &str,
    depth: i64,
    n: usize,
) -> NifResult<Vec<(u32, Option<String>, f64)>> {
    let target = Fingerprint::from_text(fingerprint).map_err(to_nif_error)?;
    let depth = validate_depth(depth).map_err(to_nif_error)?;
    let top = search::find_top_n(&target, &doc_ref.fingerprinter(), depth, n);
    Ok(matches_to_tuples(&doc_ref.doc, &top))
}

// ============================================================================
// Index
// ============================================================================

/// Every index key with its node ids
#[rustler::nif(schedule = "DirtyCpu")]
fn index_keys(doc_ref: DocumentRef, depth: i64) -> NifResult<Vec<(String, Vec<u32>)>> {
    let depth = validate_depth(depth).map_err(to_nif_error)?;
    let index = doc_ref.index(depth);
    Ok(index
        .entries()
        .map(|(key, entry)| (key.to_string(), entry.nodes.clone()))
        .collect())
}

/// Keys similar to `key`; a negative ratio falls back to the configured one
#[rustler::nif(schedule = "DirtyCpu")]
fn find_similar(doc_ref: DocumentRef, depth: i64, key: &str, ratio: f64) -> NifResult<Vec<String>> {
    let depth = validate_depth(depth).map_err(to_nif_error)?;
    let ratio = if ratio < 0.0 { doc_ref.config.similarity_ratio } else { ratio };
    let index = doc_ref.index(depth);
    let similar = index.find_similar(key, ratio).map_err(to_nif_error)?;
    Ok(similar.map(str::to_string).collect())
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.WebLeaf.Native");
