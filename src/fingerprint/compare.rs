//! Depth-weighted fingerprint similarity
//!
//! Differences close to the anchor cost more than distant ones. Paths are
//! visited in canonical order on both sides, so `score(a, b)` and
//! `score(b, a)` accumulate the same terms in the same order and agree
//! bit for bit.

use super::path::Path;
use super::{Fingerprint, Neighbor};
use std::collections::{BTreeMap, BTreeSet};

/// Penalty for a path present on one side only
const MISSING_SEVERITY: f64 = 1.0;
/// Penalty for each differing field of a shared path
const FIELD_SEVERITY: f64 = 0.5;

/// Similarity in `[0, 1]`; `1.0` for identical fingerprints
pub fn score(a: &Fingerprint, b: &Fingerprint) -> f64 {
    match (a, b) {
        (Fingerprint::Detailed(a), Fingerprint::Detailed(b)) => weighted(a, b),
        (Fingerprint::Paths(a), Fingerprint::Paths(b)) => light(a, b),
        _ => {
            let (a, b) = (paths_of(a), paths_of(b));
            light(&a, &b)
        }
    }
}

fn paths_of(fp: &Fingerprint) -> BTreeSet<Path> {
    fp.paths().cloned().collect()
}

#[inline]
fn weight(path: &Path) -> f64 {
    0.25f64.powi(path.depth() as i32 + 1)
}

fn weighted(a: &BTreeMap<Path, Neighbor>, b: &BTreeMap<Path, Neighbor>) -> f64 {
    let union: BTreeSet<&Path> = a.keys().chain(b.keys()).collect();

    let mut similarity = 1.0;
    for path in union {
        let severity = match (a.get(path), b.get(path)) {
            (Some(x), Some(y)) => {
                let mut s = 0.0;
                if x.tag != y.tag {
                    s += FIELD_SEVERITY;
                }
                if x.text != y.text {
                    s += FIELD_SEVERITY;
                }
                s
            }
            _ => MISSING_SEVERITY,
        };
        if severity > 0.0 {
            similarity -= severity * weight(path);
        }
    }
    similarity.clamp(0.0, 1.0)
}

fn light(a: &BTreeSet<Path>, b: &BTreeSet<Path>) -> f64 {
    a.symmetric_difference(b)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .fold(1.0, |similarity, path| {
            similarity * (1.0 - 0.5f64.powi(path.depth() as i32))
        })
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerprintConfig;
    use crate::dom::Document;
    use crate::fingerprint::{FingerprintKind, Fingerprinter};
    use crate::test_fixtures::{find_all, CARDS_HTML};

    fn fp(text: &str) -> Fingerprint {
        Fingerprint::from_text(text).unwrap()
    }

    fn detailed(entries: &[(&str, &str, &str)]) -> Fingerprint {
        Fingerprint::Detailed(
            entries
                .iter()
                .map(|&(p, tag, text)| {
                    (
                        p.parse().unwrap(),
                        Neighbor { tag: tag.to_string(), text: text.to_string() },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_reflexive() {
        let a = fp("0.1 0.3.1 0.3.2");
        assert_eq!(score(&a, &a), 1.0);
        let d = detailed(&[("0.1", "h3", "Title"), ("1", "b", "x")]);
        assert_eq!(score(&d, &d), 1.0);
    }

    #[test]
    fn test_empty_fingerprints() {
        let empty = fp("");
        assert_eq!(score(&empty, &empty), 1.0);
        let one = fp("0.1");
        let s = score(&empty, &one);
        assert!((s - 0.75).abs() < 1e-12);
        assert_eq!(score(&one, &empty), s);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (fp("0.1 0.3.1 1"), fp("0.2 0.3.1 0.0.4.1")),
            (fp("1 2 3"), fp("")),
        ];
        for (a, b) in &pairs {
            assert_eq!(score(a, b).to_bits(), score(b, a).to_bits());
        }

        let a = detailed(&[("0.1", "h3", "One"), ("0.3.1", "a", "more"), ("1", "b", "x")]);
        let b = detailed(&[("0.1", "h3", "Two"), ("0.3.2", "span", "date"), ("1", "i", "y")]);
        assert_eq!(score(&a, &b).to_bits(), score(&b, &a).to_bits());
        assert_eq!(score(&a, &fp("0.1")).to_bits(), score(&fp("0.1"), &a).to_bits());
    }

    #[test]
    fn test_weighted_penalties() {
        let a = detailed(&[("1", "b", "x")]);
        let same_tag = detailed(&[("1", "b", "y")]);
        let both_differ = detailed(&[("1", "i", "y")]);
        let missing = detailed(&[]);

        // w = 4^-2 for a one-step path
        assert!((score(&a, &same_tag) - (1.0 - 0.5 / 16.0)).abs() < 1e-12);
        assert!((score(&a, &both_differ) - (1.0 - 1.0 / 16.0)).abs() < 1e-12);
        assert!((score(&a, &missing) - (1.0 - 1.0 / 16.0)).abs() < 1e-12);
    }

    #[test]
    fn test_deeper_differences_cost_less() {
        let base = fp("1");
        let near = fp("1 2");
        let far = fp("1 0.0.2");
        assert!(score(&base, &near) < score(&base, &far));
    }

    #[test]
    fn test_decreasing_in_difference() {
        let base = fp("0.1");
        let mut previous = 1.0;
        for extra in 1..=6 {
            let mut text = String::from("0.1");
            for i in 1..=extra {
                text.push_str(&format!(" 0.2.{}", i));
            }
            let s = score(&base, &fp(&text));
            assert!(s < previous);
            assert!(s >= 0.0);
            previous = s;
        }
    }

    #[test]
    fn test_weighted_clamps_at_zero() {
        let many: Vec<(String, &str, &str)> =
            (1..=40).map(|i| (i.to_string(), "b", "x")).collect();
        let entries: Vec<(&str, &str, &str)> =
            many.iter().map(|(p, t, x)| (p.as_str(), *t, *x)).collect();
        let a = detailed(&entries);
        let b = detailed(&[]);
        assert_eq!(score(&a, &b), 0.0);
    }

    #[test]
    fn test_mixed_kinds_use_paths() {
        let d = detailed(&[("0.1", "h3", "One"), ("0.3.1", "a", "more")]);
        let p = fp("0.1 0.3.1");
        assert_eq!(score(&d, &p), 1.0);
        assert_eq!(score(&p, &d), 1.0);
    }

    #[test]
    fn test_three_cards() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let fingerprinter = Fingerprinter::new(&doc, &config);
        let build = |id| fingerprinter.build(id, 3, FingerprintKind::Paths).unwrap();

        let descriptions: Vec<Fingerprint> = find_all(&doc, "p").into_iter().map(build).collect();
        assert_eq!(descriptions.len(), 3);
        for f in &descriptions {
            assert_eq!(f.to_text(), "0.1 0.3.1 0.3.2");
        }
        assert_eq!(score(&descriptions[0], &descriptions[1]), 1.0);
        assert_eq!(score(&descriptions[1], &descriptions[2]), 1.0);

        let date = build(find_all(&doc, "span")[0]);
        assert!(score(&descriptions[0], &date) < 0.9);
    }

    #[test]
    fn test_discrimination_and_template_similarity() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let fingerprinter = Fingerprinter::new(&doc, &config);
        let build = |id| fingerprinter.build(id, 3, FingerprintKind::Detailed).unwrap();

        let titles: Vec<Fingerprint> = find_all(&doc, "h3").into_iter().map(build).collect();
        let links: Vec<Fingerprint> = find_all(&doc, "a").into_iter().map(build).collect();

        // same template position, different wording
        assert!(score(&titles[0], &titles[1]) > 0.9);
        assert!(score(&titles[0], &titles[1]) < 1.0);
        // different positions inside one card
        assert!(score(&titles[0], &links[0]) < 1.0);
    }
}
