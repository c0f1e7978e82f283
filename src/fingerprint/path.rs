//! Relative paths from an anchor node.
//!
//! Canonical text renders `Up` as `0` and `Down(n)` as `n`, joined by `.`.
//! While a path is still climbing, `Down(n)` moves sideways to the sibling at
//! position `n`; after that every `Down(n)` takes the n-th child. So `0.3.1`
//! is "parent, the parent's sibling at position 3, its first child".

use crate::error::FingerprintError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One move away from the current node.
///
/// Ordering puts `Up` before every `Down`, and `Down` by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Up,
    /// 1-based position among the parent's element children
    Down(u32),
}

/// Sequence of steps from an anchor. Ordered lexicographically by step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<Step>);

impl Path {
    /// The empty path (the anchor itself)
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Path(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps
    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True while the walk is still climbing: empty, or last step is `Up`
    #[inline]
    pub fn is_going_up(&self) -> bool {
        matches!(self.0.last(), None | Some(Step::Up))
    }

    /// This path extended by one step
    pub fn child(&self, step: Step) -> Path {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(step);
        Path(steps)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Up => f.write_str("0"),
            Step::Down(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = FingerprintError;

    /// Parse canonical text. The empty path has no text form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FingerprintError::InvalidPath("empty path".to_string()));
        }
        s.split('.')
            .map(|token| match token.parse::<u32>() {
                // only the canonical rendering: no sign, no leading zeros
                Ok(n) if n.to_string() != token => Err(FingerprintError::InvalidPath(s.to_string())),
                Ok(0) => Ok(Step::Up),
                Ok(n) => Ok(Step::Down(n)),
                Err(_) => Err(FingerprintError::InvalidPath(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
