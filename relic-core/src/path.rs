//! Canonicalization of raw request/pattern paths into segment sequences.
use std::fmt;

/// An immutable, canonicalized path: a sequence of non-empty segments.
///
/// Two paths that differ only in slashing (`/a//b/` vs `a/b` vs `/a/b`)
/// normalize to the same segment sequence and therefore compare and hash
/// equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    segments: Vec<String>,
}

impl NormalizedPath {
    /// Canonicalize a raw path string: collapse runs of `/`, drop leading
    /// and trailing `/`. Both `/` and `""` yield the empty segment sequence.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let segments = raw
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self { segments }
    }

    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a `NormalizedPath` directly from already-split segments (e.g.
    /// a sub-slice of another path's segments). Does not re-validate that
    /// segments are non-empty; callers own that invariant.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The suffix of segments starting at `from`, as a fresh `NormalizedPath`.
    pub fn suffix(&self, from: usize) -> NormalizedPath {
        NormalizedPath {
            segments: self.segments[from.min(self.segments.len())..].to_vec(),
        }
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            f.write_str("/")?;
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for NormalizedPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NormalizedPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl std::str::FromStr for NormalizedPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
