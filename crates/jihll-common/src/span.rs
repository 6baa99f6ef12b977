//! Byte spans.

use std::fmt;
use std::ops::Range;

/// A half-open byte range `[start, end)` into a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// An empty span at `pos`.
    #[inline]
    pub const fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_to() {
        let a = Span::new(4, 7);
        let b = Span::new(1, 5);
        assert_eq!(a.to(&b), Span::new(1, 7));
        assert_eq!(b.to(&a), Span::new(1, 7));
    }

    #[test]
    fn test_point_is_empty() {
        let p = Span::point(3);
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert_eq!(Span::new(2, 6).len(), 4);
    }
}
