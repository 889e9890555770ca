//! Component A: sets of code points, with cardinality and indexed access.
//!
//! A `CharClass` is an ordered, deduplicated set of code point ranges. It
//! backs the "any" metacharacter, `[...]` classes, and the digit/word/space
//! escapes once they've been intersected or complemented against the
//! configured alphabet.

use num_bigint::BigUint;
use num_traits::Zero;

const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// An ordered set of code points, represented as merged inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
}

impl CharClass {
    /// Builds a class from a set of (possibly overlapping, unsorted)
    /// inclusive code point ranges, merging and deduplicating them.
    pub fn from_ranges(ranges: Vec<(u32, u32)>) -> Self {
        let split = ranges.into_iter().flat_map(Self::split_surrogates).collect();
        CharClass {
            ranges: Self::normalize(split),
        }
    }

    /// A class containing a single code point.
    pub fn single(cp: u32) -> Self {
        CharClass::from_ranges(vec![(cp, cp)])
    }

    /// An empty class: length 0, matches nothing.
    pub fn empty() -> Self {
        CharClass { ranges: Vec::new() }
    }

    /// `\d`: the ASCII digits.
    pub fn digit() -> Self {
        CharClass::from_ranges(vec![('0' as u32, '9' as u32)])
    }

    /// `\w`: word characters (alphanumeric plus underscore).
    pub fn word() -> Self {
        CharClass::from_ranges(vec![
            ('a' as u32, 'z' as u32),
            ('A' as u32, 'Z' as u32),
            ('0' as u32, '9' as u32),
            ('_' as u32, '_' as u32),
        ])
    }

    /// `\s`: whitespace (space, tab, newline, CR, vertical tab, form feed).
    pub fn space() -> Self {
        CharClass::from_ranges(vec![
            (' ' as u32, ' ' as u32),
            ('\t' as u32, '\t' as u32),
            ('\n' as u32, '\n' as u32),
            ('\r' as u32, '\r' as u32),
            (0x0B, 0x0B),
            (0x0C, 0x0C),
        ])
    }

    /// The default alphabet: the 256 byte values `0x00..=0xFF`.
    pub fn default_alphabet() -> Self {
        CharClass::from_ranges(vec![(0x00, 0xFF)])
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Cardinality of this class, as an arbitrary-precision natural.
    pub fn len(&self) -> BigUint {
        let mut total = BigUint::zero();
        for &(s, e) in &self.ranges {
            total += BigUint::from((e - s + 1) as u64);
        }
        total
    }

    /// The `i`-th code point in ascending order, or `None` if out of range.
    ///
    /// `i` is a plain `usize` because a single `CharClass`'s cardinality is
    /// bounded by the size of the configured alphabet, never by the
    /// cardinality of an enclosing repetition or concatenation.
    pub fn nth(&self, mut i: usize) -> Option<char> {
        for &(s, e) in &self.ranges {
            let count = (e - s + 1) as usize;
            if i < count {
                return char::from_u32(s + i as u32);
            }
            i -= count;
        }
        None
    }

    pub fn contains_char(&self, c: char) -> bool {
        let cp = c as u32;
        self.ranges
            .binary_search_by(|&(s, e)| {
                if cp < s {
                    std::cmp::Ordering::Greater
                } else if cp > e {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Set intersection.
    pub fn intersect(&self, other: &CharClass) -> CharClass {
        let mut out = Vec::new();
        for &(s1, e1) in &self.ranges {
            for &(s2, e2) in &other.ranges {
                let s = s1.max(s2);
                let e = e1.min(e2);
                if s <= e {
                    out.push((s, e));
                }
            }
        }
        CharClass {
            ranges: Self::normalize(out),
        }
    }

    /// Set difference: code points in `self` but not in `other`.
    pub fn subtract(&self, other: &CharClass) -> CharClass {
        let mut pieces = self.ranges.clone();
        for &(os, oe) in &other.ranges {
            let mut next = Vec::new();
            for (s, e) in pieces {
                if oe < s || os > e {
                    next.push((s, e));
                    continue;
                }
                if os > s {
                    next.push((s, os - 1));
                }
                if oe < e {
                    next.push((oe + 1, e));
                }
            }
            pieces = next;
        }
        CharClass {
            ranges: Self::normalize(pieces),
        }
    }

    /// The complement of `self` relative to `alphabet`.
    pub fn complement(&self, alphabet: &CharClass) -> CharClass {
        alphabet.subtract(self)
    }

    fn split_surrogates((s, e): (u32, u32)) -> Vec<(u32, u32)> {
        if e < SURROGATE_LO || s > SURROGATE_HI {
            return vec![(s, e)];
        }
        let mut out = Vec::new();
        if s < SURROGATE_LO {
            out.push((s, SURROGATE_LO - 1));
        }
        if e > SURROGATE_HI {
            out.push((SURROGATE_HI + 1, e));
        }
        out
    }

    fn normalize(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
        ranges.retain(|&(s, e)| s <= e);
        ranges.sort();
        let mut merged: Vec<(u32, u32)> = Vec::new();
        for (s, e) in ranges {
            if let Some(last) = merged.last_mut() {
                if s <= last.1.saturating_add(1) {
                    if e > last.1 {
                        last.1 = e;
                    }
                    continue;
                }
            }
            merged.push((s, e));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_class_has_ten_members() {
        let d = CharClass::digit();
        assert_eq!(d.len(), BigUint::from(10u32));
        assert_eq!(d.nth(0), Some('0'));
        assert_eq!(d.nth(9), Some('9'));
        assert_eq!(d.nth(10), None);
    }

    #[test]
    fn overlapping_ranges_merge() {
        let c = CharClass::from_ranges(vec![('a' as u32, 'c' as u32), ('b' as u32, 'e' as u32)]);
        assert_eq!(c.len(), BigUint::from(5u32));
        assert!(c.contains_char('a'));
        assert!(c.contains_char('e'));
        assert!(!c.contains_char('f'));
    }

    #[test]
    fn complement_against_small_alphabet() {
        let alphabet = CharClass::from_ranges(vec![('a' as u32, 'c' as u32)]);
        let just_b = CharClass::single('b' as u32);
        let complement = just_b.complement(&alphabet);
        assert_eq!(complement.len(), BigUint::from(2u32));
        assert!(complement.contains_char('a'));
        assert!(complement.contains_char('c'));
        assert!(!complement.contains_char('b'));
    }

    #[test]
    fn empty_class_has_zero_length() {
        assert!(CharClass::empty().len().is_zero());
        assert_eq!(CharClass::empty().nth(0), None);
    }

    #[test]
    fn charset_override_example() {
        // S8-adjacent invariant: with charset="ab", "." enumerates "a","b".
        let charset = CharClass::from_ranges(vec![('a' as u32, 'a' as u32), ('b' as u32, 'b' as u32)]);
        assert_eq!(charset.len(), BigUint::from(2u32));
        assert_eq!(charset.nth(0), Some('a'));
        assert_eq!(charset.nth(1), Some('b'));
    }
}
