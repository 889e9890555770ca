// Copyright 2016 The Fancy Regex Authors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

/*!
Exhaustive, indexable enumeration of the strings matched by a regular
expression.

Where the [regex](https://crates.io/crates/regex) crate answers "does this
text match?", this crate answers "what is the complete, ordered set of
strings this pattern matches, and can I jump straight to string number N
without enumerating the first N-1?" Patterns are always matched end-to-end
(full-match semantics, as if wrapped in `^...$`); lookaround and general
backreferences are not supported, since the underlying algebra has no place
to put them.

# Usage

```rust
use matchspace::{AllStrings, RegexOptions};

let options = RegexOptions::default();
let all = AllStrings::new(r"foo|ba[rz]", &options).unwrap();
assert_eq!(all.len(), 3u32.into());
let strings: Vec<_> = all.iter().collect();
assert_eq!(strings, vec!["foo", "bar", "baz"]);
```

Cardinalities can be astronomically large — `a{0,65535}` already has 65536
members — so [`AllStrings::len`] and the argument to [`AllStrings::get`] are
arbitrary-precision (`num_bigint::BigUint`/`BigInt`), not `usize`.
*/

extern crate bit_set;
extern crate num_bigint;
extern crate num_traits;

#[cfg(test)]
#[macro_use]
extern crate matches;
#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate rand;

use std::collections::HashMap;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

pub mod ast;
pub mod charclass;
pub mod compile;
pub mod error;
pub mod parse;
pub mod space;

pub use crate::ast::Ast;
pub use crate::charclass::CharClass;
pub use crate::error::Error;
use crate::space::MatchSpace;

pub type Result<T> = error::Result<T>;

/// Configuration accepted by [`AllStrings::new`] / [`AllMatches::new`]
/// (spec.md §6): the alphabet for `.` and complemented classes, the finite
/// substitute for unbounded repetition, and the regex flags the parser
/// shapes literals and classes around.
#[derive(Debug, Clone)]
pub struct RegexOptions {
    charset: CharClass,
    max_count: u32,
    case_insensitive: bool,
    dot_matches_new_line: bool,
}

impl Default for RegexOptions {
    fn default() -> Self {
        RegexOptions {
            charset: CharClass::default_alphabet(),
            max_count: 0xFFFF,
            case_insensitive: false,
            dot_matches_new_line: false,
        }
    }
}

impl RegexOptions {
    pub fn charset(&self) -> &CharClass {
        &self.charset
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn dot_matches_new_line(&self) -> bool {
        self.dot_matches_new_line
    }
}

/// Builder for [`RegexOptions`].
#[derive(Debug, Clone)]
pub struct RegexOptionsBuilder {
    opts: RegexOptions,
}

impl RegexOptionsBuilder {
    pub fn new() -> Self {
        RegexOptionsBuilder {
            opts: RegexOptions::default(),
        }
    }

    /// Sets the alphabet Σ used for `.` and for complemented classes.
    /// Default: the 256 byte values `0x00..=0xFF`.
    pub fn charset(&mut self, charset: CharClass) -> &mut Self {
        self.opts.charset = charset;
        self
    }

    /// The finite substitute for unbounded repetition: `*` compiles as
    /// `{0, max_count}`, `+` as `{1, max_count}`. Default: `0xFFFF`.
    pub fn max_count(&mut self, max_count: u32) -> &mut Self {
        self.opts.max_count = max_count;
        self
    }

    pub fn case_insensitive(&mut self, value: bool) -> &mut Self {
        self.opts.case_insensitive = value;
        self
    }

    pub fn dot_matches_new_line(&mut self, value: bool) -> &mut Self {
        self.opts.dot_matches_new_line = value;
        self
    }

    pub fn build(&self) -> RegexOptions {
        self.opts.clone()
    }
}

impl Default for RegexOptionsBuilder {
    fn default() -> Self {
        RegexOptionsBuilder::new()
    }
}

fn compile_pattern(pattern: &str, options: &RegexOptions) -> Result<(MatchSpace, u32)> {
    let (ast, n_groups) = parse::parse(pattern, options)?;
    let space = compile::compile(&ast, options)?;
    Ok((space, n_groups))
}

fn normalize_index(i: BigInt, length: &BigUint) -> Result<BigUint> {
    let length_signed = BigInt::from(length.clone());
    let mut idx = i;
    if idx.is_negative() {
        idx += &length_signed;
    }
    if idx.is_negative() || idx >= length_signed {
        return Err(Error::IndexOutOfRange);
    }
    Ok(idx.to_biguint().expect("idx is non-negative by construction"))
}

/// A sequence-like facade over the strings a compiled pattern matches
/// (spec.md §4.8/§6, component H).
pub struct AllStrings {
    pattern: String,
    root: MatchSpace,
}

impl AllStrings {
    pub fn new(pattern: &str, options: &RegexOptions) -> Result<AllStrings> {
        let (root, _n_groups) = compile_pattern(pattern, options)?;
        Ok(AllStrings {
            pattern: pattern.to_string(),
            root,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Total cardinality, as an arbitrary-precision natural.
    pub fn len(&self) -> BigUint {
        self.root.length().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.root.length().is_zero()
    }

    /// The `i`-th string in canonical enumeration order. Negative indices
    /// are normalized to `length + i`; out-of-range indices signal
    /// `Error::IndexOutOfRange`.
    pub fn get<I: Into<BigInt>>(&self, i: I) -> Result<String> {
        let idx = normalize_index(i.into(), self.root.length())?;
        let mut groups = space::Captures::new();
        Ok(self.root.get(&idx, &mut groups).0)
    }

    /// Full-match membership test.
    pub fn contains(&self, s: &str) -> bool {
        self.root.contains(s)
    }

    /// A lazy view over `start..end` that calls `get` on demand. `end` is
    /// clamped to `length()`, the same bound `iter()` already applies, so a
    /// caller-supplied `end` past the end of the space stops at the last
    /// valid index rather than reaching into `get`'s unchecked index space.
    pub fn slice(&self, start: BigUint, end: BigUint) -> Slice<'_> {
        let length = self.root.length();
        let end = if &end > length { length.clone() } else { end };
        Slice {
            space: &self.root,
            next: start,
            end,
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            space: &self.root,
            next: BigUint::zero(),
            length: self.root.length().clone(),
        }
    }
}

impl fmt::Debug for AllStrings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AllStrings({})", self.pattern)
    }
}

impl<'a> IntoIterator for &'a AllStrings {
    type Item = String;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator yielding strings in index order, `0..length` (spec.md §4.8).
pub struct Iter<'a> {
    space: &'a MatchSpace,
    next: BigUint,
    length: BigUint,
}

impl<'a> Iterator for Iter<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.length {
            return None;
        }
        let mut groups = space::Captures::new();
        let (s, _) = self.space.get(&self.next, &mut groups);
        self.next += BigUint::from(1u32);
        Some(s)
    }
}

/// Lazy view over a sub-range of an [`AllStrings`]/[`AllMatches`], built by
/// `slice` (spec.md §4.8: "slicing yields a lazy view that calls get on
/// demand").
pub struct Slice<'a> {
    space: &'a MatchSpace,
    next: BigUint,
    end: BigUint,
}

impl<'a> Iterator for Slice<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.end {
            return None;
        }
        let mut groups = space::Captures::new();
        let (s, _) = self.space.get(&self.next, &mut groups);
        self.next += BigUint::from(1u32);
        Some(s)
    }
}

/// A single produced string together with its capturing-group spans
/// (spec.md §4.8: "AllMatches is identical but get(i) returns a match
/// object").
#[derive(Debug, Clone)]
pub struct Match {
    text: String,
    spans: HashMap<u32, (usize, usize)>,
    n_groups: u32,
}

impl Match {
    /// `group(0)` is the full string; `group(k)` is the 1-indexed
    /// capturing group's substring, or `None` if that group didn't
    /// participate in this particular string (e.g. an unmatched
    /// alternative).
    pub fn group(&self, k: u32) -> Option<&str> {
        if k == 0 {
            return Some(&self.text);
        }
        self.spans.get(&k).map(|&(s, e)| &self.text[s..e])
    }

    /// All capturing groups, in source order.
    pub fn groups(&self) -> Vec<Option<&str>> {
        (1..=self.n_groups).map(|k| self.group(k)).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A sequence-like facade over the match objects a compiled pattern
/// produces; identical to [`AllStrings`] except `get`/iteration yield
/// [`Match`] values carrying per-group captures.
pub struct AllMatches {
    pattern: String,
    root: MatchSpace,
    n_groups: u32,
}

impl AllMatches {
    pub fn new(pattern: &str, options: &RegexOptions) -> Result<AllMatches> {
        let (root, n_groups) = compile_pattern(pattern, options)?;
        Ok(AllMatches {
            pattern: pattern.to_string(),
            root,
            n_groups,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn len(&self) -> BigUint {
        self.root.length().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.root.length().is_zero()
    }

    pub fn get<I: Into<BigInt>>(&self, i: I) -> Result<Match> {
        let idx = normalize_index(i.into(), self.root.length())?;
        let mut groups = space::Captures::new();
        let (text, spans) = self.root.get(&idx, &mut groups);
        let spans = spans.into_iter().map(|(id, s, e)| (id, (s, e))).collect();
        Ok(Match {
            text,
            spans,
            n_groups: self.n_groups,
        })
    }

    pub fn contains(&self, s: &str) -> bool {
        self.root.contains(s)
    }

    pub fn iter(&self) -> MatchIter<'_> {
        MatchIter {
            space: &self.root,
            next: BigUint::zero(),
            length: self.root.length().clone(),
            n_groups: self.n_groups,
        }
    }
}

impl fmt::Debug for AllMatches {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AllMatches({})", self.pattern)
    }
}

impl<'a> IntoIterator for &'a AllMatches {
    type Item = Match;
    type IntoIter = MatchIter<'a>;

    fn into_iter(self) -> MatchIter<'a> {
        self.iter()
    }
}

pub struct MatchIter<'a> {
    space: &'a MatchSpace,
    next: BigUint,
    length: BigUint,
    n_groups: u32,
}

impl<'a> Iterator for MatchIter<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.next >= self.length {
            return None;
        }
        let mut groups = space::Captures::new();
        let (text, spans) = self.space.get(&self.next, &mut groups);
        self.next += BigUint::from(1u32);
        let spans = spans.into_iter().map(|(id, s, e)| (id, (s, e))).collect();
        Some(Match {
            text,
            spans,
            n_groups: self.n_groups,
        })
    }
}
