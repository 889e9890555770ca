//! Components B–F: the match-space algebra.
//!
//! A `MatchSpace` is an immutable, indexed, countable sequence of strings.
//! Every node caches its own cardinality at construction time so that
//! `length()` never re-walks the tree; all index arithmetic is done in
//! `BigUint` since cardinalities routinely exceed any fixed-width integer
//! (spec: "lengths routinely exceed 2^400").

use std::collections::HashMap;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::charclass::CharClass;

/// Capture state threaded through a single `get`/`contains` call: group id
/// to the substring captured for it so far. Discarded once the call
/// returns, except when the facade snapshots it into a `Match`.
pub type Captures = HashMap<u32, String>;

#[derive(Debug)]
enum Kind {
    Literal(String),
    Class(CharClass),
    Concat(Vec<MatchSpace>),
    Branch(Vec<MatchSpace>),
    Repeat {
        inner: Box<MatchSpace>,
        lo: u32,
        hi: u32,
    },
    Group {
        id: u32,
        inner: Box<MatchSpace>,
    },
    Backref {
        id: u32,
    },
}

/// A compiled node of the match-space tree (spec §3).
#[derive(Debug)]
pub struct MatchSpace {
    kind: Kind,
    length: BigUint,
}

/// `base^exp`, by repeated squaring, with the convention `base^0 == 1`
/// (even when `base == 0`).
fn big_pow(base: &BigUint, mut exp: u32) -> BigUint {
    let mut result = BigUint::one();
    let mut b = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &b;
        }
        b = &b * &b;
        exp >>= 1;
    }
    result
}

impl MatchSpace {
    pub fn literal(w: impl Into<String>) -> Self {
        let w = w.into();
        MatchSpace {
            kind: Kind::Literal(w),
            length: BigUint::one(),
        }
    }

    pub fn class(cc: CharClass) -> Self {
        let length = cc.len();
        MatchSpace {
            kind: Kind::Class(cc),
            length,
        }
    }

    pub fn concat(children: Vec<MatchSpace>) -> Self {
        let mut length = BigUint::one();
        for child in &children {
            length *= child.length();
        }
        MatchSpace {
            kind: Kind::Concat(children),
            length,
        }
    }

    pub fn branch(children: Vec<MatchSpace>) -> Self {
        let mut length = BigUint::zero();
        for child in &children {
            length += child.length();
        }
        MatchSpace {
            kind: Kind::Branch(children),
            length,
        }
    }

    pub fn repeat(inner: MatchSpace, lo: u32, hi: u32) -> Self {
        let l = inner.length().clone();
        let mut length = BigUint::zero();
        for k in lo..=hi {
            length += big_pow(&l, k);
        }
        MatchSpace {
            kind: Kind::Repeat {
                inner: Box::new(inner),
                lo,
                hi,
            },
            length,
        }
    }

    pub fn group(id: u32, inner: MatchSpace) -> Self {
        let length = inner.length().clone();
        MatchSpace {
            kind: Kind::Group {
                id,
                inner: Box::new(inner),
            },
            length,
        }
    }

    pub fn backref(id: u32) -> Self {
        MatchSpace {
            kind: Kind::Backref { id },
            length: BigUint::one(),
        }
    }

    pub fn length(&self) -> &BigUint {
        &self.length
    }

    /// The `i`-th string in canonical enumeration order, together with the
    /// `(group_id, start, end)` byte spans it contributed, relative to its
    /// own output. `groups` accumulates captured substrings as `Group`
    /// nodes are visited left to right, so a `Backref` appearing later in
    /// the same call can resolve against it.
    pub fn get(&self, i: &BigUint, groups: &mut Captures) -> (String, Vec<(u32, usize, usize)>) {
        match &self.kind {
            Kind::Literal(w) => (w.clone(), Vec::new()),
            Kind::Class(cc) => {
                let idx = i
                    .to_usize()
                    .expect("CharClass index fits in usize by construction");
                let c = cc.nth(idx).expect("index in range");
                (c.to_string(), Vec::new())
            }
            Kind::Concat(children) => self.get_concat(children, i, groups),
            Kind::Branch(children) => self.get_branch(children, i, groups),
            Kind::Repeat { inner, lo, hi } => self.get_repeat(inner, *lo, *hi, i, groups),
            Kind::Group { id, inner } => {
                let (s, mut spans) = inner.get(i, groups);
                groups.insert(*id, s.clone());
                spans.push((*id, 0, s.len()));
                (s, spans)
            }
            Kind::Backref { id } => {
                let s = groups.get(id).cloned().unwrap_or_default();
                (s, Vec::new())
            }
        }
    }

    fn get_concat(
        &self,
        children: &[MatchSpace],
        i: &BigUint,
        groups: &mut Captures,
    ) -> (String, Vec<(u32, usize, usize)>) {
        let mut remaining = i.clone();
        let mut digits = vec![BigUint::zero(); children.len()];
        for (j, child) in children.iter().enumerate().rev() {
            let l = child.length();
            digits[j] = &remaining % l;
            remaining /= l;
        }
        let mut out = String::new();
        let mut spans = Vec::new();
        for (child, d) in children.iter().zip(digits.iter()) {
            let (s, child_spans) = child.get(d, groups);
            let base = out.len();
            for (id, st, en) in child_spans {
                spans.push((id, st + base, en + base));
            }
            out.push_str(&s);
        }
        (out, spans)
    }

    fn get_branch(
        &self,
        children: &[MatchSpace],
        i: &BigUint,
        groups: &mut Captures,
    ) -> (String, Vec<(u32, usize, usize)>) {
        let mut offset = i.clone();
        for child in children {
            let l = child.length();
            if &offset < l {
                return child.get(&offset, groups);
            }
            offset -= l;
        }
        panic!("index out of range for Branch")
    }

    fn get_repeat(
        &self,
        inner: &MatchSpace,
        lo: u32,
        hi: u32,
        i: &BigUint,
        groups: &mut Captures,
    ) -> (String, Vec<(u32, usize, usize)>) {
        let l = inner.length().clone();
        let mut remaining = i.clone();
        let mut k = lo;
        loop {
            let pk = big_pow(&l, k);
            if remaining < pk || k == hi {
                break;
            }
            remaining -= pk;
            k += 1;
        }
        let mut digits = vec![BigUint::zero(); k as usize];
        for d in digits.iter_mut().rev() {
            if l.is_zero() {
                continue;
            }
            *d = &remaining % &l;
            remaining /= &l;
        }
        let mut out = String::new();
        let mut spans = Vec::new();
        for d in &digits {
            let (s, child_spans) = inner.get(d, groups);
            let base = out.len();
            for (id, st, en) in child_spans {
                spans.push((id, st + base, en + base));
            }
            out.push_str(&s);
        }
        (out, spans)
    }

    /// Full-match membership test (spec §4.3/§4.5/§4.9): a left-to-right
    /// backtracking split that asks each child for every prefix length it
    /// can fullmatch. Each candidate carries its own captures snapshot,
    /// since different splits of the same string can capture different
    /// substrings for the same group.
    pub fn contains(&self, s: &str) -> bool {
        self.match_prefixes(s, &Captures::new())
            .into_iter()
            .any(|(rem, _)| rem.is_empty())
    }

    fn match_prefixes<'a>(&self, s: &'a str, caps: &Captures) -> Vec<(&'a str, Captures)> {
        match &self.kind {
            Kind::Literal(w) => {
                if let Some(rest) = s.strip_prefix(w.as_str()) {
                    vec![(rest, caps.clone())]
                } else {
                    Vec::new()
                }
            }
            Kind::Class(cc) => match s.chars().next() {
                Some(c) if cc.contains_char(c) => vec![(&s[c.len_utf8()..], caps.clone())],
                _ => Vec::new(),
            },
            Kind::Concat(children) => {
                let mut frontier = vec![(s, caps.clone())];
                for child in children {
                    let mut next = Vec::new();
                    for (rem, c) in frontier {
                        next.extend(child.match_prefixes(rem, &c));
                    }
                    frontier = next;
                    if frontier.is_empty() {
                        break;
                    }
                }
                frontier
            }
            Kind::Branch(children) => children
                .iter()
                .flat_map(|child| child.match_prefixes(s, caps))
                .collect(),
            Kind::Repeat { inner, lo, hi } => {
                let mut out = Vec::new();
                let mut frontier = vec![(s, caps.clone())];
                let mut k = 0;
                loop {
                    if k >= *lo {
                        out.extend(frontier.iter().cloned());
                    }
                    if k == *hi || frontier.is_empty() {
                        break;
                    }
                    let mut next = Vec::new();
                    for (rem, c) in &frontier {
                        next.extend(inner.match_prefixes(rem, c));
                    }
                    frontier = next;
                    k += 1;
                }
                out
            }
            Kind::Group { id, inner } => inner
                .match_prefixes(s, caps)
                .into_iter()
                .map(|(rem, mut c)| {
                    let consumed = &s[..s.len() - rem.len()];
                    c.insert(*id, consumed.to_string());
                    (rem, c)
                })
                .collect(),
            Kind::Backref { id } => match caps.get(id) {
                Some(val) if s.starts_with(val.as_str()) => {
                    vec![(&s[val.len()..], caps.clone())]
                }
                _ => Vec::new(),
            },
        }
    }
}
