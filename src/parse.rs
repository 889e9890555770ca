//! Component J (ambient): regex source text → `Ast`.
//!
//! spec.md treats the parser as an external collaborator, described only by
//! the tree shape it hands the core. This module supplies a concrete one so
//! `AllStrings`/`AllMatches` are usable from a plain pattern string, kept
//! deliberately separate from the match-space algebra it feeds.
//!
//! Supported grammar: literals, `.`, `[...]`/`[^...]` classes (with range
//! and `\d \D \w \W \s \S` members), `(...)` / `(?:...)` / `(?P<name>...)` /
//! `(?<name>...)` groups, `|` alternation, `* + ? {m,n} {m,} {m}`
//! repetition, numbered backreferences `\1`.."`\9"` (and beyond), the usual
//! character escapes, and a leading `^`/trailing `$` that together span the
//! whole pattern. Lookaround, inline flag groups, and conditionals are
//! rejected with `Error::UnsupportedConstruct`.

use std::iter::Peekable;
use std::str::Chars;

use crate::ast::Ast;
use crate::error::{Error, Result};
use crate::RegexOptions;

pub struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    group_id: u32,
    options: &'a RegexOptions,
}

/// Parses `pattern` into an `Ast` plus the number of capturing groups it
/// declares.
pub fn parse(pattern: &str, options: &RegexOptions) -> Result<(Ast, u32)> {
    let body = strip_whole_pattern_anchors(pattern);
    let mut parser = Parser {
        chars: body.chars().peekable(),
        group_id: 0,
        options,
    };
    let ast = parser.parse_alternation()?;
    if let Some(c) = parser.chars.peek() {
        return Err(Error::ParseFailure(format!("unexpected trailing '{}'", c)));
    }
    Ok((ast, parser.group_id))
}

/// Absorbs a leading `^` and trailing `$` that together span the whole
/// pattern as a documented no-op (spec §9's Open Question, resolved in
/// DESIGN.md). Any other placement of `^`/`$` is left in the body so the
/// parser emits `Ast::StartText`/`Ast::EndText`, which the compiler rejects.
fn strip_whole_pattern_anchors(pattern: &str) -> &str {
    if pattern.len() >= 2 && pattern.starts_with('^') && pattern.ends_with('$') {
        // Guard against a trailing `$` escaped by a backslash, e.g. `^foo\$`.
        let body = &pattern[1..pattern.len() - 1];
        let trailing_backslashes = body.chars().rev().take_while(|&c| c == '\\').count();
        if trailing_backslashes % 2 == 0 {
            return body;
        }
    }
    pattern
}

impl<'a> Parser<'a> {
    fn parse_alternation(&mut self) -> Result<Ast> {
        let mut branches = vec![self.parse_concat()?];
        while self.eat('|') {
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap())
        } else {
            Ok(Ast::Branch(branches))
        }
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut pieces = Vec::new();
        while let Some(&c) = self.chars.peek() {
            if c == '|' || c == ')' {
                break;
            }
            pieces.push(self.parse_repeat()?);
        }
        Ok(Ast::Concat(merge_literals(pieces)))
    }

    fn parse_repeat(&mut self) -> Result<Ast> {
        let atom = self.parse_atom()?;
        let (lo, hi) = match self.chars.peek() {
            Some('*') => {
                self.chars.next();
                (0, self.options.max_count())
            }
            Some('+') => {
                self.chars.next();
                (1, self.options.max_count())
            }
            Some('?') => {
                self.chars.next();
                (0, 1)
            }
            Some('{') => {
                if let Some((lo, hi)) = self.try_parse_braces()? {
                    (lo, hi)
                } else {
                    return Ok(atom);
                }
            }
            _ => return Ok(atom),
        };
        self.eat('?'); // lazy marker: order is independent of greediness (spec §4.5)
        if lo > hi {
            return Err(Error::ParseFailure(
                "repeat lower bound greater than upper bound".to_string(),
            ));
        }
        Ok(Ast::Repeat {
            child: Box::new(atom),
            lo,
            hi,
        })
    }

    /// Parses `{m,n}` / `{m,}` / `{m}` after a `{` has been peeked (not yet
    /// consumed). Returns `None` (and leaves the stream untouched other
    /// than the lookahead) if what follows isn't a valid quantifier, in
    /// which case the `{` is treated as a literal character, matching
    /// common regex-engine behavior.
    fn try_parse_braces(&mut self) -> Result<Option<(u32, u32)>> {
        let mut lookahead = self.chars.clone();
        lookahead.next(); // consume '{'
        let mut digits = String::new();
        while let Some(&c) = lookahead.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                lookahead.next();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Ok(None);
        }
        let lo: u32 = digits
            .parse()
            .map_err(|_| Error::ParseFailure("repeat count too large".to_string()))?;
        let hi = match lookahead.peek() {
            Some(',') => {
                lookahead.next();
                let mut hi_digits = String::new();
                while let Some(&c) = lookahead.peek() {
                    if c.is_ascii_digit() {
                        hi_digits.push(c);
                        lookahead.next();
                    } else {
                        break;
                    }
                }
                if hi_digits.is_empty() {
                    self.options.max_count()
                } else {
                    hi_digits
                        .parse()
                        .map_err(|_| Error::ParseFailure("repeat count too large".to_string()))?
                }
            }
            _ => lo,
        };
        if lookahead.peek() != Some(&'}') {
            return Ok(None);
        }
        lookahead.next();
        self.chars = lookahead;
        Ok(Some((lo, hi)))
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        match self.chars.next() {
            None => Err(Error::ParseFailure("unexpected end of pattern".to_string())),
            Some('.') => Ok(Ast::Any),
            Some('^') => Ok(Ast::StartText),
            Some('$') => Ok(Ast::EndText),
            Some('[') => self.parse_class(),
            Some('(') => self.parse_group(),
            Some('\\') => self.parse_escape(),
            Some(c) => Ok(literal_char(c, self.options.case_insensitive())),
            #[allow(unreachable_patterns)]
            _ => unreachable!(),
        }
    }

    fn parse_group(&mut self) -> Result<Ast> {
        if self.eat('?') {
            match self.chars.peek().copied() {
                Some(':') => {
                    self.chars.next();
                    let inner = self.parse_alternation()?;
                    self.expect(')')?;
                    Ok(inner)
                }
                Some('P') => {
                    self.chars.next();
                    self.expect('<')?;
                    self.consume_group_name()?;
                    self.parse_named_capture()
                }
                Some('<') => {
                    self.chars.next();
                    match self.chars.peek().copied() {
                        Some('=') | Some('!') => Err(Error::UnsupportedConstruct(
                            "look-behind is not supported".to_string(),
                        )),
                        _ => {
                            self.consume_group_name()?;
                            self.parse_named_capture()
                        }
                    }
                }
                Some('=') | Some('!') => Err(Error::UnsupportedConstruct(
                    "look-ahead is not supported".to_string(),
                )),
                _ => Err(Error::UnsupportedConstruct(
                    "inline flag groups are not supported; use RegexOptions".to_string(),
                )),
            }
        } else {
            self.group_id += 1;
            let id = self.group_id;
            let inner = self.parse_alternation()?;
            self.expect(')')?;
            Ok(Ast::Group {
                id,
                child: Box::new(inner),
            })
        }
    }

    fn parse_named_capture(&mut self) -> Result<Ast> {
        self.group_id += 1;
        let id = self.group_id;
        let inner = self.parse_alternation()?;
        self.expect(')')?;
        Ok(Ast::Group {
            id,
            child: Box::new(inner),
        })
    }

    fn consume_group_name(&mut self) -> Result<String> {
        let mut name = String::new();
        loop {
            match self.chars.next() {
                Some('>') => return Ok(name),
                Some(c) => name.push(c),
                None => {
                    return Err(Error::ParseFailure(
                        "unterminated group name".to_string(),
                    ))
                }
            }
        }
    }

    fn parse_class(&mut self) -> Result<Ast> {
        let negated = self.eat('^');
        let mut ranges = Vec::new();
        let mut first = true;
        loop {
            match self.chars.peek().copied() {
                None => return Err(Error::ParseFailure("unclosed character class".to_string())),
                Some(']') if !first => {
                    self.chars.next();
                    break;
                }
                _ => {
                    first = false;
                    let lo = self.parse_class_member(&mut ranges)?;
                    if let Some(lo) = lo {
                        if self.chars.peek() == Some(&'-') {
                            let mut lookahead = self.chars.clone();
                            lookahead.next();
                            if lookahead.peek() == Some(&']') {
                                ranges.push((lo, lo));
                            } else {
                                self.chars.next();
                                let hi = self
                                    .parse_class_char()?
                                    .ok_or_else(|| Error::InvalidClass("unclosed range".to_string()))?;
                                if hi < lo {
                                    return Err(Error::InvalidClass(
                                        "descending range in character class".to_string(),
                                    ));
                                }
                                ranges.push((lo, hi));
                            }
                        } else {
                            ranges.push((lo, lo));
                        }
                    }
                }
            }
        }
        Ok(Ast::Bracket {
            members: ranges,
            negated,
        })
    }

    /// Parses one member of a character class: either a shorthand escape
    /// (contributing its ranges directly and returning `None`) or a single
    /// character (returned as its code point for possible range use).
    fn parse_class_member(&mut self, ranges: &mut Vec<(u32, u32)>) -> Result<Option<u32>> {
        if self.chars.peek() == Some(&'\\') {
            self.chars.next();
            match self.chars.next() {
                Some('d') => {
                    ranges.extend(shorthand_ranges('d'));
                    Ok(None)
                }
                Some('w') => {
                    ranges.extend(shorthand_ranges('w'));
                    Ok(None)
                }
                Some('s') => {
                    ranges.extend(shorthand_ranges('s'));
                    Ok(None)
                }
                Some(c) => Ok(Some(escape_to_char(c, &mut self.chars)? as u32)),
                None => Err(Error::TrailingBackslash),
            }
        } else {
            self.parse_class_char()
        }
    }

    fn parse_class_char(&mut self) -> Result<Option<u32>> {
        match self.chars.next() {
            None => Ok(None),
            Some('\\') => match self.chars.next() {
                Some(c) => Ok(Some(escape_to_char(c, &mut self.chars)? as u32)),
                None => Err(Error::TrailingBackslash),
            },
            Some(c) => Ok(Some(c as u32)),
        }
    }

    fn parse_escape(&mut self) -> Result<Ast> {
        match self.chars.next() {
            None => Err(Error::TrailingBackslash),
            Some(c @ '1'..='9') => {
                let mut digits = String::new();
                digits.push(c);
                while let Some(&d) = self.chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                let n: u32 = digits
                    .parse()
                    .map_err(|_| Error::InvalidBackref("backreference number too large".to_string()))?;
                Ok(Ast::Backref(n))
            }
            Some('d') => Ok(Ast::Class {
                ranges: shorthand_ranges('d'),
                negated: false,
            }),
            Some('D') => Ok(Ast::Class {
                ranges: shorthand_ranges('d'),
                negated: true,
            }),
            Some('w') => Ok(Ast::Class {
                ranges: shorthand_ranges('w'),
                negated: false,
            }),
            Some('W') => Ok(Ast::Class {
                ranges: shorthand_ranges('w'),
                negated: true,
            }),
            Some('s') => Ok(Ast::Class {
                ranges: shorthand_ranges('s'),
                negated: false,
            }),
            Some('S') => Ok(Ast::Class {
                ranges: shorthand_ranges('s'),
                negated: true,
            }),
            Some(c) => {
                let ch = escape_to_char(c, &mut self.chars)?;
                Ok(literal_char(ch, self.options.case_insensitive()))
            }
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.chars.peek() == Some(&c) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(Error::UnclosedOpenParen)
        }
    }
}

fn shorthand_ranges(which: char) -> Vec<(u32, u32)> {
    match which {
        'd' => vec![('0' as u32, '9' as u32)],
        'w' => vec![
            ('a' as u32, 'z' as u32),
            ('A' as u32, 'Z' as u32),
            ('0' as u32, '9' as u32),
            ('_' as u32, '_' as u32),
        ],
        's' => vec![
            (' ' as u32, ' ' as u32),
            ('\t' as u32, '\t' as u32),
            ('\n' as u32, '\n' as u32),
            ('\r' as u32, '\r' as u32),
            (0x0B, 0x0B),
            (0x0C, 0x0C),
        ],
        _ => unreachable!(),
    }
}

fn escape_to_char(c: char, chars: &mut Peekable<Chars<'_>>) -> Result<char> {
    match c {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '0' => Ok('\0'),
        'x' => {
            let mut hex = String::new();
            for _ in 0..2 {
                match chars.next() {
                    Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                    _ => return Err(Error::InvalidHex),
                }
            }
            let cp = u32::from_str_radix(&hex, 16).map_err(|_| Error::InvalidHex)?;
            char::from_u32(cp).ok_or(Error::InvalidCodepointValue)
        }
        other => Ok(other),
    }
}

fn literal_char(c: char, case_insensitive: bool) -> Ast {
    if case_insensitive {
        let lower: Vec<char> = c.to_lowercase().collect();
        let upper: Vec<char> = c.to_uppercase().collect();
        if lower.len() == 1 && upper.len() == 1 && (lower[0] != c || upper[0] != c) {
            let mut ranges = vec![(lower[0] as u32, lower[0] as u32)];
            ranges.push((upper[0] as u32, upper[0] as u32));
            return Ast::Class {
                ranges,
                negated: false,
            };
        }
    }
    Ast::Literal(c.to_string())
}

/// Merges consecutive plain `Ast::Literal` pieces into one, since the
/// concatenation of two literals is always a literal, independent of any
/// repeat operator (which already wrapped its own atom before this runs).
fn merge_literals(pieces: Vec<Ast>) -> Vec<Ast> {
    let mut out: Vec<Ast> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Ast::Literal(next) = &piece {
            if let Some(Ast::Literal(prev)) = out.last_mut() {
                prev.push_str(next);
                continue;
            }
        }
        out.push(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegexOptionsBuilder;

    fn opts() -> RegexOptions {
        RegexOptionsBuilder::new().build()
    }

    #[test]
    fn parses_literal_concat() {
        let (ast, groups) = parse("foo", &opts()).unwrap();
        assert_eq!(ast, Ast::Concat(vec![Ast::Literal("foo".to_string())]));
        assert_eq!(groups, 0);
    }

    #[test]
    fn parses_alternation_and_groups() {
        let (ast, groups) = parse("foo|ba[rz]", &opts()).unwrap();
        assert_eq!(groups, 0);
        match ast {
            Ast::Branch(branches) => assert_eq!(branches.len(), 2),
            other => panic!("expected Branch, got {:?}", other),
        }
    }

    #[test]
    fn whole_pattern_anchors_are_absorbed() {
        let (ast, _) = parse("^foo$", &opts()).unwrap();
        assert_eq!(ast, Ast::Concat(vec![Ast::Literal("foo".to_string())]));
    }

    #[test]
    fn trailing_dollar_without_leading_caret_is_rejected_downstream() {
        // S8: a trailing `$` that doesn't span the whole pattern survives
        // parsing as Ast::EndText, which `compile` then rejects.
        let (ast, _) = parse("foo$", &opts()).unwrap();
        assert_eq!(
            ast,
            Ast::Concat(vec![Ast::Literal("foo".to_string()), Ast::EndText])
        );
    }

    #[test]
    fn backref_parses_to_numbered_node() {
        let (ast, groups) = parse(r#"(["'])([01]{3})\1"#, &opts()).unwrap();
        assert_eq!(groups, 2);
        match ast {
            Ast::Concat(pieces) => assert!(matches!(pieces.last(), Some(Ast::Backref(1)))),
            other => panic!("expected Concat, got {:?}", other),
        }
    }

    #[test]
    fn unbounded_star_uses_configured_max_count() {
        let options = RegexOptionsBuilder::new().max_count(5).build();
        let (ast, _) = parse("a*", &options).unwrap();
        match ast {
            Ast::Concat(pieces) => match &pieces[0] {
                Ast::Repeat { lo, hi, .. } => {
                    assert_eq!(*lo, 0);
                    assert_eq!(*hi, 5);
                }
                other => panic!("expected Repeat, got {:?}", other),
            },
            other => panic!("expected Concat, got {:?}", other),
        }
    }

    #[test]
    fn lookahead_is_rejected() {
        let err = parse(r"\w+(?=!)", &opts()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConstruct(_)));
    }
}
