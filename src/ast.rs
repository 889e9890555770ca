//! Component I: the AST shape a conforming parser hands the compiler.
//!
//! This plays the role spec-wise documented as an external collaborator: the
//! core compiler (see `compile`) only ever consumes this tree. `parse`
//! supplies one concrete producer of it; any other parser that emits the
//! same shape is equally usable.

/// Parse-tree node, named after the vocabulary regex parsers in this
/// ecosystem already use for the same concepts (literal, any, class,
/// concat, branch, repeat, group, backref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// The empty pattern, or an elided branch.
    Empty,
    /// A literal run of characters.
    Literal(String),
    /// The `.` metacharacter.
    Any,
    /// A standalone escape shorthand (`\d \D \w \W \s \S`) expanded to
    /// explicit ranges by the parser. Always compiled as a single CharClass
    /// intersected with (or complemented against) the configured alphabet.
    Class { ranges: Vec<(u32, u32)>, negated: bool },
    /// A `[...]`/`[^...]` bracket expression. `members` is the literal,
    /// duplicate-preserving list of ranges in source order — `[aa]` parses
    /// to two one-point members, not a merged single-point class, so that
    /// the duplicate survives compilation (spec scenario: `[aa]` has
    /// length 2, not 1).
    Bracket {
        members: Vec<(u32, u32)>,
        negated: bool,
    },
    /// Implicit concatenation of a sequence of pieces.
    Concat(Vec<Ast>),
    /// `|` alternation, in source order.
    Branch(Vec<Ast>),
    /// Bounded repetition; unbounded `*`/`+` arrive here with `hi` already
    /// substituted by the configured `max_count`.
    Repeat { child: Box<Ast>, lo: u32, hi: u32 },
    /// A capturing group. `id` is 1-indexed, assigned in source order
    /// during parsing.
    Group { id: u32, child: Box<Ast> },
    /// A numbered backreference to a previously-opened capturing group.
    Backref(u32),
    /// A leading `^` that did not get absorbed as a whole-pattern anchor.
    StartText,
    /// A trailing `$` that did not get absorbed as a whole-pattern anchor.
    EndText,
}
