//! Component G: the AST-to-MatchSpace compiler.
//!
//! Dispatches on the `Ast` node kind the parser (or any conforming
//! collaborator) hands in, builds the `MatchSpace` tree described in §3–§4
//! of the specification, and rejects anything the algebra cannot represent
//! with `Error::UnsupportedConstruct` — lookaround is rejected at parse
//! time, and an ill-formed backreference is caught here. A `StartText`/
//! `EndText` that did not get absorbed as a whole-pattern anchor (spec §9's
//! Open Question) is not a rejection: per S8, it compiles to the empty
//! language, matching "length=0 (anchor unsupported → empty)" literally.

use bit_set::BitSet;

use crate::ast::Ast;
use crate::charclass::CharClass;
use crate::error::{Error, Result};
use crate::space::MatchSpace;
use crate::RegexOptions;

struct CompileCtx {
    /// Group ids seen so far in a left-to-right, pre-order walk: a
    /// `Backref` may only reference an id already in this set (spec §4.7:
    /// "the backref appears strictly after the referenced group"). Stored
    /// as a `BitSet` the same way the teacher's own parser hands a
    /// liveness set of group ids back to its caller.
    seen_groups: BitSet,
    /// Group ids that occur anywhere underneath a `Repeat` ancestor, and so
    /// may capture a different value per repetition; referencing one via
    /// backref is rejected (spec §9, Open Questions).
    under_repeat_groups: BitSet,
}

pub fn compile(ast: &Ast, options: &RegexOptions) -> Result<MatchSpace> {
    let mut under_repeat_groups = BitSet::new();
    collect_under_repeat_groups(ast, false, &mut under_repeat_groups);
    let mut ctx = CompileCtx {
        seen_groups: BitSet::new(),
        under_repeat_groups,
    };
    compile_node(ast, options, &mut ctx)
}

fn collect_under_repeat_groups(ast: &Ast, under_repeat: bool, out: &mut BitSet) {
    match ast {
        Ast::Empty
        | Ast::Literal(_)
        | Ast::Any
        | Ast::Class { .. }
        | Ast::Bracket { .. }
        | Ast::Backref(_) => {}
        Ast::StartText | Ast::EndText => {}
        Ast::Concat(children) | Ast::Branch(children) => {
            for child in children {
                collect_under_repeat_groups(child, under_repeat, out);
            }
        }
        Ast::Repeat { child, .. } => {
            collect_under_repeat_groups(child, true, out);
        }
        Ast::Group { id, child } => {
            if under_repeat {
                out.insert(*id as usize);
            }
            collect_under_repeat_groups(child, under_repeat, out);
        }
    }
}

fn compile_node(ast: &Ast, options: &RegexOptions, ctx: &mut CompileCtx) -> Result<MatchSpace> {
    match ast {
        Ast::Empty => Ok(MatchSpace::concat(Vec::new())),
        Ast::Literal(s) => Ok(MatchSpace::literal(s.clone())),
        Ast::Any => {
            let cc = if options.dot_matches_new_line() {
                options.charset().clone()
            } else {
                options
                    .charset()
                    .subtract(&CharClass::single('\n' as u32))
            };
            Ok(MatchSpace::class(cc))
        }
        Ast::Class { ranges, negated } => {
            let raw = CharClass::from_ranges(ranges.clone());
            let cc = if *negated {
                raw.complement(options.charset())
            } else {
                raw.intersect(options.charset())
            };
            Ok(MatchSpace::class(cc))
        }
        Ast::Bracket { members, negated } => {
            if *negated {
                let raw = CharClass::from_ranges(members.clone());
                Ok(MatchSpace::class(raw.complement(options.charset())))
            } else {
                // One CharClass per bracket member, kept separate (not merged
                // into a single class) so a repeated member such as `[aa]`
                // enumerates as a duplicate, per S4, rather than collapsing.
                let per_member: Vec<MatchSpace> = members
                    .iter()
                    .map(|&(lo, hi)| {
                        MatchSpace::class(CharClass::from_ranges(vec![(lo, hi)]).intersect(options.charset()))
                    })
                    .collect();
                if per_member.len() == 1 {
                    Ok(per_member.into_iter().next().unwrap())
                } else {
                    Ok(MatchSpace::branch(per_member))
                }
            }
        }
        Ast::Concat(children) => {
            let compiled = children
                .iter()
                .map(|c| compile_node(c, options, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(MatchSpace::concat(compiled))
        }
        Ast::Branch(children) => {
            let compiled = children
                .iter()
                .map(|c| compile_node(c, options, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(MatchSpace::branch(compiled))
        }
        Ast::Repeat { child, lo, hi } => {
            let inner = compile_node(child, options, ctx)?;
            Ok(MatchSpace::repeat(inner, *lo, *hi))
        }
        Ast::Group { id, child } => {
            let inner = compile_node(child, options, ctx)?;
            ctx.seen_groups.insert(*id as usize);
            Ok(MatchSpace::group(*id, inner))
        }
        Ast::Backref(id) => {
            if ctx.under_repeat_groups.contains(*id as usize) {
                return Err(Error::UnsupportedConstruct(format!(
                    "backreference to group {} whose capture varies under repetition",
                    id
                )));
            }
            if !ctx.seen_groups.contains(*id as usize) {
                return Err(Error::UnsupportedConstruct(format!(
                    "backreference to group {} before it is captured",
                    id
                )));
            }
            Ok(MatchSpace::backref(*id))
        }
        // A bare, non-absorbed anchor compiles to the empty language (S8)
        // rather than being rejected: `MatchSpace::class` of an empty
        // `CharClass` has length 0, and that 0 propagates through any
        // enclosing `Concat`/`Branch`/`Repeat` the same way any other
        // zero-length child does.
        Ast::StartText | Ast::EndText => Ok(MatchSpace::class(CharClass::empty())),
    }
}
