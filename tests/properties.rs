//! Property tests for invariants 2-5 of spec.md §8, run against small
//! bounded ASTs built directly (bypassing the parser) so the properties are
//! checked against the algebra itself, not against the handful of worked
//! scenarios in `tests/scenarios.rs`.

#[macro_use]
extern crate quickcheck;

use matchspace::ast::Ast;
use matchspace::compile::compile;
use matchspace::space::Captures;
use matchspace::RegexOptions;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use quickcheck::{Arbitrary, Gen};
use rand::Rng;

/// A depth-bounded AST, excluding groups/backrefs and brackets so every
/// generated tree compiles cleanly under default options.
#[derive(Clone, Debug)]
struct SmallAst(Ast);

fn gen_leaf<G: Gen>(g: &mut G) -> Ast {
    let choice: u8 = g.gen_range(0, 3);
    match choice {
        0 => {
            let offset: u8 = g.gen_range(0, 3);
            let c = (b'a' + offset) as char;
            Ast::Literal(c.to_string())
        }
        1 => Ast::Class {
            ranges: vec![('a' as u32, 'c' as u32)],
            negated: false,
        },
        _ => Ast::Empty,
    }
}

fn gen_ast<G: Gen>(g: &mut G, depth: u32) -> Ast {
    if depth == 0 {
        return gen_leaf(g);
    }
    let choice: u8 = g.gen_range(0, 4);
    match choice {
        0 => gen_leaf(g),
        1 => {
            let n: u32 = 1 + g.gen_range(0, 2);
            Ast::Concat((0..n).map(|_| gen_ast(g, depth - 1)).collect())
        }
        2 => {
            let n: u32 = 1 + g.gen_range(0, 2);
            Ast::Branch((0..n).map(|_| gen_ast(g, depth - 1)).collect())
        }
        _ => {
            let lo: u32 = g.gen_range(0, 2);
            let hi: u32 = lo + g.gen_range(0, 2);
            Ast::Repeat {
                child: Box::new(gen_ast(g, depth - 1)),
                lo,
                hi,
            }
        }
    }
}

impl Arbitrary for SmallAst {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        SmallAst(gen_ast(g, 3))
    }
}

fn bounded_sample(length: &BigUint, cap: u32) -> BigUint {
    let cap = BigUint::from(cap);
    if length < &cap {
        length.clone()
    } else {
        cap
    }
}

quickcheck! {
    /// Invariant 2: for all 0 <= i < length, get(i) is defined and
    /// contains(get(i)) holds. Invariant 3: enumeration has no gaps, which
    /// this exercises by walking every sampled index in order.
    fn get_implies_contains(ast: SmallAst) -> bool {
        let space = match compile(&ast.0, &RegexOptions::default()) {
            Ok(s) => s,
            Err(_) => return true,
        };
        let length = space.length().clone();
        let n = bounded_sample(&length, 25);
        let mut i = BigUint::zero();
        while i < n {
            let mut groups = Captures::new();
            let (s, _) = space.get(&i, &mut groups);
            if !space.contains(&s) {
                return false;
            }
            i += BigUint::one();
        }
        true
    }

    /// Invariant 4: a Concat's i-th string equals the concatenation of its
    /// children at the mixed-radix digits i decomposes into.
    fn concat_matches_mixed_radix_digits(left: SmallAst, right: SmallAst) -> bool {
        let opts = RegexOptions::default();
        let a = match compile(&left.0, &opts) {
            Ok(s) => s,
            Err(_) => return true,
        };
        let b = match compile(&right.0, &opts) {
            Ok(s) => s,
            Err(_) => return true,
        };
        let la = a.length().clone();
        let lb = b.length().clone();
        if la.is_zero() || lb.is_zero() {
            return true;
        }
        let concat = match compile(&Ast::Concat(vec![left.0.clone(), right.0.clone()]), &opts) {
            Ok(s) => s,
            Err(_) => return true,
        };
        let sample_a = bounded_sample(&la, 4);
        let sample_b = bounded_sample(&lb, 4);
        let mut ia = BigUint::zero();
        while ia < sample_a {
            let mut ib = BigUint::zero();
            while ib < sample_b {
                let i = &ia * &lb + &ib;
                let mut groups = Captures::new();
                let (expected_a, _) = a.get(&ia, &mut groups);
                let mut groups = Captures::new();
                let (expected_b, _) = b.get(&ib, &mut groups);
                let mut groups = Captures::new();
                let (actual, _) = concat.get(&i, &mut groups);
                if actual != format!("{}{}", expected_a, expected_b) {
                    return false;
                }
                ib += BigUint::one();
            }
            ia += BigUint::one();
        }
        true
    }

    /// Invariant 5: a Branch's get(S_k + j) equals its k-th child's get(j),
    /// where S_k is the prefix sum of lengths before child k.
    fn branch_respects_prefix_sums(children: Vec<SmallAst>) -> bool {
        if children.is_empty() {
            return true;
        }
        let opts = RegexOptions::default();
        let compiled: Vec<_> = match children
            .iter()
            .map(|c| compile(&c.0, &opts))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(v) => v,
            Err(_) => return true,
        };
        let branch_ast = Ast::Branch(children.iter().map(|c| c.0.clone()).collect());
        let branch = match compile(&branch_ast, &opts) {
            Ok(s) => s,
            Err(_) => return true,
        };
        let mut prefix = BigUint::zero();
        for child in &compiled {
            let l = child.length().clone();
            let sample = bounded_sample(&l, 4);
            let mut j = BigUint::zero();
            while j < sample {
                let mut groups = Captures::new();
                let (expected, _) = child.get(&j, &mut groups);
                let mut groups = Captures::new();
                let (actual, _) = branch.get(&(&prefix + &j), &mut groups);
                if actual != expected {
                    return false;
                }
                j += BigUint::one();
            }
            prefix += l;
        }
        true
    }
}
