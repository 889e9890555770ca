use std::fmt;

/// Result type for this crate with specific error enum.
pub type Result<T> = ::std::result::Result<T, Error>;

/// An error for the result of compiling a pattern, or of indexing and
/// membership-testing a compiled `MatchSpace`.
///
/// Mirrors spec.md §7's four conceptual kinds (UnsupportedConstruct,
/// ParseFailure, IndexOutOfRange, Overflow), broken out into the specific
/// parse-time variants a caller usually wants to match on. `Overflow` is
/// not one of these variants: every count in this crate is a `BigUint`, so
/// the "host integer type" condition spec.md §7 names for it never arises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// General parsing error not covered by a more specific variant.
    ParseFailure(String),
    /// Opening parenthesis without closing parenthesis, e.g. `(a|b`.
    UnclosedOpenParen,
    /// A pattern construct the match-space algebra cannot represent:
    /// lookaround, inline flag groups, a non-absorbable anchor, or a
    /// backreference into a group whose capture varies per index.
    UnsupportedConstruct(String),
    /// Backslash without a following character.
    TrailingBackslash,
    /// Invalid hex escape (`\x` not followed by two hex digits).
    InvalidHex,
    /// A hex/unicode escape decoded to a value that is not a valid code
    /// point.
    InvalidCodepointValue,
    /// Invalid character class, e.g. a descending range `[z-a]`.
    InvalidClass(String),
    /// Invalid back reference, e.g. a reference to a nonexistent group.
    InvalidBackref(String),
    /// `get(i)` was called with `i` outside `[-length, length)`.
    IndexOutOfRange,

    /// This enum may grow additional variants, so this makes sure clients
    /// don't count on exhaustive matching. Otherwise, adding a new variant
    /// could break existing code.
    #[doc(hidden)]
    __Nonexhaustive,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseFailure(msg) => write!(f, "parse error: {}", msg),
            Error::UnclosedOpenParen => {
                write!(f, "opening parenthesis without closing parenthesis")
            }
            Error::UnsupportedConstruct(msg) => write!(f, "unsupported construct: {}", msg),
            Error::TrailingBackslash => write!(f, "backslash without following character"),
            Error::InvalidHex => write!(f, "invalid hex escape"),
            Error::InvalidCodepointValue => {
                write!(f, "invalid codepoint for hex or unicode escape")
            }
            Error::InvalidClass(msg) => write!(f, "invalid character class: {}", msg),
            Error::InvalidBackref(msg) => write!(f, "invalid back reference: {}", msg),
            Error::IndexOutOfRange => write!(f, "index out of range"),
            Error::__Nonexhaustive => unreachable!(),
        }
    }
}
