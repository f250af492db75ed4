//! How many tokens after a match belong to it.
//!
//! The declared arity is loosely typed (an integer or one of `?`, `*`,
//! `+`). It is only checked once the argument actually matches, and the
//! concrete span depends on what follows the match in the token vector.

use crate::error::{Error, Result};
use crate::tokens::Tokens;
use crate::value::Cell;

/// Declared arity of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nargs {
    /// A fixed number of values. Must be positive.
    Count(i64),
    /// `?`, `*` or `+`.
    Pattern(String),
}

impl From<i32> for Nargs {
    fn from(n: i32) -> Self {
        Nargs::Count(n as i64)
    }
}

impl From<i64> for Nargs {
    fn from(n: i64) -> Self {
        Nargs::Count(n)
    }
}

impl From<&str> for Nargs {
    fn from(s: &str) -> Self {
        Nargs::Pattern(s.to_string())
    }
}

impl From<String> for Nargs {
    fn from(s: String) -> Self {
        Nargs::Pattern(s)
    }
}

impl From<char> for Nargs {
    fn from(c: char) -> Self {
        Nargs::Pattern(c.to_string())
    }
}

/// Arity after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    /// No arity declared: one value, taken whatever it looks like.
    Next,
    Exactly(usize),
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

fn arity(name: &str, nargs: Option<&Nargs>) -> Result<Arity> {
    match nargs {
        None => Ok(Arity::Next),
        Some(Nargs::Count(n)) if *n < 1 => Err(Error::NargsNotPositive(name.to_string())),
        Some(Nargs::Count(n)) => Ok(Arity::Exactly(*n as usize)),
        Some(Nargs::Pattern(p)) => match p.as_str() {
            "?" => Ok(Arity::ZeroOrOne),
            "*" => Ok(Arity::ZeroOrMore),
            "+" => Ok(Arity::OneOrMore),
            _ => Err(Error::NargsInvalid(p.clone())),
        },
    }
}

/// Number of tokens, starting at the match at `index`, consumed by this
/// occurrence. The match itself counts, so a switch spans 1.
///
/// Every value token inside the returned span is unclaimed.
pub(crate) fn span(
    name: &str,
    nargs: Option<&Nargs>,
    cell: &Cell,
    tokens: &Tokens,
    index: usize,
) -> Result<usize> {
    if cell.is_switch() {
        return Ok(1);
    }
    let arity = match arity(name, nargs)? {
        // Patterns that do not apply to the kind are ignored.
        Arity::ZeroOrOne if cell.is_list() => Arity::Next,
        Arity::ZeroOrMore | Arity::OneOrMore if !cell.is_list() => Arity::Next,
        a => a,
    };
    let not_enough = || Error::NotEnoughArguments(name.to_string());

    match arity {
        Arity::Next => {
            if tokens.get(index + 1).is_none() {
                return Err(not_enough());
            }
            Ok(2)
        }
        Arity::Exactly(n) if cell.is_list() => {
            if tokens.eligible_run(index + 1, n) != n {
                return Err(not_enough());
            }
            Ok(n + 1)
        }
        Arity::Exactly(n) => {
            // A scalar keeps at most one value; anything beyond that is
            // rejected when the value is stored.
            let run = tokens.eligible_run(index + 1, n);
            if run == 0 {
                return Err(not_enough());
            }
            Ok(run + 1)
        }
        Arity::ZeroOrOne => Ok(1 + usize::from(tokens.is_eligible(index + 1))),
        Arity::ZeroOrMore | Arity::OneOrMore => {
            let run = tokens.eligible_run(index + 1, usize::MAX);
            if arity == Arity::OneOrMore && run == 0 {
                return Err(Error::AtLeastOneArgument(name.to_string()));
            }
            Ok(run + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Tokens {
        Tokens::new(args.iter().map(|s| s.to_string()).collect())
    }

    fn strs() -> Cell {
        Cell::Strs(vec![])
    }

    fn string() -> Cell {
        Cell::Str(String::new())
    }

    #[test]
    fn switches_ignore_nargs() {
        let t = tokens(&["-v", "a"]);
        let nargs = Nargs::from("bogus");
        assert_eq!(span("-v", Some(&nargs), &Cell::Flag(false), &t, 0).unwrap(), 1);
        assert_eq!(span("-v", None, &Cell::Counter(0), &t, 0).unwrap(), 1);
    }

    #[test]
    fn default_takes_next_token_even_if_dashed() {
        let t = tokens(&["--int", "-5"]);
        assert_eq!(span("--int", None, &Cell::Int(0), &t, 0).unwrap(), 2);
        let t = tokens(&["-s"]);
        let err = span("-s|--string", None, &string(), &t, 0).unwrap_err();
        assert_eq!(err.to_string(), "not enough arguments for -s|--string");
    }

    #[test]
    fn fixed_count_on_list() {
        let t = tokens(&["-f", "1", "2", "3"]);
        let three = Nargs::from(3);
        assert_eq!(span("-f", Some(&three), &strs(), &t, 0).unwrap(), 4);

        let t = tokens(&["-f", "1", "-g", "3"]);
        let err = span("-f", Some(&three), &strs(), &t, 0).unwrap_err();
        assert!(matches!(err, Error::NotEnoughArguments(_)));
    }

    #[test]
    fn fixed_count_must_be_positive() {
        let t = tokens(&["-f", "1"]);
        for n in [0, -1] {
            let err = span("-f", Some(&Nargs::from(n)), &strs(), &t, 0).unwrap_err();
            assert_eq!(err.to_string(), "[-f]: nargs integer value must be > 0");
        }
    }

    #[test]
    fn fixed_count_on_scalar_uses_available_run() {
        let three = Nargs::from(3);
        let t = tokens(&["--s", "test"]);
        assert_eq!(span("--s", Some(&three), &string(), &t, 0).unwrap(), 2);
        let t = tokens(&["--s", "a", "b"]);
        assert_eq!(span("--s", Some(&three), &string(), &t, 0).unwrap(), 3);
        let t = tokens(&["--s", "-x"]);
        assert!(span("--s", Some(&three), &string(), &t, 0).is_err());
    }

    #[test]
    fn zero_or_one() {
        let q = Nargs::from("?");
        let t = tokens(&["-f", "v", "-g", "-h"]);
        assert_eq!(span("-f", Some(&q), &string(), &t, 0).unwrap(), 2);
        assert_eq!(span("-g", Some(&q), &string(), &t, 2).unwrap(), 1);
        assert_eq!(span("-h", Some(&q), &string(), &t, 3).unwrap(), 1);
        // Lists ignore `?`.
        assert_eq!(span("-f", Some(&q), &strs(), &t, 0).unwrap(), 2);
    }

    #[test]
    fn zero_or_more_and_one_or_more() {
        let star = Nargs::from('*');
        let plus = Nargs::from('+');
        let t = tokens(&["-f", "a", "b", "-g", "-i"]);
        assert_eq!(span("-f", Some(&star), &strs(), &t, 0).unwrap(), 3);
        assert_eq!(span("-g", Some(&star), &strs(), &t, 3).unwrap(), 1);
        let err = span("-g", Some(&plus), &strs(), &t, 3).unwrap_err();
        assert_eq!(err.to_string(), "[-g] requires at least one argument");
        // Scalars ignore `*` and `+`.
        assert_eq!(span("-f", Some(&plus), &string(), &t, 0).unwrap(), 2);
    }

    #[test]
    fn unknown_pattern() {
        let t = tokens(&["-g", "x"]);
        let err = span("-g", Some(&Nargs::from("b")), &strs(), &t, 0).unwrap_err();
        assert_eq!(err.to_string(), "invalid string value [b] for nargs");
    }
}
