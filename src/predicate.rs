//! Composable predicates over JSON values
//!
//! Predicates feed the [`test`](crate::combinators::test) combinator. They can
//! be combined with `and`, `or` and `not`, so range checks read like the rule
//! they enforce:
//!
//! ```rust
//! use favre_validators::predicate::*;
//! use serde_json::json;
//!
//! let year = ge(1700).and(lt(2000));
//! assert!(year.check(&json!(1850)));
//! assert!(!year.check(&json!(2001)));
//! assert!(!year.check(&json!("1850"))); // not a number
//! ```

use serde_json::Value;

/// A composable predicate over a JSON value.
pub trait Predicate: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &Value) -> bool;
}

// Blanket impl for closures
impl<F> Predicate for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Extension trait for predicate combinators.
pub trait PredicateExt: Predicate + Sized {
    /// Both predicates must hold.
    fn and<P: Predicate>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// Either predicate must hold.
    fn or<P: Predicate>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Invert the predicate.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<P: Predicate> PredicateExt for P {}

/// AND combinator - both predicates must be true.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<P1: Predicate, P2: Predicate> Predicate for And<P1, P2> {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        self.0.check(value) && self.1.check(value)
    }
}

/// OR combinator - either predicate must be true.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<P1: Predicate, P2: Predicate> Predicate for Or<P1, P2> {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        self.0.check(value) || self.1.check(value)
    }
}

/// NOT combinator - inverts the predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<P: Predicate> Predicate for Not<P> {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        !self.0.check(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Bound {
    Ge,
    Gt,
    Le,
    Lt,
}

/// Numeric comparison against a fixed bound. Non-numbers never match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compare {
    bound: Bound,
    limit: f64,
}

impl Predicate for Compare {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        let Some(n) = value.as_f64() else {
            return false;
        };
        match self.bound {
            Bound::Ge => n >= self.limit,
            Bound::Gt => n > self.limit,
            Bound::Le => n <= self.limit,
            Bound::Lt => n < self.limit,
        }
    }
}

/// Value is a number greater than or equal to `limit`.
pub fn ge(limit: impl Into<f64>) -> Compare {
    Compare {
        bound: Bound::Ge,
        limit: limit.into(),
    }
}

/// Value is a number strictly greater than `limit`.
pub fn gt(limit: impl Into<f64>) -> Compare {
    Compare {
        bound: Bound::Gt,
        limit: limit.into(),
    }
}

/// Value is a number less than or equal to `limit`.
pub fn le(limit: impl Into<f64>) -> Compare {
    Compare {
        bound: Bound::Le,
        limit: limit.into(),
    }
}

/// Value is a number strictly less than `limit`.
pub fn lt(limit: impl Into<f64>) -> Compare {
    Compare {
        bound: Bound::Lt,
        limit: limit.into(),
    }
}

/// Value is a number in `min..=max`.
///
/// ```rust
/// use favre_validators::predicate::*;
/// use serde_json::json;
///
/// let port = between(0, 65536);
/// assert!(port.check(&json!(5432)));
/// assert!(!port.check(&json!(-1)));
/// ```
pub fn between(min: impl Into<f64>, max: impl Into<f64>) -> And<Compare, Compare> {
    ge(min).and(le(max))
}

/// Value is a number `>= 0`.
pub fn non_negative() -> Compare {
    ge(0)
}

/// Value is a string of at most `max` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharsMax(usize);

impl Predicate for CharsMax {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| s.chars().count() <= self.0)
    }
}

/// Value is a string of at most `max` characters.
pub fn chars_max(max: usize) -> CharsMax {
    CharsMax(max)
}

/// Symbols a slug spells out as words (`&` becomes "and", `€` "euro").
const SPELLED_SYMBOLS: &[char] = &[
    '$', '%', '&', '<', '>', '|', '¢', '£', '¤', '¥', '©', '®', '€', '₣', '₤', '₩', '₪', '₫',
    '₭', '₮', '₱', '₹', '₺', '₽', '∂', '∆', '∑', '∞', '♥',
];

/// Value is a string that leaves something in its slug, see [`significant`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Significant;

impl Predicate for Significant {
    #[inline]
    fn check(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| {
            s.chars().any(|c| c.is_alphanumeric() || SPELLED_SYMBOLS.contains(&c))
        })
    }
}

/// Value is a string containing a letter, a digit or a symbol spelled out
/// in slugs (`&`, `€`, `%`, ...). Punctuation and spaces alone are not
/// significant.
///
/// ```rust
/// use favre_validators::predicate::*;
/// use serde_json::json;
///
/// assert!(significant().check(&json!("Saint-Étienne")));
/// assert!(significant().check(&json!(" & ")));
/// assert!(!significant().check(&json!("-- ' --")));
/// ```
pub fn significant() -> Significant {
    Significant
}
