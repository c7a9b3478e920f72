//! Validator combinators
//!
//! Higher-order validators built from other validators:
//!
//! - [`chain`] threads the value through steps and stops at the first failure
//! - [`option`] tries alternative [`Branch`]es against the original input
//! - [`tuple`] and [`array`] validate array elements independently
//! - [`test`], [`function`], [`set_value`], [`strict_equal`] and [`choice`]
//!   lift predicates, transforms and constants into validators
//!
//! # Example
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use favre_validators::predicate::non_negative;
//! use serde_json::json;
//!
//! // Either absent, or a non-negative integer
//! let line_id = option([
//!     Branch::new(validate_missing),
//!     Branch::new(validate_integer).then(test(non_negative(), "Le nombre doit être positif ou nul.")),
//! ]);
//!
//! assert_eq!(line_id.validate(json!(null)), Validation::valid(json!(null)));
//! assert_eq!(line_id.validate(json!(12)), Validation::valid(json!(12)));
//! assert!(line_id.validate(json!(-1)).is_invalid());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::predicate::Predicate;
use crate::validator::{BoxedValidator, Validator};
use crate::{Kind, Validation, ValidationError};

/// Build a [`Chain`] from heterogeneous validators.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// let trimmed = chain![validate_string, validate_trim, validate_non_empty];
/// assert_eq!(trimmed.validate(json!(" abc ")), Validation::valid(json!("abc")));
/// ```
#[macro_export]
macro_rules! chain {
    ($($validator:expr),* $(,)?) => {
        $crate::combinators::Chain::new(vec![$($crate::BoxedValidator::new($validator)),*])
    };
}

/// Build a [`Tuple`] from heterogeneous validators, one per position.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// let pair = tuple![validate_string, validate_integer];
/// assert_eq!(pair.validate(json!(["a", 1])), Validation::valid(json!(["a", 1])));
/// ```
#[macro_export]
macro_rules! tuple {
    ($($validator:expr),* $(,)?) => {
        $crate::combinators::Tuple::new(vec![$($crate::BoxedValidator::new($validator)),*])
    };
}

/// Sequential composition: each step receives the previous step's output.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    steps: Vec<BoxedValidator>,
}

impl Chain {
    /// Chain `steps` in order.
    pub fn new(steps: Vec<BoxedValidator>) -> Self {
        Chain { steps }
    }

    /// Append a step.
    pub fn then<V: Validator + 'static>(mut self, next: V) -> Self {
        self.steps.push(BoxedValidator::new(next));
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the chain has no steps (and so accepts anything).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Validator for Chain {
    fn validate(&self, mut value: Value) -> Validation {
        for step in &self.steps {
            let result = step.validate(value);
            if result.is_invalid() {
                return result;
            }
            value = result.value;
        }
        Validation::valid(value)
    }
}

/// Chain validators; the first failure stops the chain.
pub fn chain<I>(steps: I) -> Chain
where
    I: IntoIterator<Item = BoxedValidator>,
{
    Chain::new(steps.into_iter().collect())
}

/// One alternative of an [`option`]: a probe validator and its followers.
///
/// The probe decides whether the branch applies. Once it succeeds the branch
/// is committed and the followers' verdict is final.
#[derive(Clone, Debug)]
pub struct Branch {
    first: BoxedValidator,
    rest: Vec<BoxedValidator>,
}

impl Branch {
    /// Branch probing with `first`.
    pub fn new<V: Validator + 'static>(first: V) -> Self {
        Branch {
            first: BoxedValidator::new(first),
            rest: Vec::new(),
        }
    }

    /// Branch over the steps of `chain`: its first step is the probe and the
    /// rest are followers. An empty chain probes with a step accepting
    /// anything.
    ///
    /// ```rust
    /// use favre_validators::prelude::*;
    /// use serde_json::json;
    ///
    /// let text = chain![validate_string, validate_trim, validate_non_empty];
    /// let text = option([Branch::new(validate_missing), Branch::from_chain(text)]);
    /// // committed after `validate_string`, so only the follower's error is kept
    /// assert_eq!(
    ///     text.validate(json!(" ")),
    ///     Validation::invalid(json!(""), "Expected a non empty string"),
    /// );
    /// ```
    pub fn from_chain(chain: Chain) -> Self {
        let mut steps = chain.steps.into_iter();
        let first = steps
            .next()
            .unwrap_or_else(|| BoxedValidator::new(Chain::default()));
        Branch {
            first,
            rest: steps.collect(),
        }
    }

    /// Add a follower, run after the probe succeeds.
    pub fn then<V: Validator + 'static>(mut self, next: V) -> Self {
        self.rest.push(BoxedValidator::new(next));
        self
    }
}

impl From<Chain> for Branch {
    fn from(chain: Chain) -> Self {
        Branch::from_chain(chain)
    }
}

/// Ordered alternatives, see [`option`].
#[derive(Clone, Debug)]
pub struct Options {
    branches: Vec<Branch>,
}

impl Validator for Options {
    fn validate(&self, value: Value) -> Validation {
        let mut errors = Vec::with_capacity(self.branches.len());
        for (_index, branch) in self.branches.iter().enumerate() {
            let probe = branch.first.validate(value.clone());
            match probe.error {
                Some(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(branch = _index, %error, "option branch rejected");
                    errors.push(error);
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(branch = _index, "option branch committed");
                    let mut current = probe.value;
                    for step in &branch.rest {
                        let result = step.validate(current);
                        if result.is_invalid() {
                            return result;
                        }
                        current = result.value;
                    }
                    return Validation::valid(current);
                }
            }
        }
        Validation::invalid(value, ValidationError::Alternatives(errors))
    }
}

/// Try `branches` in order against the original input.
///
/// A branch whose first validator fails is abandoned and its error recorded.
/// The first branch whose first validator succeeds is committed: its
/// remaining validators run as a chain and any failure there is returned
/// as is, without trying later branches. When every branch is abandoned the
/// original input is returned with the first-step errors of all branches,
/// in order.
///
/// # Panics
///
/// Panics if `branches` is empty.
pub fn option<I>(branches: I) -> Options
where
    I: IntoIterator<Item = Branch>,
{
    let branches: Vec<Branch> = branches.into_iter().collect();
    assert!(!branches.is_empty(), "option requires at least one branch");
    Options { branches }
}

/// Fixed-length array with one validator per position, see [`tuple`].
#[derive(Clone, Debug)]
pub struct Tuple {
    items: Vec<BoxedValidator>,
}

impl Tuple {
    /// One validator per position.
    pub fn new(items: Vec<BoxedValidator>) -> Self {
        Tuple { items }
    }
}

impl Validator for Tuple {
    fn validate(&self, value: Value) -> Validation {
        let array = match value {
            Value::Null => return Validation::invalid(Value::Null, ValidationError::Missing),
            Value::Array(array) => array,
            other => {
                let error = ValidationError::type_mismatch(Kind::Array, &other);
                return Validation::invalid(other, error);
            }
        };
        if array.len() != self.items.len() {
            let error = ValidationError::message(format!(
                "Expected an array of length {}, got \"{}\"",
                self.items.len(),
                array.len()
            ));
            return Validation::invalid(array, error);
        }

        let mut errors = BTreeMap::new();
        let values = array
            .into_iter()
            .zip(&self.items)
            .enumerate()
            .map(|(index, (item, validator))| {
                let result = validator.validate(item);
                if let Some(error) = result.error {
                    errors.insert(index, error);
                }
                result.value
            })
            .collect::<Vec<_>>();
        aggregate(Value::Array(values), errors)
    }
}

/// Validate each position of an array of exactly `items.len()` elements.
///
/// Positions are validated independently; the transformed array is returned
/// even when some positions fail, with their errors keyed by index.
pub fn tuple<I>(items: I) -> Tuple
where
    I: IntoIterator<Item = BoxedValidator>,
{
    Tuple::new(items.into_iter().collect())
}

/// Homogeneous array, see [`array`].
#[derive(Clone, Debug)]
pub struct ArrayOf {
    item: Option<BoxedValidator>,
}

impl Validator for ArrayOf {
    fn validate(&self, value: Value) -> Validation {
        let array = match value {
            Value::Null => return Validation::invalid(Value::Null, ValidationError::Missing),
            Value::Array(array) => array,
            other => {
                let error = ValidationError::type_mismatch(Kind::Array, &other);
                return Validation::invalid(other, error);
            }
        };
        let Some(item) = &self.item else {
            return Validation::valid(array);
        };

        let mut errors = BTreeMap::new();
        let values = array
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                let result = item.validate(element);
                if let Some(error) = result.error {
                    errors.insert(index, error);
                }
                result.value
            })
            .collect::<Vec<_>>();
        aggregate(Value::Array(values), errors)
    }
}

/// Validate every element of an array with `item`.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// let names = array(validate_non_empty_trimmed_string);
/// let result = names.validate(json!([" a ", ""]));
/// assert_eq!(result.value, json!(["a", ""]));
/// assert!(result.error.unwrap().item(1).is_some());
/// ```
pub fn array<V: Validator + 'static>(item: V) -> ArrayOf {
    ArrayOf {
        item: Some(BoxedValidator::new(item)),
    }
}

/// Accept any array, leaving its elements untouched.
pub fn any_array() -> ArrayOf {
    ArrayOf { item: None }
}

fn aggregate(value: Value, errors: BTreeMap<usize, ValidationError>) -> Validation {
    if errors.is_empty() {
        Validation::valid(value)
    } else {
        Validation::invalid(value, ValidationError::Items(errors))
    }
}

enum Message {
    Fixed(ValidationError),
    Computed(Box<dyn Fn(&Value) -> ValidationError + Send + Sync>),
}

/// Predicate lifted into a validator, see [`test`].
pub struct Test<P> {
    predicate: P,
    message: Message,
}

impl<P> fmt::Debug for Test<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match &self.message {
            Message::Fixed(error) => error.to_string(),
            Message::Computed(_) => String::from("<computed>"),
        };
        f.debug_struct("Test").field("message", &message).finish()
    }
}

impl<P: Predicate> Validator for Test<P> {
    fn validate(&self, value: Value) -> Validation {
        if self.predicate.check(&value) {
            return Validation::valid(value);
        }
        let error = match &self.message {
            Message::Fixed(error) => error.clone(),
            Message::Computed(make) => make(&value),
        };
        Validation::invalid(value, error)
    }
}

/// Fail with `message` when `predicate` rejects the value.
pub fn test<P, M>(predicate: P, message: M) -> Test<P>
where
    P: Predicate,
    M: Into<ValidationError>,
{
    Test {
        predicate,
        message: Message::Fixed(message.into()),
    }
}

/// Fail with a message computed from the rejected value.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use favre_validators::predicate::lt;
/// use serde_json::json;
///
/// let small = test_with(lt(10), |value| format!("{value} is too large"));
/// let result = small.validate(json!(12));
/// assert_eq!(result.error.unwrap().to_string(), "12 is too large");
/// ```
pub fn test_with<P, F, E>(predicate: P, message: F) -> Test<P>
where
    P: Predicate,
    F: Fn(&Value) -> E + Send + Sync + 'static,
    E: Into<ValidationError>,
{
    Test {
        predicate,
        message: Message::Computed(Box::new(move |value| message(value).into())),
    }
}

/// Fail with "Test failed" when `predicate` rejects the value.
pub fn check<P: Predicate>(predicate: P) -> Test<P> {
    test(predicate, "Test failed")
}

/// Infallible transform, see [`function`].
#[derive(Clone)]
pub struct Function<F>(F);

impl<F> fmt::Debug for Function<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

impl<F> Validator for Function<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    #[inline]
    fn validate(&self, value: Value) -> Validation {
        Validation::valid((self.0)(value))
    }
}

/// Apply a pure transform; never fails.
pub fn function<F>(transform: F) -> Function<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    Function(transform)
}

/// Constant replacement, see [`set_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct SetValue(Value);

impl Validator for SetValue {
    #[inline]
    fn validate(&self, _value: Value) -> Validation {
        Validation::valid(self.0.clone())
    }
}

/// Discard the input and succeed with `constant`.
pub fn set_value(constant: impl Into<Value>) -> SetValue {
    SetValue(constant.into())
}

/// Equality check, see [`strict_equal`].
#[derive(Clone, Debug, PartialEq)]
pub struct StrictEqual(Value);

impl Validator for StrictEqual {
    fn validate(&self, value: Value) -> Validation {
        if same_value(&value, &self.0) {
            Validation::valid(value)
        } else {
            let error = format!("Expected a value equal to \"{}\"", raw_text(&self.0));
            Validation::invalid(value, error)
        }
    }
}

/// Accept only values equal to `expected`.
pub fn strict_equal(expected: impl Into<Value>) -> StrictEqual {
    StrictEqual(expected.into())
}

/// Membership check, see [`choice`].
#[derive(Clone, Debug, PartialEq)]
pub struct Choice(Vec<Value>);

impl Validator for Choice {
    fn validate(&self, value: Value) -> Validation {
        if self.0.iter().any(|option| same_value(option, &value)) {
            Validation::valid(value)
        } else {
            Validation::invalid(value, "Unexpected option")
        }
    }
}

/// Accept only members of `options`.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// let class = choice(["is-danger", "is-warning"]);
/// assert!(class.validate(json!("is-danger")).is_valid());
/// assert!(class.validate(json!("is-info")).is_invalid());
/// ```
pub fn choice<I>(options: I) -> Choice
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Choice(options.into_iter().map(Into::into).collect())
}

// numbers compare by value, so `1850` and `1850.0` are equal
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l == r,
            _ => l.as_f64() == r.as_f64(),
        },
        _ => left == right,
    }
}

/// Strings print without quotes, anything else as JSON.
pub(crate) fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
