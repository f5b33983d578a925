//! Caller-supplied rules. These carry executable logic only and are never
//! exported.

use crate::core::{FieldPath, Value};
use crate::validation::rules::FieldRule;
use crate::validation::violations::Violation;
use std::marker::PhantomData;
use std::sync::Arc;

/// A rule applied to the whole record.
pub trait RecordRule<R>: Send + Sync + 'static {
    fn check(&self, record: &R) -> Option<Violation>;
}

/// Field rule backed by a closure.
pub struct FieldFn<F> {
    checker: F,
}

impl<F> FieldRule for FieldFn<F>
where
    F: Fn(&FieldPath, &Value) -> Option<Violation> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "fieldFn"
    }

    fn check(&self, field: &FieldPath, value: &Value) -> Option<Violation> {
        (self.checker)(field, value)
    }
}

/// Validate a field with a custom function of its path and value.
///
/// # Example
///
/// ```rust
/// use fieldcheck::validation::{field_fn, Violation};
/// use fieldcheck::core::Value;
///
/// let not_admin = field_fn(|field, value| match value {
///     Value::Text(name) if name == "admin" => {
///         Some(Violation::new("Name is reserved", field.clone()))
///     }
///     _ => None,
/// });
/// # let _ = not_admin;
/// ```
pub fn field_fn<F>(checker: F) -> FieldFn<F>
where
    F: Fn(&FieldPath, &Value) -> Option<Violation> + Send + Sync + 'static,
{
    FieldFn { checker }
}

/// Record rule backed by a closure.
pub struct RecordFn<R, F> {
    checker: F,
    _record: PhantomData<fn(&R)>,
}

impl<R, F> RecordRule<R> for RecordFn<R, F>
where
    R: 'static,
    F: Fn(&R) -> Option<Violation> + Send + Sync + 'static,
{
    fn check(&self, record: &R) -> Option<Violation> {
        (self.checker)(record)
    }
}

/// Validate the whole record with a custom function.
pub fn record_fn<R, F>(checker: F) -> RecordFn<R, F>
where
    F: Fn(&R) -> Option<Violation> + Send + Sync + 'static,
{
    RecordFn {
        checker,
        _record: PhantomData,
    }
}

/// Anything that can be bound to a whole record in one call: a single rule,
/// a tuple of rules or a prepared list.
///
/// `M` only keeps the single-rule and multi-rule impls apart; it is always
/// inferred.
pub trait IntoRecordRules<R, M> {
    fn into_record_rules(self) -> Vec<Arc<dyn RecordRule<R>>>;
}

#[doc(hidden)]
pub struct SingleRule;

#[doc(hidden)]
pub struct RuleList;

impl<R: 'static, T: RecordRule<R>> IntoRecordRules<R, SingleRule> for T {
    fn into_record_rules(self) -> Vec<Arc<dyn RecordRule<R>>> {
        vec![Arc::new(self)]
    }
}

impl<R: 'static> IntoRecordRules<R, RuleList> for Vec<Arc<dyn RecordRule<R>>> {
    fn into_record_rules(self) -> Vec<Arc<dyn RecordRule<R>>> {
        self
    }
}

macro_rules! tuple_record_rules {
    ($($name:ident),+) => {
        impl<R: 'static, $($name: RecordRule<R>),+> IntoRecordRules<R, RuleList> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_record_rules(self) -> Vec<Arc<dyn RecordRule<R>>> {
                let ($($name,)+) = self;
                vec![$(Arc::new($name) as Arc<dyn RecordRule<R>>),+]
            }
        }
    };
}

tuple_record_rules!(A);
tuple_record_rules!(A, B);
tuple_record_rules!(A, B, C);
tuple_record_rules!(A, B, C, D);
