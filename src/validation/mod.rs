//! Rules and the violations they produce.
//!
//! Built-in rules are constructed with free functions and configured with
//! builder methods that consume and return the rule:
//!
//! ```rust
//! use fieldcheck::validation::{min, min_length, pattern};
//!
//! let name = min_length(4).optional().message("Name is too short");
//! let tax = min(0);
//! let code = pattern(r"^[A-Z]{3}$").unwrap().optional();
//! # let _ = (name, tax, code);
//! ```
//!
//! A rule reports at most one violation per run. Violations are collected,
//! never raised: see [`Violations`] and [`ViolationMap`] for the two shapes
//! in which a validation run reports them.

pub mod custom;
pub mod rules;
pub mod violations;

pub use custom::{field_fn, record_fn, FieldFn, IntoRecordRules, RecordFn, RecordRule};
pub use rules::{
    email, is_email, max, max_length, min, min_length, options, pattern, required, FieldRule,
    IntoFieldRules, Rule, RuleKind, SkipsZero, EMAIL_PATTERN,
};
pub use violations::{Violation, ViolationMap, Violations};
