//! Rule set construction and execution.
//!
//! A [`RuleSet`] is built by binding rules to fields selected with closures
//! over the record type. Each binding call returns a new rule set, so the
//! finished set is an immutable, shareable value.

pub mod error;
pub mod macros;
pub mod rule_set;

pub use error::RuleError;
pub use rule_set::{Binding, RuleSet};
