//! Fieldcheck: declarative validation rules for structured records
//!
//! Rules are bound to fields by selecting them with a closure over the record
//! type, so renaming a field breaks the build instead of silently breaking
//! validation. A finished rule set validates records, collecting every
//! violation, and exports a description of its rules for remote clients.
//!
//! # Core Concepts
//!
//! - **Record**: A struct that reports its declared fields via the `Record` trait
//! - **Rules**: Built-in checks (`required`, `min_length`, `email`, ...) and custom functions
//! - **RuleSet**: An immutable, ordered binding of rules to fields
//! - **Violations**: Every broken rule, in binding order or keyed by field name
//!
//! # Example
//!
//! ```rust
//! use fieldcheck::{record, RuleSet};
//! use fieldcheck::validation::{email, max_length, min, required};
//!
//! #[derive(Default)]
//! struct Signup {
//!     name: String,
//!     email: String,
//!     age: i64,
//! }
//!
//! record! {
//!     Signup {
//!         name => "name",
//!         email => "email",
//!         age => "age",
//!     }
//! }
//!
//! let rules = RuleSet::<Signup>::new()
//!     .field(|r| &r.name, (required(), max_length(20)))?
//!     .field(|r| &r.email, email().optional())?
//!     .field(|r| &r.age, min(18).message("Adults only"))?;
//!
//! let signup = Signup {
//!     name: String::new(),
//!     email: "not-an-address".to_string(),
//!     age: 12,
//! };
//!
//! let errs = rules.validate(&signup).unwrap_err();
//! assert_eq!(errs.len(), 3);
//! assert_eq!(errs.to_map().get("age").unwrap().message(), "Adults only");
//!
//! let json = rules.export().to_json()?;
//! assert!(json.starts_with(r#"{"name":[{"rule":"required"}"#));
//! # Ok::<(), fieldcheck::RuleError>(())
//! ```

pub mod builder;
pub mod core;
pub mod export;
pub mod validation;

// Re-export commonly used types
pub use builder::{RuleError, RuleSet};
pub use core::{FieldPath, Record, Value};
pub use export::{RuleDescriptor, RuleExport};
pub use validation::{Violation, ViolationMap, Violations};
