//! Built-in field rules.
//!
//! Every built-in rule is a [`Rule`] wrapping a small [`RuleKind`]. The
//! wrapper owns the override message and the skip-if-zero flag; the kind only
//! decides whether a present value violates it.

use crate::builder::error::RuleError;
use crate::core::{FieldPath, Number, Value, ValueKind};
use crate::export::RuleDescriptor;
use crate::validation::violations::Violation;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

/// Grammar accepted by [`email`].
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// A rule bound to a field path.
pub trait FieldRule: Send + Sync + 'static {
    /// Rule name used in configuration errors and logs.
    fn name(&self) -> &'static str;

    /// Check the value found at `field`. Returns at most one violation.
    fn check(&self, field: &FieldPath, value: &Value) -> Option<Violation>;

    /// Whether the rule can be bound to a field of this kind.
    fn supports(&self, _kind: ValueKind) -> bool {
        true
    }

    /// Serializable description, `None` when the rule is not exportable.
    fn describe(&self) -> Option<RuleDescriptor> {
        None
    }
}

/// The predicate part of a built-in rule.
pub trait RuleKind: Send + Sync + 'static {
    const NAME: &'static str;

    /// Whether a value violates the rule.
    fn violates(&self, value: &Value) -> bool;

    fn default_message(&self, field: &str) -> String;

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor;

    fn supports(&self, _kind: ValueKind) -> bool {
        true
    }
}

/// Kinds that accept [`Rule::optional`].
pub trait SkipsZero: RuleKind {}

/// A configured built-in rule.
#[derive(Clone, Debug)]
pub struct Rule<K> {
    kind: K,
    message: Option<String>,
    optional: bool,
}

impl<K: RuleKind> Rule<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            message: None,
            optional: false,
        }
    }

    /// Replace the default violation message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl<K: SkipsZero> Rule<K> {
    /// Skip validation when the value is zero (empty text, 0, absent).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl<K: RuleKind> FieldRule for Rule<K> {
    fn name(&self) -> &'static str {
        K::NAME
    }

    fn check(&self, field: &FieldPath, value: &Value) -> Option<Violation> {
        if self.optional && value.is_zero() {
            return None;
        }
        if !self.kind.violates(value) {
            return None;
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| self.kind.default_message(field.name()));
        Some(Violation::new(message, field.clone()))
    }

    fn supports(&self, kind: ValueKind) -> bool {
        self.kind.supports(kind)
    }

    fn describe(&self) -> Option<RuleDescriptor> {
        Some(self.kind.descriptor(self.message.clone()))
    }
}

/// Field must not be zero.
#[derive(Clone, Debug, Default)]
pub struct Required;

impl RuleKind for Required {
    const NAME: &'static str = "required";

    fn violates(&self, value: &Value) -> bool {
        value.is_zero()
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please enter the {field}")
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Required { message }
    }
}

/// Text must have at least `min` characters.
#[derive(Clone, Debug)]
pub struct MinLength {
    pub min: usize,
}

impl RuleKind for MinLength {
    const NAME: &'static str = "minLength";

    fn violates(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => text.chars().count() < self.min,
            None => true,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "Please lengthen {field} to {} characters or more",
            self.min
        )
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::MinLength {
            min: self.min,
            message,
        }
    }
}

impl SkipsZero for MinLength {}

/// Text must have at most `max` characters.
#[derive(Clone, Debug)]
pub struct MaxLength {
    pub max: usize,
}

impl RuleKind for MaxLength {
    const NAME: &'static str = "maxLength";

    fn violates(&self, value: &Value) -> bool {
        value
            .as_text()
            .is_some_and(|text| text.chars().count() > self.max)
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please shorten {field} to {} characters or less", self.max)
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::MaxLength {
            max: self.max,
            message,
        }
    }
}

/// Number must be at least `min`.
#[derive(Clone, Debug)]
pub struct Min {
    pub min: Number,
}

impl RuleKind for Min {
    const NAME: &'static str = "min";

    fn violates(&self, value: &Value) -> bool {
        match self.min.compare(value) {
            Some(ordering) => ordering == Ordering::Less,
            None => value.is_absent(),
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please increase {field} to be {} or more", self.min)
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Min {
            min: self.min,
            message,
        }
    }

    fn supports(&self, kind: ValueKind) -> bool {
        kind.is_numeric()
    }
}

impl SkipsZero for Min {}

/// Number must be at most `max`.
#[derive(Clone, Debug)]
pub struct Max {
    pub max: Number,
}

impl RuleKind for Max {
    const NAME: &'static str = "max";

    fn violates(&self, value: &Value) -> bool {
        self.max.compare(value) == Some(Ordering::Greater)
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please decrease {field} to be {} or less", self.max)
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Max {
            max: self.max,
            message,
        }
    }

    fn supports(&self, kind: ValueKind) -> bool {
        kind.is_numeric()
    }
}

/// Text must contain a match of the expression.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub re: Regex,
}

impl RuleKind for Pattern {
    const NAME: &'static str = "pattern";

    fn violates(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => !self.re.is_match(text),
            None => true,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please correct {field} into a valid format")
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Pattern {
            pattern: self.re.as_str().to_string(),
            message,
        }
    }
}

impl SkipsZero for Pattern {}

/// Text must be an email address.
#[derive(Clone, Debug, Default)]
pub struct Email;

impl RuleKind for Email {
    const NAME: &'static str = "email";

    fn violates(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => !is_email(text),
            None => true,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please use a valid email address for {field}")
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Type {
            format: "email".to_string(),
            pattern: EMAIL_PATTERN.to_string(),
            message,
        }
    }
}

impl SkipsZero for Email {}

/// Value must equal one of the allowed values.
#[derive(Clone, Debug)]
pub struct Options {
    pub options: Vec<Value>,
}

impl RuleKind for Options {
    const NAME: &'static str = "options";

    fn violates(&self, value: &Value) -> bool {
        !self.options.contains(value)
    }

    fn default_message(&self, field: &str) -> String {
        format!("Please select one of the valid options for {field}")
    }

    fn descriptor(&self, message: Option<String>) -> RuleDescriptor {
        RuleDescriptor::Options {
            options: self.options.clone(),
            message,
        }
    }
}

/// Field must not be zero.
pub fn required() -> Rule<Required> {
    Rule::new(Required)
}

/// Text must have at least `min` characters (code points, not bytes).
pub fn min_length(min: usize) -> Rule<MinLength> {
    Rule::new(MinLength { min })
}

/// Text must have at most `max` characters (code points, not bytes).
pub fn max_length(max: usize) -> Rule<MaxLength> {
    Rule::new(MaxLength { max })
}

/// Integer or float field must be at least `min`.
pub fn min(min: impl Into<Number>) -> Rule<Min> {
    Rule::new(Min { min: min.into() })
}

/// Integer or float field must be at most `max`.
pub fn max(max: impl Into<Number>) -> Rule<Max> {
    Rule::new(Max { max: max.into() })
}

/// Text must match `pattern` anywhere, unless the pattern anchors itself.
///
/// # Errors
///
/// Returns [`RuleError::InvalidPattern`] if the expression does not compile.
pub fn pattern(pattern: &str) -> Result<Rule<Pattern>, RuleError> {
    Ok(Rule::new(Pattern {
        re: Regex::new(pattern)?,
    }))
}

/// Text must be a valid email address.
pub fn email() -> Rule<Email> {
    Rule::new(Email)
}

/// Value must be one of `options`. Values of different kinds never match.
pub fn options<I, V>(options: I) -> Rule<Options>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Rule::new(Options {
        options: options.into_iter().map(Into::into).collect(),
    })
}

pub fn is_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// Anything that can be bound to a field in one call: a single rule, a
/// tuple of rules or a prepared list.
pub trait IntoFieldRules {
    fn into_field_rules(self) -> Vec<Arc<dyn FieldRule>>;
}

impl<T: FieldRule> IntoFieldRules for T {
    fn into_field_rules(self) -> Vec<Arc<dyn FieldRule>> {
        vec![Arc::new(self)]
    }
}

impl IntoFieldRules for Vec<Arc<dyn FieldRule>> {
    fn into_field_rules(self) -> Vec<Arc<dyn FieldRule>> {
        self
    }
}

macro_rules! tuple_field_rules {
    ($($name:ident),+) => {
        impl<$($name: FieldRule),+> IntoFieldRules for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_field_rules(self) -> Vec<Arc<dyn FieldRule>> {
                let ($($name,)+) = self;
                vec![$(Arc::new($name) as Arc<dyn FieldRule>),+]
            }
        }
    };
}

tuple_field_rules!(A);
tuple_field_rules!(A, B);
tuple_field_rules!(A, B, C);
tuple_field_rules!(A, B, C, D);
tuple_field_rules!(A, B, C, D, E);
tuple_field_rules!(A, B, C, D, E, F);
