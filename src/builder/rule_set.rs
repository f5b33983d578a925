//! Rule sets: ordered field and record bindings for one record type.

use crate::builder::error::RuleError;
use crate::core::{decompose, resolve, FieldMap, FieldPath, Record, Value};
use crate::export::RuleExport;
use crate::validation::{
    FieldRule, IntoFieldRules, IntoRecordRules, RecordRule, Violation, Violations,
};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace};

static ABSENT: Value = Value::Absent;

/// A rule bound into a rule set.
pub enum Binding<R> {
    /// Rule applied to the value found at `path`.
    Field {
        path: FieldPath,
        rule: Arc<dyn FieldRule>,
    },
    /// Rule applied to the whole record.
    Record(Arc<dyn RecordRule<R>>),
}

impl<R: 'static> Binding<R> {
    /// Bound path, empty for record rules.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Binding::Field { path, .. } => Some(path),
            Binding::Record(_) => None,
        }
    }

    fn check(&self, fields: &FieldMap, subject: &R) -> Option<Violation> {
        match self {
            Binding::Field { path, rule } => {
                let value = locate(fields, path);
                trace!(field = %path, rule = rule.name(), "checking field");
                rule.check(path, value)
            }
            Binding::Record(rule) => {
                trace!("checking record");
                rule.check(subject)
            }
        }
    }
}

impl<R> Clone for Binding<R> {
    fn clone(&self) -> Self {
        match self {
            Binding::Field { path, rule } => Binding::Field {
                path: path.clone(),
                rule: Arc::clone(rule),
            },
            Binding::Record(rule) => Binding::Record(Arc::clone(rule)),
        }
    }
}

impl<R> fmt::Debug for Binding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Field { path, rule } => f
                .debug_struct("Field")
                .field("path", &path.to_string())
                .field("rule", &rule.name())
                .finish(),
            Binding::Record(_) => f.write_str("Record"),
        }
    }
}

/// Ordered rules for records of type `R`.
///
/// Binding calls never modify a rule set; they return a new one sharing the
/// already bound rules, so partially built sets can be forked and reused.
///
/// # Example
///
/// ```rust
/// use fieldcheck::builder::RuleSet;
/// use fieldcheck::record;
/// use fieldcheck::validation::{min, min_length};
///
/// #[derive(Default)]
/// struct Invoice {
///     name: String,
///     tax: i64,
/// }
///
/// record! {
///     Invoice { name => "name", tax => "tax" }
/// }
///
/// let rules = RuleSet::<Invoice>::new()
///     .field(|r| &r.name, min_length(4).optional())?
///     .field(|r| &r.tax, min(0))?;
///
/// let errs = rules
///     .validate(&Invoice { name: String::new(), tax: -1 })
///     .unwrap_err();
/// assert_eq!(errs.len(), 1);
/// assert_eq!(errs[0].field().name(), "tax");
/// # Ok::<(), fieldcheck::builder::RuleError>(())
/// ```
pub struct RuleSet<R: Record> {
    template: Arc<R>,
    bindings: Vec<Binding<R>>,
}

impl<R: Record + Default> RuleSet<R> {
    /// Create an empty rule set resolving fields against `R::default()`.
    pub fn new() -> Self {
        Self::for_record(R::default())
    }
}

impl<R: Record + Default> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RuleSet<R> {
    /// Create an empty rule set resolving fields against `template`.
    pub fn for_record(template: R) -> Self {
        Self {
            template: Arc::new(template),
            bindings: Vec::new(),
        }
    }

    /// Bind rules to the field returned by `select`.
    ///
    /// `select` must return a reference to a declared field of the record,
    /// possibly inside embedded sub-records.
    ///
    /// # Errors
    ///
    /// - [`RuleError::FieldNotFound`] if the reference is not a declared field
    /// - [`RuleError::UnsupportedKind`] if a rule cannot check the field's kind
    pub fn field<T, F, V>(&self, select: F, rules: V) -> Result<Self, RuleError>
    where
        T: 'static,
        F: FnOnce(&R) -> &T,
        V: IntoFieldRules,
    {
        let template = self.template.as_ref();
        let resolved = resolve(template, select(template))?;
        let rules = rules.into_field_rules();

        if let Some(rule) = rules.iter().find(|rule| !rule.supports(resolved.kind)) {
            return Err(RuleError::UnsupportedKind {
                rule: rule.name(),
                kind: resolved.kind,
                field: resolved.path.to_string(),
            });
        }

        debug!(
            field = %resolved.path,
            kind = %resolved.kind,
            rules = rules.len(),
            "binding field rules"
        );

        let mut next = self.clone();
        next.bindings
            .extend(rules.into_iter().map(|rule| Binding::Field {
                path: resolved.path.clone(),
                rule,
            }));
        Ok(next)
    }

    /// Bind rules to the whole record: a single rule, a tuple of rules or a
    /// `Vec<Arc<dyn RecordRule<R>>>`.
    pub fn record<M, V: IntoRecordRules<R, M>>(&self, rules: V) -> Self {
        let rules = rules.into_record_rules();
        debug!(rules = rules.len(), "binding record rules");
        let mut next = self.clone();
        next.bindings.extend(rules.into_iter().map(Binding::Record));
        next
    }

    /// Bound rules in binding order.
    pub fn bindings(&self) -> &[Binding<R>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Run every bound rule against `subject`, collecting ALL violations.
    ///
    /// Returns `Ok(())` when nothing is violated, otherwise the violations in
    /// binding order.
    pub fn validate(&self, subject: &R) -> Result<(), Violations> {
        let fields = decompose(subject);

        let checks: Vec<Validation<(), NonEmptyVec<Violation>>> = self
            .bindings
            .iter()
            .map(|binding| match binding.check(&fields, subject) {
                Some(violation) => Validation::fail(violation),
                None => Validation::success(()),
            })
            .collect();

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Success(_) => {
                debug!(rules = self.bindings.len(), "validation passed");
                Ok(())
            }
            Validation::Failure(errors) => {
                let violations: Violations = errors.iter().cloned().collect();
                debug!(
                    rules = self.bindings.len(),
                    violations = violations.len(),
                    "validation failed"
                );
                Err(violations)
            }
        }
    }

    /// Describe the exportable rules, grouped by terminal field name.
    pub fn export(&self) -> RuleExport {
        let mut export = RuleExport::default();
        for binding in &self.bindings {
            if let Binding::Field { path, rule } = binding {
                if let Some(descriptor) = rule.describe() {
                    export.push(path.name(), descriptor);
                }
            }
        }
        debug!(fields = export.len(), "exported rules");
        export
    }
}

impl<R: Record> Clone for RuleSet<R> {
    fn clone(&self) -> Self {
        Self {
            template: Arc::clone(&self.template),
            bindings: self.bindings.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("record", &std::any::type_name::<R>())
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl<R: Record> Serialize for RuleSet<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.export().serialize(serializer)
    }
}

/// Walk `path` through nested maps. Anything missing is absent.
fn locate<'a>(fields: &'a FieldMap, path: &FieldPath) -> &'a Value {
    let Some((last, parents)) = path.segments().split_last() else {
        return &ABSENT;
    };

    let mut current = fields;
    for segment in parents {
        match current.get(segment) {
            Some(Value::Record(inner)) | Some(Value::Map(inner)) => current = inner,
            _ => return &ABSENT,
        }
    }
    current.get(last).unwrap_or(&ABSENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldDecl, FieldVisitor};
    use crate::validation::{field_fn, max_length, min, min_length, record_fn, required};

    #[derive(Default)]
    struct Account {
        name: String,
        tax: i64,
    }

    impl Record for Account {
        fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) {
            visitor.leaf(FieldDecl::new("Name"), &self.name);
            visitor.leaf(FieldDecl::new("Tax"), &self.tax);
        }
    }

    #[test]
    fn optional_empty_field_is_skipped() {
        let rules = RuleSet::<Account>::new()
            .field(|r| &r.name, min_length(4).optional())
            .unwrap()
            .field(|r| &r.tax, min(0))
            .unwrap();

        let errs = rules
            .validate(&Account {
                name: String::new(),
                tax: -1,
            })
            .unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field(), &FieldPath::new(["Tax"]));
    }

    #[test]
    fn all_rules_run_without_early_exit() {
        let rules = RuleSet::<Account>::new()
            .field(|r| &r.name, (required(), min_length(3)))
            .unwrap()
            .field(|r| &r.tax, min(1))
            .unwrap();

        let errs = rules.validate(&Account::default()).unwrap_err();
        let names: Vec<&str> = errs.iter().map(|e| e.field().name()).collect();
        assert_eq!(names, vec!["Name", "Name", "Tax"]);
    }

    #[test]
    fn passing_record_returns_ok() {
        let rules = RuleSet::<Account>::new()
            .field(|r| &r.name, required())
            .unwrap();
        assert!(rules
            .validate(&Account {
                name: "ok".to_string(),
                tax: 0
            })
            .is_ok());
        assert!(RuleSet::<Account>::new()
            .validate(&Account::default())
            .is_ok());
    }

    #[test]
    fn binding_returns_a_new_rule_set() {
        let base = RuleSet::<Account>::new().field(|r| &r.name, required()).unwrap();
        let forked = base.field(|r| &r.tax, min(1)).unwrap();
        let other = base.field(|r| &r.name, max_length(1)).unwrap();

        assert_eq!(base.len(), 1);
        assert_eq!(forked.len(), 2);
        assert_eq!(other.len(), 2);
        assert!(base.validate(&Account { name: "ab".into(), tax: 0 }).is_ok());
        assert!(forked.validate(&Account { name: "ab".into(), tax: 0 }).is_err());
    }

    #[test]
    fn numeric_rule_on_text_field_is_rejected() {
        let err = RuleSet::<Account>::new()
            .field(|r| &r.name, min(1))
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnsupportedKind { rule: "min", .. }
        ));
    }

    #[test]
    fn record_rule_sees_subject() {
        let rules = RuleSet::<Account>::new().record(record_fn(|a: &Account| {
            (a.tax < a.name.len() as i64).then(|| Violation::record("name too long for tax"))
        }));

        assert!(rules.validate(&Account { name: "ab".into(), tax: 5 }).is_ok());
        let errs = rules
            .validate(&Account { name: "abc".into(), tax: 1 })
            .unwrap_err();
        assert!(errs[0].field().is_empty());
        assert_eq!(errs.to_string(), "name too long for tax.");
    }

    #[test]
    fn custom_field_fn_sees_located_value() {
        let rules = RuleSet::<Account>::new()
            .field(
                |r| &r.name,
                field_fn(|field, value| {
                    (value.as_text() == Some("admin"))
                        .then(|| Violation::new("reserved", field.clone()))
                }),
            )
            .unwrap();

        assert!(rules.validate(&Account { name: "alice".into(), tax: 0 }).is_ok());
        assert_eq!(
            rules
                .validate(&Account { name: "admin".into(), tax: 0 })
                .unwrap_err()
                .len(),
            1
        );
        assert!(rules.export().is_empty());
    }

    #[test]
    fn rule_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleSet<Account>>();

        let rules = RuleSet::<Account>::new().field(|r| &r.tax, min(1)).unwrap();
        let handle = {
            let rules = rules.clone();
            std::thread::spawn(move || rules.validate(&Account::default()).is_err())
        };
        assert!(handle.join().unwrap());
    }

    #[test]
    fn locate_treats_missing_segments_as_absent() {
        let mut inner = FieldMap::new();
        inner.insert("deep".to_string(), Value::Int(3));
        let mut fields = FieldMap::new();
        fields.insert("outer".to_string(), Value::Map(inner));
        fields.insert("flat".to_string(), Value::Int(1));

        assert_eq!(
            locate(&fields, &FieldPath::new(["outer", "deep"])),
            &Value::Int(3)
        );
        assert!(locate(&fields, &FieldPath::new(["outer", "missing"])).is_absent());
        assert!(locate(&fields, &FieldPath::new(["flat", "deep"])).is_absent());
        assert!(locate(&fields, &FieldPath::root()).is_absent());
    }
}
