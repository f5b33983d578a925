//! Field resolution by identity.
//!
//! A field reference is matched against a record's declared fields by
//! address and type, never by name. The record's own fields are visited
//! depth first; embedded sub-records are always searched, because their
//! members live inside the parent's address range. An embedded record and its
//! first field can share an address, so the deeper match is preferred and the
//! sub-record itself only matches when nothing inside it does.

use super::path::FieldPath;
use super::record::{FieldDecl, FieldVisitor, Record};
use super::value::{FieldValue, ValueKind};
use crate::builder::error::RuleError;
use std::any::{type_name, TypeId};

/// A field located inside a record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    pub path: FieldPath,
    /// Static kind of the field, `Map` for an embedded sub-record.
    pub kind: ValueKind,
}

/// Resolve `target`, a reference into `record`, to its export-name path.
///
/// # Errors
///
/// Returns [`RuleError::FieldNotFound`] when no declared field of `record`,
/// searching through embedded sub-records, is `target`.
///
/// # Example
///
/// ```rust
/// use fieldcheck::core::resolve;
/// use fieldcheck::record;
///
/// #[derive(Default)]
/// struct Deep { value: i64 }
/// #[derive(Default)]
/// struct Outer { deep: Deep, label: String }
///
/// record! { Deep { value => "deepValue" } }
/// record! { Outer { embed deep, label } }
///
/// let outer = Outer::default();
/// let resolved = resolve(&outer, &outer.deep.value).unwrap();
/// assert_eq!(resolved.path.segments(), ["deep", "deepValue"]);
/// ```
pub fn resolve<R: Record, T: 'static>(record: &R, target: &T) -> Result<ResolvedField, RuleError> {
    let mut locator = Locator::new(Target::of(target));
    record.visit_fields(&mut locator);
    locator.found.ok_or_else(|| RuleError::FieldNotFound {
        record: type_name::<R>(),
        field_type: type_name::<T>(),
    })
}

#[derive(Clone, Copy)]
struct Target {
    addr: usize,
    type_id: TypeId,
}

impl Target {
    fn of<T: 'static>(value: &T) -> Self {
        Self {
            addr: value as *const T as usize,
            type_id: TypeId::of::<T>(),
        }
    }

    fn is<T: 'static>(&self, value: &T) -> bool {
        let candidate = Target::of(value);
        candidate.addr == self.addr && candidate.type_id == self.type_id
    }
}

struct Locator {
    target: Target,
    found: Option<ResolvedField>,
}

impl Locator {
    fn new(target: Target) -> Self {
        Self {
            target,
            found: None,
        }
    }
}

impl FieldVisitor for Locator {
    fn leaf<T: FieldValue>(&mut self, decl: FieldDecl, value: &T) {
        if self.found.is_some() || !self.target.is(value) {
            return;
        }
        self.found = Some(ResolvedField {
            path: FieldPath::new([decl.export_name()]),
            kind: T::kind(),
        });
    }

    fn embed<E: Record>(&mut self, decl: FieldDecl, value: &E) {
        if self.found.is_some() {
            return;
        }

        let mut inner = Locator::new(self.target);
        value.visit_fields(&mut inner);

        self.found = match inner.found {
            Some(deeper) => Some(ResolvedField {
                path: deeper.path.prefixed(decl.export_name()),
                kind: deeper.kind,
            }),
            None if self.target.is(value) => Some(ResolvedField {
                path: FieldPath::new([decl.export_name()]),
                kind: ValueKind::Map,
            }),
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Deep {
        deep_int: i64,
    }

    impl Record for Deep {
        fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) {
            visitor.leaf(FieldDecl::new("DeepInt").tag("deepInt"), &self.deep_int);
        }
    }

    #[derive(Default)]
    struct Embed {
        deep: Deep,
        embed_str: String,
        embed_float: f32,
    }

    impl Record for Embed {
        fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) {
            visitor.embed(FieldDecl::new("Deep").tag("deep"), &self.deep);
            visitor.leaf(FieldDecl::new("EmbedStr").tag("embedStr"), &self.embed_str);
            visitor.leaf(
                FieldDecl::new("EmbedFloat").tag("embedFloat"),
                &self.embed_float,
            );
        }
    }

    #[derive(Default)]
    struct Nested {
        embed: Embed,
        top: String,
        unregistered: String,
    }

    impl Record for Nested {
        fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) {
            visitor.embed(FieldDecl::new("Embed"), &self.embed);
            visitor.leaf(FieldDecl::new("Top"), &self.top);
        }
    }

    #[test]
    fn top_level_field_has_one_segment() {
        let n = Nested::default();
        let resolved = resolve(&n, &n.top).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Top"]));
        assert_eq!(resolved.kind, ValueKind::Text);
    }

    #[test]
    fn one_level_of_embedding_has_two_segments() {
        let n = Nested::default();
        let resolved = resolve(&n, &n.embed.embed_str).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Embed", "embedStr"]));

        let resolved = resolve(&n, &n.embed.embed_float).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Embed", "embedFloat"]));
        assert_eq!(resolved.kind, ValueKind::Float);
    }

    #[test]
    fn two_levels_of_embedding_have_three_segments() {
        let n = Nested::default();
        let resolved = resolve(&n, &n.embed.deep.deep_int).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Embed", "deep", "deepInt"]));
        assert_eq!(resolved.kind, ValueKind::Int);
    }

    #[test]
    fn embedded_record_itself_resolves_to_its_own_segment() {
        let n = Nested::default();

        // `embed`, `deep` and `deep_int` may all share one address; the type
        // tells them apart.
        let resolved = resolve(&n, &n.embed).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Embed"]));
        assert_eq!(resolved.kind, ValueKind::Map);

        let resolved = resolve(&n, &n.embed.deep).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["Embed", "deep"]));
    }

    #[test]
    fn undeclared_field_is_not_found() {
        let n = Nested::default();
        let err = resolve(&n, &n.unregistered).unwrap_err();
        assert!(matches!(err, RuleError::FieldNotFound { .. }));
    }

    #[test]
    fn reference_outside_the_record_is_not_found() {
        let n = Nested::default();
        let other = Nested::default();
        assert!(resolve(&n, &other.top).is_err());
    }
}
