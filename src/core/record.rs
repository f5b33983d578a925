//! Records and their declared fields.
//!
//! A [`Record`] reports its declared fields to a [`FieldVisitor`], one call
//! per field, distinguishing plain leaves from embedded sub-records. Both the
//! field resolver and the decomposition step are visitors, so a record's
//! naming rules are declared exactly once.

use super::value::{FieldMap, FieldValue, Value};

/// Declaration of a single field: its Rust name and optional rename tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    name: &'static str,
    tag: Option<&'static str>,
}

impl FieldDecl {
    pub const fn new(name: &'static str) -> Self {
        Self { name, tag: None }
    }

    /// Attach a rename tag such as `"number,omitempty"`.
    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn declared_name(&self) -> &'static str {
        self.name
    }

    /// Name used in field paths, exports and decomposed maps.
    ///
    /// Only the first comma-delimited token of the tag is used; an empty
    /// token falls back to the declared name.
    pub fn export_name(&self) -> &'static str {
        match self.tag.and_then(|tag| tag.split(',').next()) {
            Some(name) if !name.is_empty() => name,
            _ => self.name,
        }
    }
}

/// Receiver of a record's declared fields.
pub trait FieldVisitor {
    /// A plain field holding a leaf value.
    fn leaf<T: FieldValue>(&mut self, decl: FieldDecl, value: &T);

    /// An embedded sub-record whose fields are flattened into the parent.
    fn embed<E: Record>(&mut self, decl: FieldDecl, value: &E);
}

/// An aggregate that can be validated field by field.
///
/// Usually implemented with the [`record!`](crate::record) macro:
///
/// ```rust
/// use fieldcheck::record;
///
/// #[derive(Default)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Default)]
/// struct Customer {
///     name: String,
///     tax: i64,
///     address: Address,
/// }
///
/// record! {
///     Address { city => "city" }
/// }
///
/// record! {
///     Customer {
///         name => "name",
///         tax,
///         embed address => "address",
///     }
/// }
/// ```
pub trait Record: 'static {
    /// Report every declared field, in declaration order.
    fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V);
}

/// Decompose a record into a nested map keyed by export name.
///
/// Embedded sub-records become nested [`Value::Record`] maps. When two fields
/// of one map share an export name, the first one declared is kept.
pub fn decompose<R: Record>(record: &R) -> FieldMap {
    let mut decomposer = Decomposer::default();
    record.visit_fields(&mut decomposer);
    decomposer.map
}

#[derive(Default)]
struct Decomposer {
    map: FieldMap,
}

impl FieldVisitor for Decomposer {
    fn leaf<T: FieldValue>(&mut self, decl: FieldDecl, value: &T) {
        self.map
            .entry(decl.export_name().to_string())
            .or_insert_with(|| value.to_value());
    }

    fn embed<E: Record>(&mut self, decl: FieldDecl, value: &E) {
        self.map
            .entry(decl.export_name().to_string())
            .or_insert_with(|| Value::Record(decompose(value)));
    }
}
