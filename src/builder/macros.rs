//! Macros for declaring records.

/// Generate a [`Record`](crate::core::Record) implementation for a struct.
///
/// Fields are listed in declaration order, each with an optional rename tag.
/// Only the first comma-delimited token of a tag is used as the export name.
/// Embedded sub-records, whose own fields are flattened into the parent's
/// paths, are marked with `embed`. Fields are visited in the order listed,
/// leaves and embedded records alike.
///
/// # Example
///
/// ```
/// use fieldcheck::record;
///
/// #[derive(Default)]
/// struct Inner {
///     deep: i64,
/// }
///
/// #[derive(Default)]
/// struct Outer {
///     name: String,
///     inner: Inner,
///     count: i64,
/// }
///
/// record! {
///     Inner { deep => "deep" }
/// }
///
/// record! {
///     Outer {
///         name => "name,omitempty",
///         embed inner => "inner",
///         count,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@fields $visitor:ident $this:ident;) => {};
    (
        @fields $visitor:ident $this:ident;
        embed $field:ident $(=> $tag:literal)? $(, $($rest:tt)*)?
    ) => {
        $visitor.embed(
            $crate::core::FieldDecl::new(stringify!($field))$(.tag($tag))?,
            &$this.$field,
        );
        $crate::record!(@fields $visitor $this; $($($rest)*)?);
    };
    (
        @fields $visitor:ident $this:ident;
        $field:ident $(=> $tag:literal)? $(, $($rest:tt)*)?
    ) => {
        $visitor.leaf(
            $crate::core::FieldDecl::new(stringify!($field))$(.tag($tag))?,
            &$this.$field,
        );
        $crate::record!(@fields $visitor $this; $($($rest)*)?);
    };
    ($name:ident { $($body:tt)* }) => {
        impl $crate::core::Record for $name {
            #[allow(unused_variables)]
            fn visit_fields<V: $crate::core::FieldVisitor>(&self, visitor: &mut V) {
                let this = self;
                $crate::record!(@fields visitor this; $($body)*);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{decompose, resolve, FieldPath, Value};

    #[derive(Default)]
    struct Leaf {
        deep: i64,
    }

    #[derive(Default)]
    struct Tree {
        label: String,
        count: i64,
        leaf: Leaf,
    }

    record! {
        Leaf { deep => "deep" }
    }

    record! {
        Tree {
            label => "label,omitempty",
            count,
            embed leaf => "leaf",
        }
    }

    #[test]
    fn record_macro_uses_tags_and_declared_names() {
        let tree = Tree {
            label: "x".to_string(),
            count: 2,
            leaf: Leaf { deep: 7 },
        };
        let fields = decompose(&tree);

        assert_eq!(fields.get("label"), Some(&Value::from("x")));
        assert_eq!(fields.get("count"), Some(&Value::Int(2)));
        assert_eq!(
            fields.get("leaf").and_then(Value::as_map).and_then(|m| m.get("deep")),
            Some(&Value::Int(7))
        );
    }

    #[test]
    fn record_macro_resolves_embedded_fields() {
        let tree = Tree::default();
        let resolved = resolve(&tree, &tree.leaf.deep).unwrap();
        assert_eq!(resolved.path, FieldPath::new(["leaf", "deep"]));
    }

    #[test]
    fn record_macro_works_without_embedded_fields() {
        struct Flat {
            only: bool,
        }

        record! {
            Flat { only }
        }

        let fields = decompose(&Flat { only: true });
        assert_eq!(fields.get("only"), Some(&Value::Bool(true)));
    }

    #[test]
    fn record_macro_visits_in_declaration_order() {
        #[derive(Default)]
        struct Named {
            x: String,
        }

        struct Clash {
            named: Named,
            x: String,
        }

        record! {
            Named { x => "inner_x" }
        }

        record! {
            Clash {
                embed named => "x",
                x,
            }
        }

        let clash = Clash {
            named: Named::default(),
            x: "leaf".to_string(),
        };
        let fields = decompose(&clash);
        assert!(matches!(fields.get("x"), Some(Value::Record(_))));
    }

    #[test]
    fn field_named_embed_is_a_plain_leaf() {
        struct Odd {
            embed: i64,
        }

        record! {
            Odd { embed => "embed" }
        }

        assert_eq!(decompose(&Odd { embed: 4 }).get("embed"), Some(&Value::Int(4)));
    }
}
