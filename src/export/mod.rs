//! Serializable description of a rule set.
//!
//! An export carries the rule kinds and their parameters, grouped by the
//! terminal export name of the field they are bound to, so a remote client can
//! apply equivalent checks. Executable logic (custom functions) is not
//! included.
//!
//! ```json
//! {
//!   "Str": [{"rule": "required"}, {"rule": "maxLength", "max": 5}],
//!   "number": [{"rule": "min", "min": 10, "message": "my message"}]
//! }
//! ```

use crate::builder::error::RuleError;
use crate::core::{Number, Value};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Description of one exportable rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum RuleDescriptor {
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MinLength {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Min {
        min: Number,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Max {
        max: Number,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// A named format such as `email`, with the pattern clients should use.
    #[serde(rename = "type")]
    Type {
        #[serde(rename = "type")]
        format: String,
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Options {
        options: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl RuleDescriptor {
    /// The `rule` discriminator as it appears on the wire.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::MinLength { .. } => "minLength",
            Self::MaxLength { .. } => "maxLength",
            Self::Min { .. } => "min",
            Self::Max { .. } => "max",
            Self::Pattern { .. } => "pattern",
            Self::Type { .. } => "type",
            Self::Options { .. } => "options",
        }
    }

    /// Override message, if one was set.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Required { message }
            | Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::Pattern { message, .. }
            | Self::Type { message, .. }
            | Self::Options { message, .. } => message.as_deref(),
        }
    }
}

/// Exported rules grouped by terminal field name.
///
/// Fields appear in the order they were first bound; rules within a field
/// keep their binding order. The JSON form is an object with the same order.
///
/// Parsing keeps the JSON form, not the original value kinds: timestamp and
/// UUID options are read back as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleExport {
    fields: Vec<(String, Vec<RuleDescriptor>)>,
}

impl RuleExport {
    /// Append a rule to the group of `field`, creating the group if needed.
    pub fn push(&mut self, field: &str, descriptor: RuleDescriptor) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, rules)) => rules.push(descriptor),
            None => self.fields.push((field.to_string(), vec![descriptor])),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[RuleDescriptor]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleDescriptor])> + '_ {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    /// Number of fields with at least one exported rule.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Serialize for RuleExport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, rules) in &self.fields {
            map.serialize_entry(name, rules)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleExport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExportVisitor;

        impl<'de> Visitor<'de> for ExportVisitor {
            type Value = RuleExport;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to rule lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RuleExport, A::Error> {
                let mut export = RuleExport::default();
                while let Some((name, rules)) =
                    access.next_entry::<String, Vec<RuleDescriptor>>()?
                {
                    for rule in rules {
                        export.push(&name, rule);
                    }
                }
                Ok(export)
            }
        }

        deserializer.deserialize_map(ExportVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_omits_unset_message() {
        let required = RuleDescriptor::Required { message: None };
        assert_eq!(
            serde_json::to_string(&required).unwrap(),
            r#"{"rule":"required"}"#
        );

        let min = RuleDescriptor::Min {
            min: Number::Int(10),
            message: Some("my message".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&min).unwrap(),
            r#"{"rule":"min","min":10,"message":"my message"}"#
        );
    }

    #[test]
    fn email_descriptor_is_a_type_rule() {
        let email = RuleDescriptor::Type {
            format: "email".to_string(),
            pattern: "^.+@.+$".to_string(),
            message: None,
        };
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            r#"{"rule":"type","type":"email","pattern":"^.+@.+$"}"#
        );
        assert_eq!(email.rule(), "type");
    }

    #[test]
    fn export_keeps_insertion_order() {
        let mut export = RuleExport::default();
        export.push("Str", RuleDescriptor::Required { message: None });
        export.push(
            "number",
            RuleDescriptor::Min {
                min: Number::Int(10),
                message: None,
            },
        );
        export.push(
            "Str",
            RuleDescriptor::MaxLength {
                max: 5,
                message: None,
            },
        );

        assert_eq!(
            export.to_json().unwrap(),
            r#"{"Str":[{"rule":"required"},{"rule":"maxLength","max":5}],"number":[{"rule":"min","min":10}]}"#
        );
        assert_eq!(export.names().collect::<Vec<_>>(), vec!["Str", "number"]);
    }

    #[test]
    fn export_parses_back_in_order() {
        let json = r#"{"zeta":[{"rule":"options","options":["a",1]}],"alpha":[{"rule":"pattern","pattern":"\\d+","message":"digits"}]}"#;
        let export = RuleExport::from_json(json).unwrap();

        assert_eq!(export.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(
            export.get("zeta").unwrap(),
            &[RuleDescriptor::Options {
                options: vec![Value::from("a"), Value::Int(1)],
                message: None,
            }]
        );
        assert_eq!(export.get("alpha").unwrap()[0].message(), Some("digits"));
        assert_eq!(export.to_json().unwrap(), json);
    }

    #[test]
    fn non_json_options_come_back_as_text() {
        let id = uuid::Uuid::new_v4();
        let at = chrono::Utc::now();
        let mut export = RuleExport::default();
        export.push(
            "pick",
            RuleDescriptor::Options {
                options: vec![Value::Uuid(id), Value::Timestamp(at), Value::Int(7)],
                message: None,
            },
        );

        let json = export.to_json().unwrap();
        let back = RuleExport::from_json(&json).unwrap();
        assert_eq!(back.to_json().unwrap(), json);

        let Some([RuleDescriptor::Options { options, .. }]) = back.get("pick") else {
            panic!("expected one options rule, got {back:?}");
        };
        assert_eq!(options[0], Value::Text(id.to_string()));
        assert!(matches!(&options[1], Value::Text(text) if !text.is_empty()));
        assert_eq!(options[2], Value::Int(7));
    }

    #[test]
    fn malformed_export_is_an_error() {
        assert!(matches!(
            RuleExport::from_json(r#"{"x":[{"rule":"unknown"}]}"#),
            Err(RuleError::Export(_))
        ));
    }
}
