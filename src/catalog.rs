use crate::filter::OperatorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index mapping type of a field, as reported by the field catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Keyword,
    Text,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Date,
    Boolean,
    Ip,
    #[serde(other)]
    Other,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Long
                | FieldType::Integer
                | FieldType::Short
                | FieldType::Byte
                | FieldType::Double
                | FieldType::Float
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, FieldType::Keyword | FieldType::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Short => "short",
            FieldType::Byte => "byte",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Ip => "ip",
            FieldType::Other => "other",
        }
    }

    /// Operators the filter bar offers for a field of this type
    pub fn operators(&self) -> Vec<OperatorKind> {
        use OperatorKind::*;

        match self {
            t if t.is_string() => vec![
                Is,
                IsNot,
                IsOneOf,
                IsNotOneOf,
                Exists,
                DoesNotExist,
                Prefix,
                Wildcard,
                QueryString,
            ],
            t if t.is_numeric() || matches!(t, FieldType::Date | FieldType::Ip) => vec![
                Is,
                IsNot,
                IsOneOf,
                IsNotOneOf,
                Exists,
                DoesNotExist,
                Range,
            ],
            FieldType::Boolean => vec![Is, IsNot, Exists, DoesNotExist],
            _ => OperatorKind::ALL.to_vec(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{name, type}` entry of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered list of fields available to the filter bar.
///
/// Only used to offer operators; compilation never depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: Vec<FieldSpec>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Parse a JSON array of `{"name": ..., "type": ...}` objects
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<FieldSpec>>(raw).map(Self::new)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Operators for a field; unknown fields get every operator
    pub fn operators_for(&self, name: &str) -> Vec<OperatorKind> {
        self.get(name)
            .map(|spec| spec.field_type.operators())
            .unwrap_or_else(|| OperatorKind::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_json_keeps_order() {
        let catalog = FieldCatalog::from_json(
            r#"[{"name": "status", "type": "keyword"}, {"name": "bytes", "type": "long"},
                {"name": "geo", "type": "geo_point"}]"#,
        )
        .unwrap();
        let names: Vec<_> = catalog.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["status", "bytes", "geo"]);
        assert_eq!(catalog.get("geo").unwrap().field_type, FieldType::Other);
    }

    #[test]
    fn test_range_only_offered_for_ordered_types() {
        let catalog = FieldCatalog::new(vec![
            FieldSpec::new("status", FieldType::Keyword),
            FieldSpec::new("bytes", FieldType::Long),
            FieldSpec::new("@timestamp", FieldType::Date),
        ]);
        assert!(!catalog.operators_for("status").contains(&OperatorKind::Range));
        assert!(catalog.operators_for("bytes").contains(&OperatorKind::Range));
        assert!(catalog.operators_for("@timestamp").contains(&OperatorKind::Range));
        assert!(!catalog.operators_for("bytes").contains(&OperatorKind::Wildcard));
        assert_eq!(catalog.operators_for("missing").len(), 10);
    }
}
