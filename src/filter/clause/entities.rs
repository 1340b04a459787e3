use crate::filter::error::FilterError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Operators a clause can apply to its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Is,
    IsNot,
    IsOneOf,
    IsNotOneOf,
    Exists,
    DoesNotExist,
    Range,
    Prefix,
    Wildcard,
    QueryString,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 10] = [
        OperatorKind::Is,
        OperatorKind::IsNot,
        OperatorKind::IsOneOf,
        OperatorKind::IsNotOneOf,
        OperatorKind::Exists,
        OperatorKind::DoesNotExist,
        OperatorKind::Range,
        OperatorKind::Prefix,
        OperatorKind::Wildcard,
        OperatorKind::QueryString,
    ];

    /// Get the canonical name of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Is => "is",
            OperatorKind::IsNot => "is_not",
            OperatorKind::IsOneOf => "is_one_of",
            OperatorKind::IsNotOneOf => "is_not_one_of",
            OperatorKind::Exists => "exists",
            OperatorKind::DoesNotExist => "does_not_exist",
            OperatorKind::Range => "range",
            OperatorKind::Prefix => "prefix",
            OperatorKind::Wildcard => "wildcard",
            OperatorKind::QueryString => "query_string",
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            OperatorKind::IsNot | OperatorKind::IsNotOneOf | OperatorKind::DoesNotExist
        )
    }

    pub fn is_multi_value(&self) -> bool {
        matches!(self, OperatorKind::IsOneOf | OperatorKind::IsNotOneOf)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s.trim().to_lowercase().replace(['-', ' '], "_");
        OperatorKind::ALL
            .into_iter()
            .find(|op| op.as_str() == canonical)
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

/// Boolean connector between two clauses or the type of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOp {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
}

impl LogicOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison used for one side of a range clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeOp {
    /// Key used in the range query body
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOp::Gt => "gt",
            RangeOp::Gte => "gte",
            RangeOp::Lt => "lt",
            RangeOp::Lte => "lte",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RangeOp::Gt => ">",
            RangeOp::Gte => ">=",
            RangeOp::Lt => "<",
            RangeOp::Lte => "<=",
        }
    }

    pub fn is_lower(&self) -> bool {
        matches!(self, RangeOp::Gt | RangeOp::Gte)
    }

    /// Parse either the query key (`gte`) or the symbol (`>=`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gt" | ">" => Some(RangeOp::Gt),
            "gte" | ">=" => Some(RangeOp::Gte),
            "lt" | "<" => Some(RangeOp::Lt),
            "lte" | "<=" => Some(RangeOp::Lte),
            _ => None,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter clause as the filter bar stores it.
///
/// This is the raw, UI-facing shape: values are whatever JSON the input widgets
/// produced and the operator is kept as typed so an unknown one can be reported.
/// Use [`crate::filter::normalize`] to get a typed [`NormalizedClause`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Clause {
    pub field: String,
    pub operator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_operator: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Connector to the previous clause. Ignored on the first clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<LogicOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_group_start: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_group_end: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Clause {
    pub fn new(field: impl Into<String>, operator: OperatorKind) -> Self {
        Self {
            field: field.into(),
            operator: operator.as_str().to_string(),
            ..Self::default()
        }
    }

    /// A blank clause, as inserted by the filter bar before the user fills it in
    pub fn empty(connector: Option<LogicOp>) -> Self {
        Self {
            connector,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min(mut self, value: impl Into<Value>, op: Option<RangeOp>) -> Self {
        self.min_value = Some(value.into());
        self.min_operator = op.map(|op| op.as_str().to_string());
        self
    }

    pub fn with_max(mut self, value: impl Into<Value>, op: Option<RangeOp>) -> Self {
        self.max_value = Some(value.into());
        self.max_operator = op.map(|op| op.as_str().to_string());
        self
    }

    pub fn with_connector(mut self, connector: LogicOp) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn operator_kind(&self) -> Result<OperatorKind, FilterError> {
        self.operator.parse()
    }

    /// Connector used when this clause follows another one
    pub fn effective_connector(&self) -> LogicOp {
        self.connector.unwrap_or_default()
    }

    pub fn clear_group_metadata(&mut self) {
        self.group_id = None;
        self.is_group_start = false;
        self.is_group_end = false;
    }
}

/// A user-declared cluster of adjacent clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitGroup {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: LogicOp,
    pub clause_indices: Vec<usize>,
}

impl ExplicitGroup {
    pub fn new(id: impl Into<String>, group_type: LogicOp, clause_indices: Vec<usize>) -> Self {
        Self {
            id: id.into(),
            group_type,
            clause_indices,
        }
    }

    pub fn first(&self) -> Option<usize> {
        self.clause_indices.iter().copied().min()
    }

    pub fn last(&self) -> Option<usize> {
        self.clause_indices.iter().copied().max()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.clause_indices.contains(&index)
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Number(Number),
    Text(String),
    Bool(bool),
}

impl ScalarValue {
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Number(n) => Value::Number(n.clone()),
            ScalarValue::Text(s) => Value::String(s.clone()),
            ScalarValue::Bool(b) => Value::Bool(*b),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarValue::Number(_))
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One side of a range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub op: RangeOp,
    pub value: ScalarValue,
}

/// Range bounds; at least one side is present after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValue {
    pub min: Option<RangeBound>,
    pub max: Option<RangeBound>,
}

/// The value of a normalized clause
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// exists / does_not_exist carry no value
    None,
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
    Range(RangeValue),
}

/// A validated clause with its derived flags
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClause {
    pub field: String,
    pub operator: OperatorKind,
    pub value: FilterValue,
    /// Field carries the keyword suffix: exact-match query forms, no numeric coercion
    pub exact_match: bool,
    pub negated: bool,
}

impl NormalizedClause {
    pub fn is_numeric(&self) -> bool {
        matches!(&self.value, FilterValue::Scalar(v) if v.is_numeric())
    }
}
