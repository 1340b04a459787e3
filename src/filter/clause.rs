use super::error::{FilterError, ValidationError};
use crate::config::CompilerConfig;
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

mod entities;

pub use entities::{
    Clause, ExplicitGroup, FilterValue, LogicOp, NormalizedClause, OperatorKind, RangeBound,
    RangeOp, RangeValue, ScalarValue,
};

/// Suffix marking a field as exact-match (not analyzed)
pub const DEFAULT_KEYWORD_SUFFIX: &str = ".keyword";

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid numeric regex"));

/// Validates clauses and turns their loose JSON values into [`FilterValue`]s
#[derive(Debug, Clone)]
pub struct ClauseNormalizer {
    keyword_suffix: String,
    default_min_operator: RangeOp,
    default_max_operator: RangeOp,
}

impl Default for ClauseNormalizer {
    fn default() -> Self {
        Self {
            keyword_suffix: DEFAULT_KEYWORD_SUFFIX.to_string(),
            default_min_operator: RangeOp::Gt,
            default_max_operator: RangeOp::Lt,
        }
    }
}

impl ClauseNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            keyword_suffix: config.normalizer.keyword_suffix.clone(),
            default_min_operator: config.range.default_min_operator,
            default_max_operator: config.range.default_max_operator,
        }
    }

    pub fn with_keyword_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.keyword_suffix = suffix.into();
        self
    }

    pub fn with_default_range_operators(mut self, min: RangeOp, max: RangeOp) -> Self {
        self.default_min_operator = min;
        self.default_max_operator = max;
        self
    }

    pub fn is_exact_match_field(&self, field: &str) -> bool {
        !self.keyword_suffix.is_empty() && field.ends_with(&self.keyword_suffix)
    }

    /// Validate a clause and canonicalize its value.
    ///
    /// An error means the clause is not ready to be compiled; callers drop it.
    pub fn normalize(&self, clause: &Clause) -> Result<NormalizedClause, FilterError> {
        let field = clause.field.trim();
        if field.is_empty() {
            return Err(ValidationError::MissingField.into());
        }

        if clause.operator.trim().is_empty() {
            return Err(ValidationError::MissingOperator(field.to_string()).into());
        }
        let operator = clause.operator_kind()?;
        let exact_match = self.is_exact_match_field(field);

        let value = match operator {
            OperatorKind::Is | OperatorKind::IsNot => clause
                .value
                .as_ref()
                .and_then(|v| scalar_from_json(v, exact_match))
                .map(FilterValue::Scalar)
                .ok_or_else(|| missing_value(field, operator))?,
            OperatorKind::IsOneOf | OperatorKind::IsNotOneOf => {
                let values = value_list(clause, exact_match);
                if values.is_empty() {
                    return Err(ValidationError::EmptyValueList {
                        field: field.to_string(),
                        operator: operator.to_string(),
                    }
                    .into());
                }
                FilterValue::List(values)
            }
            OperatorKind::Exists | OperatorKind::DoesNotExist => FilterValue::None,
            OperatorKind::Range => FilterValue::Range(self.range_value(clause, field, exact_match)?),
            OperatorKind::Prefix | OperatorKind::Wildcard | OperatorKind::QueryString => {
                let text = clause
                    .value
                    .as_ref()
                    .and_then(text_from_json)
                    .ok_or_else(|| missing_value(field, operator))?;
                FilterValue::Scalar(ScalarValue::Text(text))
            }
        };

        Ok(NormalizedClause {
            field: field.to_string(),
            operator,
            value,
            exact_match,
            negated: operator.is_negated(),
        })
    }

    fn range_value(
        &self,
        clause: &Clause,
        field: &str,
        exact_match: bool,
    ) -> Result<RangeValue, ValidationError> {
        let min = clause
            .min_value
            .as_ref()
            .and_then(|v| scalar_from_json(v, exact_match));
        let max = clause
            .max_value
            .as_ref()
            .and_then(|v| scalar_from_json(v, exact_match));

        if min.is_none() && max.is_none() {
            return Err(ValidationError::MissingRangeBounds(field.to_string()));
        }

        let min = match min {
            Some(value) => Some(RangeBound {
                op: bound_operator(
                    clause.min_operator.as_deref(),
                    self.default_min_operator,
                    true,
                    field,
                )?,
                value,
            }),
            None => None,
        };
        let max = match max {
            Some(value) => Some(RangeBound {
                op: bound_operator(
                    clause.max_operator.as_deref(),
                    self.default_max_operator,
                    false,
                    field,
                )?,
                value,
            }),
            None => None,
        };

        Ok(RangeValue { min, max })
    }
}

/// Normalize a clause with the default keyword suffix and range operators
pub fn normalize(clause: &Clause) -> Result<NormalizedClause, FilterError> {
    ClauseNormalizer::default().normalize(clause)
}

/// True if the value is a number or a string that looks like one
pub fn is_numeric_value(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => NUMERIC_RE.is_match(s.trim()),
        _ => false,
    }
}

fn missing_value(field: &str, operator: OperatorKind) -> FilterError {
    ValidationError::MissingValue {
        field: field.to_string(),
        operator: operator.to_string(),
    }
    .into()
}

fn bound_operator(
    raw: Option<&str>,
    default: RangeOp,
    lower: bool,
    field: &str,
) -> Result<RangeOp, ValidationError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(default);
    };

    match RangeOp::parse(raw) {
        Some(op) if op.is_lower() == lower => Ok(op),
        _ => Err(ValidationError::InvalidRangeOperator {
            field: field.to_string(),
            side: if lower { "lower" } else { "upper" },
            operator: raw.to_string(),
        }),
    }
}

/// Convert a loose JSON value into a scalar, coercing numeric strings unless
/// the field is exact-match
fn scalar_from_json(value: &Value, exact_match: bool) -> Option<ScalarValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(ScalarValue::Bool(*b)),
        Value::Number(n) if exact_match => Some(ScalarValue::Text(n.to_string())),
        Value::Number(n) => Some(ScalarValue::Number(n.clone())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if !exact_match && NUMERIC_RE.is_match(trimmed) {
                parse_number(trimmed)
                    .map(ScalarValue::Number)
                    .or_else(|| Some(ScalarValue::Text(trimmed.to_string())))
            } else {
                Some(ScalarValue::Text(trimmed.to_string()))
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text operand for prefix / wildcard / query_string; never coerced
fn text_from_json(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Parse a numeric string without losing digits. `None` when the value does
/// not fit an `i64`/`u64` or does not survive a trip through `f64`.
fn parse_number(s: &str) -> Option<Number> {
    if !s.contains('.') {
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::from(i));
        }
        return s.parse::<u64>().ok().map(Number::from);
    }

    let f = s.parse::<f64>().ok()?;
    (format!("{f}") == canonical_decimal(s))
        .then(|| Number::from_f64(f))
        .flatten()
}

/// `-007.250` -> `-7.25`, the shape `f64`'s `Display` produces
fn canonical_decimal(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let int = match int.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    match frac.trim_end_matches('0') {
        "" => format!("{sign}{int}"),
        frac => format!("{sign}{int}.{frac}"),
    }
}

/// Collect the values of a multi-value clause from `values`, an array in
/// `value`, or a comma separated string
fn value_list(clause: &Clause, exact_match: bool) -> Vec<ScalarValue> {
    let raw: Vec<Value> = match (&clause.values, &clause.value) {
        (Some(values), _) if !values.is_empty() => values.clone(),
        (_, Some(Value::Array(items))) => items.clone(),
        (_, Some(Value::String(s))) => s
            .split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
        (_, Some(other)) => vec![other.clone()],
        (_, None) => Vec::new(),
    };

    raw.iter()
        .filter_map(|v| scalar_from_json(v, exact_match))
        .collect()
}
