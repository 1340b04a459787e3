use super::ast::Node;
use super::clause::{ClauseNormalizer, FilterValue, LogicOp, NormalizedClause, OperatorKind};
use super::error::FilterError;
use crate::config::CompilerConfig;
use log::{debug, warn};
use serde_json::{Map, Value, json};

/// Result of compiling a tree together with the clauses that were left out
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// `{"query": ...}` document
    pub query: Value,
    /// Every clause that did not make it into the query, in tree order
    pub issues: Vec<FilterError>,
}

impl Compilation {
    /// Issues worth showing to the user (unknown operators)
    pub fn warnings(&self) -> impl Iterator<Item = &FilterError> {
        self.issues.iter().filter(|issue| issue.is_warning())
    }
}

/// Turns a filter tree into a search-engine bool query
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    normalizer: ClauseNormalizer,
    case_insensitive: bool,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self {
            normalizer: ClauseNormalizer::default(),
            case_insensitive: true,
        }
    }
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            normalizer: ClauseNormalizer::from_config(config),
            case_insensitive: config.query.case_insensitive,
        }
    }

    pub fn with_normalizer(mut self, normalizer: ClauseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Compile to the bare query body; an empty tree is `match_all`
    pub fn compile(&self, node: Option<&Node>) -> Value {
        let mut issues = Vec::new();
        node.and_then(|n| self.compile_node(n, &mut issues))
            .unwrap_or_else(match_all)
    }

    /// Compile and wrap as `{"query": ...}`
    pub fn to_query_document(&self, node: Option<&Node>) -> Value {
        json!({ "query": self.compile(node) })
    }

    pub fn compile_with_diagnostics(&self, node: Option<&Node>) -> Compilation {
        let mut issues = Vec::new();
        let body = node
            .and_then(|n| self.compile_node(n, &mut issues))
            .unwrap_or_else(match_all);
        Compilation {
            query: json!({ "query": body }),
            issues,
        }
    }

    /// `None` means the node contributes nothing (excluded or match-all)
    fn compile_node(&self, node: &Node, issues: &mut Vec<FilterError>) -> Option<Value> {
        match node {
            Node::Leaf(clause) => match self.normalizer.normalize(clause) {
                Ok(normalized) => self.compile_leaf(&normalized),
                Err(err) => {
                    if err.is_warning() {
                        warn!("Skipping clause on '{}': {}", clause.field, err);
                    } else {
                        debug!("Clause on '{}' is not ready: {}", clause.field, err);
                    }
                    issues.push(err);
                    None
                }
            },
            Node::Bool { operator, children } => {
                let mut docs: Vec<Value> = Vec::with_capacity(children.len());
                for doc in children
                    .iter()
                    .filter_map(|child| self.compile_node(child, issues))
                    .filter(|doc| !is_match_all(doc))
                {
                    push_spliced(&mut docs, *operator, doc);
                }

                match docs.len() {
                    0 => None,
                    1 => docs.pop(),
                    _ => Some(match operator {
                        LogicOp::And => json!({ "bool": { "must": docs } }),
                        LogicOp::Or => json!({
                            "bool": { "should": docs, "minimum_should_match": 1 }
                        }),
                    }),
                }
            }
        }
    }

    fn compile_leaf(&self, clause: &NormalizedClause) -> Option<Value> {
        let field = clause.field.as_str();
        let doc = match (clause.operator, &clause.value) {
            (OperatorKind::Is | OperatorKind::IsNot, FilterValue::Scalar(value)) => {
                let kind = if clause.exact_match || value.is_numeric() {
                    "term"
                } else {
                    "match"
                };
                field_query(kind, field, value.to_json())
            }
            (OperatorKind::IsOneOf | OperatorKind::IsNotOneOf, FilterValue::List(values)) => {
                field_query(
                    "terms",
                    field,
                    Value::Array(values.iter().map(|v| v.to_json()).collect()),
                )
            }
            (OperatorKind::Exists | OperatorKind::DoesNotExist, _) => {
                json!({ "exists": { "field": field } })
            }
            (OperatorKind::Range, FilterValue::Range(range)) => {
                let mut bounds = Map::new();
                for bound in [&range.min, &range.max].into_iter().flatten() {
                    bounds.insert(bound.op.as_str().to_string(), bound.value.to_json());
                }
                if bounds.is_empty() {
                    return None;
                }
                field_query("range", field, Value::Object(bounds))
            }
            (OperatorKind::Prefix, FilterValue::Scalar(value)) if clause.exact_match => {
                field_query("prefix", field, value.to_json())
            }
            (OperatorKind::Prefix, FilterValue::Scalar(value)) => {
                self.wildcard(field, format!("{value}*"))
            }
            (OperatorKind::Wildcard, FilterValue::Scalar(value)) => {
                self.wildcard(field, value.to_string())
            }
            (OperatorKind::QueryString, FilterValue::Scalar(value)) => json!({
                "query_string": { "default_field": field, "query": value.to_string() }
            }),
            (operator, value) => {
                debug!("No query form for {operator} with value {value:?} on '{field}'");
                return None;
            }
        };

        Some(if clause.negated { must_not(doc) } else { doc })
    }

    fn wildcard(&self, field: &str, pattern: String) -> Value {
        field_query(
            "wildcard",
            field,
            json!({ "value": pattern, "case_insensitive": self.case_insensitive }),
        )
    }
}

/// Compile with default settings
pub fn compile(node: Option<&Node>) -> Value {
    QueryCompiler::default().compile(node)
}

/// Compile with default settings and wrap as `{"query": ...}`
pub fn to_query_document(node: Option<&Node>) -> Value {
    QueryCompiler::default().to_query_document(node)
}

pub fn compile_with_diagnostics(node: Option<&Node>) -> Compilation {
    QueryCompiler::default().compile_with_diagnostics(node)
}

pub fn match_all() -> Value {
    json!({ "match_all": {} })
}

pub fn is_match_all(doc: &Value) -> bool {
    *doc == match_all()
}

/// Add a child document to a parent bool. A child that is itself a bool of the
/// parent's kind (left behind when a node collapsed to one child) contributes
/// its clauses directly.
fn push_spliced(docs: &mut Vec<Value>, operator: LogicOp, doc: Value) {
    match same_kind_clauses(&doc, operator) {
        Some(inner) => docs.extend(inner.iter().cloned()),
        None => docs.push(doc),
    }
}

fn same_kind_clauses(doc: &Value, operator: LogicOp) -> Option<&Vec<Value>> {
    let outer = doc.as_object().filter(|d| d.len() == 1)?;
    let body = outer.get("bool")?.as_object()?;
    let inner = match operator {
        LogicOp::And if body.len() == 1 => body.get("must"),
        LogicOp::Or
            if body.len() == 2 && body.get("minimum_should_match") == Some(&json!(1)) =>
        {
            body.get("should")
        }
        _ => None,
    }?;
    inner.as_array()
}

/// `{kind: {field: body}}`
fn field_query(kind: &str, field: &str, body: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), body);
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn must_not(doc: Value) -> Value {
    json!({ "bool": { "must_not": [doc] } })
}
