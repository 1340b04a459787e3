use super::ast::Node;
use super::clause::{
    ClauseNormalizer, FilterValue, LogicOp, NormalizedClause, OperatorKind, RangeValue,
};
use crate::config::CompilerConfig;

/// Renders a filter tree as the text shown in the filter bar label
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    normalizer: ClauseNormalizer,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            normalizer: ClauseNormalizer::from_config(config),
        }
    }

    pub fn with_normalizer(mut self, normalizer: ClauseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Render the whole tree; empty string when nothing is renderable
    pub fn render_preview(&self, node: Option<&Node>) -> String {
        node.and_then(|n| self.render(n, None)).unwrap_or_default()
    }

    /// Render `node` as a child of a node using `parent`.
    ///
    /// A `Bool` is parenthesized only when its parent uses a different operator.
    /// Clauses that are not ready render nothing, and a `Bool` left with a single
    /// renderable child renders as that child.
    pub fn render(&self, node: &Node, parent: Option<LogicOp>) -> Option<String> {
        match node {
            Node::Leaf(clause) => self
                .normalizer
                .normalize(clause)
                .ok()
                .map(|normalized| leaf_phrase(&normalized)),
            Node::Bool { operator, children } => {
                let rendered: Vec<(usize, String)> = children
                    .iter()
                    .enumerate()
                    .filter_map(|(i, child)| self.render(child, Some(*operator)).map(|s| (i, s)))
                    .collect();

                match rendered.as_slice() {
                    [] => None,
                    [(only, _)] => self.render(&children[*only], parent),
                    parts => {
                        let joined = parts
                            .iter()
                            .map(|(_, text)| text.as_str())
                            .collect::<Vec<_>>()
                            .join(&format!(" {operator} "));
                        match parent {
                            Some(p) if p != *operator => Some(format!("({joined})")),
                            _ => Some(joined),
                        }
                    }
                }
            }
        }
    }
}

/// Render with default settings
pub fn render(node: &Node, parent: Option<LogicOp>) -> Option<String> {
    PreviewRenderer::default().render(node, parent)
}

/// Render the whole tree with default settings
pub fn render_preview(node: Option<&Node>) -> String {
    PreviewRenderer::default().render_preview(node)
}

fn leaf_phrase(clause: &NormalizedClause) -> String {
    let field = &clause.field;
    let body = match (&clause.operator, &clause.value) {
        (OperatorKind::Exists | OperatorKind::DoesNotExist, _) => "exists".to_string(),
        (OperatorKind::Range, FilterValue::Range(range)) => range_phrase(range),
        (OperatorKind::Prefix, FilterValue::Scalar(v)) => format!("prefix \"{v}\""),
        (OperatorKind::Wildcard, FilterValue::Scalar(v)) => format!("wildcard \"{v}\""),
        (OperatorKind::QueryString, FilterValue::Scalar(v)) => format!("query_string \"{v}\""),
        (_, FilterValue::Scalar(v)) => v.to_string(),
        (_, FilterValue::List(values)) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        (_, FilterValue::Range(range)) => range_phrase(range),
        (_, FilterValue::None) => String::new(),
    };

    if clause.negated {
        format!("NOT {field}: {body}")
    } else {
        format!("{field}: {body}")
    }
}

fn range_phrase(range: &RangeValue) -> String {
    [&range.min, &range.max]
        .into_iter()
        .flatten()
        .map(|bound| format!("{}{}", bound.op.symbol(), bound.value))
        .collect::<Vec<_>>()
        .join(" and ")
}
