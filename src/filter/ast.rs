use super::clause::{Clause, LogicOp};
use std::fmt::Write as _;

/// Boolean tree derived from a clause sequence.
///
/// Nodes own their children. A `Bool` node never has a `Bool` child with the
/// same operator; use [`Node::join`] to combine nodes so that holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Clause),
    Bool {
        operator: LogicOp,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn leaf(clause: Clause) -> Self {
        Node::Leaf(clause)
    }

    /// Operator of a `Bool` node, `None` for leaves
    pub fn operator(&self) -> Option<LogicOp> {
        match self {
            Node::Leaf(_) => None,
            Node::Bool { operator, .. } => Some(*operator),
        }
    }

    /// Build a `Bool` node, splicing in children that use the same operator
    pub fn bool_of(operator: LogicOp, nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut children = Vec::new();
        for node in nodes {
            push_flattened(&mut children, operator, node);
        }
        Node::Bool { operator, children }
    }

    /// One step of the left fold: extend `self` when it already uses `op`,
    /// otherwise nest it as the left operand of a new `op` node.
    pub fn join(self, op: LogicOp, next: Node) -> Node {
        match self {
            Node::Bool {
                operator,
                mut children,
            } if operator == op => {
                push_flattened(&mut children, op, next);
                Node::Bool { operator, children }
            }
            left => Node::bool_of(op, [left, next]),
        }
    }

    /// All clauses in left-to-right order
    pub fn leaves(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Node::Leaf(clause) => out.push(clause),
            Node::Bool { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Bool { children, .. } => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
        }
    }

    /// Indented outline of the tree, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            Node::Leaf(clause) => {
                let value = clause
                    .value
                    .as_ref()
                    .map(|v| format!(" {v}"))
                    .unwrap_or_default();
                let _ = writeln!(out, "{pad}{} {}{}", clause.field, clause.operator, value);
            }
            Node::Bool { operator, children } => {
                let _ = writeln!(out, "{pad}{operator}");
                for child in children {
                    child.write_outline(out, indent + 1);
                }
            }
        }
    }
}

fn push_flattened(children: &mut Vec<Node>, op: LogicOp, node: Node) {
    match node {
        Node::Bool {
            operator,
            children: inner,
        } if operator == op => children.extend(inner),
        other => children.push(other),
    }
}

/// Build the left-associative tree for a clause sequence.
///
/// Disabled clauses are dropped first. A run of clauses sharing a connector stays
/// flat; a connector change nests everything accumulated so far as the left
/// child of a new node, e.g. `A, B(AND), C(OR), D(AND)` becomes
/// `AND[OR[AND[A, B], C], D]`.
pub fn build_implicit(clauses: &[Clause]) -> Option<Node> {
    fold_left(
        clauses
            .iter()
            .filter(|clause| !clause.disabled)
            .map(|clause| (clause.effective_connector(), Node::leaf(clause.clone()))),
    )
}

/// Left fold over `(connector, node)` pairs; the first connector is ignored
pub(crate) fn fold_left(items: impl IntoIterator<Item = (LogicOp, Node)>) -> Option<Node> {
    let mut result: Option<Node> = None;
    for (op, node) in items {
        result = Some(match result {
            None => node,
            Some(acc) => acc.join(op, node),
        });
    }
    result
}
