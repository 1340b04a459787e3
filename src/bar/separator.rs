use crate::filter::{Clause, ExplicitGroup, LogicOp};
use serde::Serialize;

/// What the filter bar draws between two adjacent clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Separator {
    pub connector_type: LogicOp,
    /// The pair crosses the edge of a group
    pub is_group_boundary: bool,
    /// Set when both clauses belong to the same group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Project clauses and groups onto one separator per adjacent pair.
///
/// Inside a group the group's type decides how members combine, so that is the
/// connector shown there.
pub fn separators(clauses: &[Clause], groups: &[ExplicitGroup]) -> Vec<Separator> {
    let group_of = |index: usize| groups.iter().find(|g| g.contains(index));

    clauses
        .windows(2)
        .enumerate()
        .map(|(i, pair)| match (group_of(i), group_of(i + 1)) {
            (Some(left), Some(right)) if left.id == right.id => Separator {
                connector_type: left.group_type,
                is_group_boundary: false,
                group_id: Some(left.id.clone()),
            },
            (left, right) => Separator {
                connector_type: pair[1].effective_connector(),
                is_group_boundary: left.is_some() || right.is_some(),
                group_id: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::OperatorKind;

    #[test]
    fn test_separators_follow_groups() {
        let clauses = vec![
            Clause::new("a", OperatorKind::Exists),
            Clause::new("b", OperatorKind::Exists).with_connector(LogicOp::And),
            Clause::new("c", OperatorKind::Exists).with_connector(LogicOp::And),
            Clause::new("d", OperatorKind::Exists).with_connector(LogicOp::Or),
        ];
        let groups = vec![ExplicitGroup::new("g", LogicOp::Or, vec![1, 2])];

        let seps = separators(&clauses, &groups);
        assert_eq!(seps.len(), 3);
        assert_eq!(seps[0].connector_type, LogicOp::And);
        assert!(seps[0].is_group_boundary);
        assert_eq!(seps[1].connector_type, LogicOp::Or);
        assert_eq!(seps[1].group_id.as_deref(), Some("g"));
        assert!(!seps[1].is_group_boundary);
        assert_eq!(seps[2].connector_type, LogicOp::Or);
        assert!(seps[2].is_group_boundary);
    }

    #[test]
    fn test_no_separators_for_single_clause() {
        assert!(separators(&[Clause::empty(None)], &[]).is_empty());
    }
}
