use filter_bar::filter::{
    Clause, ExplicitGroup, LogicOp, Node, OperatorKind, PreviewRenderer, RangeOp, build_implicit,
    build_with_groups, render, render_preview,
};

fn is(field: &str, value: &str) -> Clause {
    Clause::new(field, OperatorKind::Is).with_value(value)
}

fn preview(clauses: &[Clause]) -> String {
    render_preview(build_implicit(clauses).as_ref())
}

#[test]
fn test_uniform_connector_has_no_parentheses() {
    let clauses = vec![
        is("a", "1"),
        is("b", "2").with_connector(LogicOp::Or),
        is("c", "3").with_connector(LogicOp::Or),
    ];
    assert_eq!(preview(&clauses), "a: 1 OR b: 2 OR c: 3");

    let clauses = vec![
        is("a", "1"),
        is("b", "2").with_connector(LogicOp::And),
        is("c", "3").with_connector(LogicOp::And),
    ];
    assert_eq!(preview(&clauses), "a: 1 AND b: 2 AND c: 3");
}

#[test]
fn test_connector_change_parenthesizes_left_side() {
    let clauses = vec![
        is("a", "x"),
        is("b", "y").with_connector(LogicOp::And),
        is("c", "z").with_connector(LogicOp::Or),
    ];
    assert_eq!(preview(&clauses), "(a: x AND b: y) OR c: z");
}

#[test]
fn test_status_type_scenario() {
    let clauses = vec![
        is("status", "active"),
        is("type", "user").with_connector(LogicOp::Or),
        is("type", "admin").with_connector(LogicOp::And),
    ];
    assert_eq!(
        preview(&clauses),
        "(status: active OR type: user) AND type: admin"
    );
}

#[test]
fn test_deep_left_nesting() {
    let clauses = vec![
        is("a", "1"),
        is("b", "2").with_connector(LogicOp::And),
        is("c", "3").with_connector(LogicOp::Or),
        is("d", "4").with_connector(LogicOp::And),
    ];
    assert_eq!(preview(&clauses), "((a: 1 AND b: 2) OR c: 3) AND d: 4");
}

#[test]
fn test_explicit_group_is_parenthesized() {
    let clauses = vec![
        is("a", "1"),
        is("b", "2").with_connector(LogicOp::And),
        is("c", "3").with_connector(LogicOp::And),
        is("d", "4").with_connector(LogicOp::And),
    ];
    let groups = vec![ExplicitGroup::new("g", LogicOp::Or, vec![1, 2])];
    assert_eq!(
        render_preview(build_with_groups(&clauses, &groups).as_ref()),
        "a: 1 AND (b: 2 OR c: 3) AND d: 4"
    );
}

#[test]
fn test_top_level_call_never_parenthesizes() {
    let node = Node::bool_of(
        LogicOp::Or,
        [Node::leaf(is("a", "1")), Node::leaf(is("b", "2"))],
    );
    assert_eq!(render(&node, None).unwrap(), "a: 1 OR b: 2");
    assert_eq!(render(&node, Some(LogicOp::Or)).unwrap(), "a: 1 OR b: 2");
    assert_eq!(render(&node, Some(LogicOp::And)).unwrap(), "(a: 1 OR b: 2)");
}

#[test]
fn test_disabled_clauses_are_not_previewed() {
    let clauses = vec![
        is("a", "1"),
        is("b", "2").with_connector(LogicOp::And).disabled(true),
        is("c", "3").with_connector(LogicOp::Or),
    ];
    assert_eq!(preview(&clauses), "a: 1 OR c: 3");
}

#[test]
fn test_not_ready_clause_does_not_leave_empty_parentheses() {
    let clauses = vec![
        is("a", "1"),
        Clause::empty(Some(LogicOp::Or)),
        is("b", "2").with_connector(LogicOp::And),
    ];
    assert_eq!(preview(&clauses), "a: 1 AND b: 2");
}

#[test]
fn test_operator_phrases() {
    let clauses = vec![
        Clause::new("status", OperatorKind::IsNotOneOf).with_value("a, b"),
        Clause::new("user", OperatorKind::Exists).with_connector(LogicOp::And),
        Clause::new("bytes", OperatorKind::Range)
            .with_min(1, Some(RangeOp::Gte))
            .with_max(9, None)
            .with_connector(LogicOp::And),
        Clause::new("host", OperatorKind::Wildcard)
            .with_value("web-*")
            .with_connector(LogicOp::And),
        Clause::new("message", OperatorKind::QueryString)
            .with_value("disk")
            .with_connector(LogicOp::And),
    ];
    assert_eq!(
        preview(&clauses),
        "NOT status: a, b AND user: exists AND bytes: >=1 and <9 AND host: wildcard \"web-*\" AND message: query_string \"disk\""
    );
}

#[test]
fn test_renderer_with_custom_normalizer() {
    let renderer = PreviewRenderer::new().with_normalizer(
        filter_bar::filter::ClauseNormalizer::new()
            .with_default_range_operators(RangeOp::Gte, RangeOp::Lte),
    );
    let node = Node::leaf(
        Clause::new("bytes", OperatorKind::Range)
            .with_min(1, None)
            .with_max(2, None),
    );
    assert_eq!(renderer.render_preview(Some(&node)), "bytes: >=1 and <=2");
}
