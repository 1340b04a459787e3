use filter_bar::bar::{FilterBar, FilterBarState, SelectModifier};
use filter_bar::filter::{Clause, ExplicitGroup, InvalidGroupError, LogicOp, OperatorKind};
use serde_json::json;

fn exists(field: &str) -> Clause {
    Clause::new(field, OperatorKind::Exists)
}

/// Bar with clauses f0..fn all joined by AND
fn bar_with(n: usize) -> FilterBar {
    let mut bar = FilterBar::new();
    for i in 0..n {
        let clause = exists(&format!("f{i}"));
        bar.push_clause(if i == 0 {
            clause
        } else {
            clause.with_connector(LogicOp::And)
        });
    }
    bar
}

fn select_range(bar: &mut FilterBar, from: usize, to: usize) {
    bar.select(from, SelectModifier::None).unwrap();
    bar.select(to, SelectModifier::Shift).unwrap();
}

fn fields(bar: &FilterBar) -> Vec<String> {
    bar.clauses().iter().map(|c| c.field.clone()).collect()
}

#[test]
fn test_create_group_tags_members_and_clears_selection() {
    let mut bar = bar_with(4);
    select_range(&mut bar, 1, 3);

    let id = bar.create_group(LogicOp::Or).unwrap();

    assert!(bar.selection().is_empty());
    assert_eq!(bar.groups().len(), 1);
    assert_eq!(bar.groups()[0].clause_indices, vec![1, 2, 3]);

    let clauses = bar.clauses();
    assert_eq!(clauses[0].group_id, None);
    assert_eq!(clauses[1].group_id.as_deref(), Some(id.as_str()));
    assert!(clauses[1].is_group_start && !clauses[1].is_group_end);
    assert!(!clauses[2].is_group_start && !clauses[2].is_group_end);
    assert!(clauses[3].is_group_end);
    assert_eq!(
        bar.preview(),
        "f0: exists AND (f1: exists OR f2: exists OR f3: exists)"
    );
}

#[test]
fn test_non_contiguous_selection_is_rejected_without_mutation() {
    let mut bar = bar_with(3);
    bar.select(0, SelectModifier::None).unwrap();
    bar.select(2, SelectModifier::Ctrl).unwrap();
    let before = bar.state();

    let result = bar.create_group(LogicOp::Or);

    assert_eq!(result, Err(InvalidGroupError::NonContiguous(vec![0, 2])));
    assert_eq!(bar.selection().indices(), vec![0, 2]);
    assert!(bar.groups().is_empty());
    assert_eq!(bar.state(), before);
}

#[test]
fn test_single_selection_is_too_small() {
    let mut bar = bar_with(3);
    bar.select(1, SelectModifier::None).unwrap();
    assert_eq!(
        bar.create_group(LogicOp::And),
        Err(InvalidGroupError::TooFewMembers(1))
    );
    assert_eq!(bar.selection().indices(), vec![1]);
}

#[test]
fn test_select_out_of_range_is_rejected() {
    let mut bar = bar_with(2);
    bar.select(0, SelectModifier::None).unwrap();
    assert_eq!(
        bar.select(5, SelectModifier::Ctrl),
        Err(InvalidGroupError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(bar.selection().indices(), vec![0]);
    assert_eq!(bar.selection().last_clicked(), Some(0));
}

#[test]
fn test_new_group_replaces_overlapping_groups() {
    let mut bar = bar_with(5);
    select_range(&mut bar, 0, 1);
    let first = bar.create_group(LogicOp::Or).unwrap();
    select_range(&mut bar, 3, 4);
    let untouched = bar.create_group(LogicOp::Or).unwrap();

    select_range(&mut bar, 1, 2);
    let replacement = bar.create_group(LogicOp::And).unwrap();

    let ids: Vec<&str> = bar.groups().iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec![replacement.as_str(), untouched.as_str()]);
    assert!(!ids.contains(&first.as_str()));
    assert_eq!(bar.clauses()[0].group_id, None);
    assert!(bar.clauses()[1].is_group_start);
}

#[test]
fn test_remove_group_clears_metadata() {
    let mut bar = bar_with(3);
    select_range(&mut bar, 0, 2);
    let id = bar.create_group(LogicOp::Or).unwrap();

    let removed = bar.remove_group(&id).unwrap();
    assert_eq!(removed.clause_indices, vec![0, 1, 2]);
    assert!(bar.groups().is_empty());
    assert!(bar.clauses().iter().all(|c| c.group_id.is_none()
        && !c.is_group_start
        && !c.is_group_end));
    assert_eq!(
        bar.remove_group(&id),
        Err(InvalidGroupError::GroupNotFound(id))
    );
}

#[test]
fn test_removing_from_three_member_group_keeps_two() {
    let mut bar = bar_with(4);
    select_range(&mut bar, 0, 2);
    let id = bar.create_group(LogicOp::Or).unwrap();

    let removed = bar.remove_clause(1).unwrap();

    assert_eq!(removed.field, "f1");
    assert_eq!(fields(&bar), vec!["f0", "f2", "f3"]);
    assert_eq!(bar.groups().len(), 1);
    assert_eq!(bar.groups()[0].id, id);
    assert_eq!(bar.groups()[0].clause_indices, vec![0, 1]);
    assert!(bar.clauses()[0].is_group_start);
    assert!(bar.clauses()[1].is_group_end);
    assert_eq!(
        bar.preview(),
        "(f0: exists OR f2: exists) AND f3: exists"
    );
}

#[test]
fn test_removing_down_to_one_member_dissolves_group() {
    let mut bar = bar_with(3);
    select_range(&mut bar, 1, 2);
    bar.create_group(LogicOp::Or).unwrap();

    bar.remove_clause(2).unwrap();

    assert!(bar.groups().is_empty());
    assert_eq!(bar.clauses()[1].group_id, None);
    assert!(!bar.clauses()[1].is_group_start);
    assert!(!bar.clauses()[1].is_group_end);
}

#[test]
fn test_removing_before_a_group_shifts_it() {
    let mut bar = bar_with(5);
    select_range(&mut bar, 3, 4);
    bar.create_group(LogicOp::Or).unwrap();

    bar.remove_clause(0).unwrap();

    assert_eq!(bar.groups()[0].clause_indices, vec![2, 3]);
    assert_eq!(bar.clauses()[2].field, "f3");
    assert!(bar.clauses()[2].is_group_start);
    assert_eq!(bar.separators().len(), 3);
    assert_eq!(bar.separators()[2].group_id, Some(bar.groups()[0].id.clone()));
}

#[test]
fn test_remove_clause_out_of_range() {
    let mut bar = bar_with(1);
    assert_eq!(
        bar.remove_clause(1),
        Err(InvalidGroupError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(bar.len(), 1);
}

#[test]
fn test_insert_after_does_not_join_group() {
    let mut bar = bar_with(3);
    select_range(&mut bar, 0, 1);
    bar.create_group(LogicOp::Or).unwrap();

    let index = bar.insert_clause_after(1, LogicOp::Or).unwrap();

    assert_eq!(index, 2);
    assert_eq!(bar.len(), 4);
    assert_eq!(bar.clauses()[2].connector, Some(LogicOp::Or));
    assert_eq!(bar.clauses()[2].group_id, None);
    assert_eq!(bar.groups()[0].clause_indices, vec![0, 1]);
    assert_eq!(bar.clauses()[3].field, "f2");
}

#[test]
fn test_insert_inside_group_is_rejected() {
    let mut bar = bar_with(3);
    select_range(&mut bar, 0, 2);
    let id = bar.create_group(LogicOp::Or).unwrap();
    let before = bar.state();

    assert_eq!(
        bar.insert_clause_after(0, LogicOp::And),
        Err(InvalidGroupError::SplitsGroup { index: 0, group_id: id })
    );
    assert_eq!(bar.state(), before);
}

#[test]
fn test_insert_before_group_shifts_it() {
    let mut bar = bar_with(3);
    select_range(&mut bar, 1, 2);
    bar.create_group(LogicOp::Or).unwrap();

    bar.insert_clause_after(0, LogicOp::And).unwrap();
    assert_eq!(bar.groups()[0].clause_indices, vec![2, 3]);
    assert!(bar.clauses()[2].is_group_start);
}

#[test]
fn test_toggle_disabled_and_set_connector() {
    let mut bar = bar_with(3);
    assert_eq!(bar.toggle_disabled(1), Ok(true));
    assert_eq!(bar.preview(), "f0: exists AND f2: exists");
    assert_eq!(bar.toggle_disabled(1), Ok(false));

    bar.set_connector(2, LogicOp::Or).unwrap();
    assert_eq!(bar.preview(), "(f0: exists AND f1: exists) OR f2: exists");
}

#[test]
fn test_query_is_recomputed_after_every_change() {
    let mut bar = FilterBar::new();
    assert_eq!(bar.query(), json!({"query": {"match_all": {}}}));

    bar.push_clause(Clause::new("status", OperatorKind::Is).with_value("active"));
    assert_eq!(bar.query(), json!({"query": {"match": {"status": "active"}}}));

    let index = bar.insert_clause_after(0, LogicOp::Or).unwrap();
    // the blank clause is not ready yet
    assert_eq!(bar.query(), json!({"query": {"match": {"status": "active"}}}));

    bar.update_clause(index, Clause::new("type", OperatorKind::Is).with_value("user"))
        .unwrap();
    assert_eq!(
        bar.query(),
        json!({"query": {"bool": {
            "should": [{"match": {"status": "active"}}, {"match": {"type": "user"}}],
            "minimum_should_match": 1
        }}})
    );
}

#[test]
fn test_state_round_trips_through_json() {
    let raw = r#"{
        // saved by the dashboard
        clauses: [
            {"field": "status", "operator": "is", "value": "active"},
            {"field": "type", "operator": "is", "value": "user", "connector": "OR"},
            {"field": "type", "operator": "is", "value": "admin", "connector": "OR"},
        ],
        groups: [{"id": "group-4", "type": "AND", "clauseIndices": [1, 2]}],
    }"#;
    let state = FilterBarState::from_json(raw).unwrap();
    let mut bar = FilterBar::from_state(state).unwrap();

    assert_eq!(
        bar.preview(),
        "status: active OR (type: user AND type: admin)"
    );
    assert!(bar.clauses()[1].is_group_start);

    select_range(&mut bar, 0, 1);
    assert_eq!(bar.create_group(LogicOp::Or).unwrap(), "group-5");
}

#[test]
fn test_from_state_rejects_broken_groups() {
    let clauses = vec![exists("a"), exists("b"), exists("c")];
    let cases = vec![
        vec![ExplicitGroup::new("g", LogicOp::Or, vec![0])],
        vec![ExplicitGroup::new("g", LogicOp::Or, vec![0, 2])],
        vec![ExplicitGroup::new("g", LogicOp::Or, vec![2, 3])],
        vec![
            ExplicitGroup::new("g", LogicOp::Or, vec![0, 1]),
            ExplicitGroup::new("h", LogicOp::Or, vec![1, 2]),
        ],
        vec![
            ExplicitGroup::new("g", LogicOp::Or, vec![0, 1]),
            ExplicitGroup::new("g", LogicOp::Or, vec![2, 3]),
        ],
    ];

    for groups in cases {
        let state = FilterBarState {
            clauses: clauses.clone(),
            groups: groups.clone(),
        };
        assert!(
            FilterBar::from_state(state).is_err(),
            "groups {groups:?} should be rejected"
        );
    }
}

#[test]
fn test_duplicate_indices_count_once() {
    let state = FilterBarState {
        clauses: vec![exists("a"), exists("b"), exists("c")],
        groups: vec![ExplicitGroup::new("g", LogicOp::Or, vec![0, 0, 1])],
    };
    let mut bar = FilterBar::from_state(state).unwrap();
    assert_eq!(bar.groups()[0].clause_indices, vec![0, 1]);

    bar.remove_clause(1).unwrap();

    assert!(bar.groups().is_empty());
    let survivor = &bar.clauses()[0];
    assert_eq!(survivor.group_id, None);
    assert!(!survivor.is_group_start);
    assert!(!survivor.is_group_end);
}
