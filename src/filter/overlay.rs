use super::ast::{Node, build_implicit, fold_left};
use super::clause::{Clause, ExplicitGroup, LogicOp};
use log::warn;
use std::ops::Range;

/// A contiguous slice of the clause sequence, either one explicit group or a
/// run of ungrouped clauses
#[derive(Debug, Clone, PartialEq)]
enum Segment<'g> {
    Group(Range<usize>, &'g ExplicitGroup),
    Run(Range<usize>),
}

/// Build the tree for clauses with explicit groups layered on top.
///
/// Each group becomes one atomic subtree, each ungrouped run is folded on its
/// own, and the segments are then stitched left to right with the same fold,
/// joined by the connector of each segment's first surviving clause.
pub fn build_with_groups(clauses: &[Clause], groups: &[ExplicitGroup]) -> Option<Node> {
    if groups.is_empty() {
        return build_implicit(clauses);
    }

    let segments = partition(clauses.len(), groups);
    fold_left(segments.into_iter().filter_map(|segment| match segment {
        Segment::Group(range, group) => group_subtree(&clauses[range], group.group_type),
        Segment::Run(range) => run_subtree(&clauses[range]),
    }))
}

fn group_subtree(members: &[Clause], group_type: LogicOp) -> Option<(LogicOp, Node)> {
    let surviving: Vec<&Clause> = members.iter().filter(|c| !c.disabled).collect();
    let connector = surviving.first()?.effective_connector();

    let node = match surviving.as_slice() {
        [only] => Node::leaf((*only).clone()),
        many => Node::bool_of(group_type, many.iter().map(|c| Node::leaf((*c).clone()))),
    };
    Some((connector, node))
}

fn run_subtree(run: &[Clause]) -> Option<(LogicOp, Node)> {
    let connector = run.iter().find(|c| !c.disabled)?.effective_connector();
    build_implicit(run).map(|node| (connector, node))
}

/// Split `[0, len)` into ordered group and run segments.
///
/// Groups that point past the end lose those indices; groups that are not
/// contiguous or overlap an earlier group are ignored for this build.
fn partition(len: usize, groups: &[ExplicitGroup]) -> Vec<Segment<'_>> {
    let mut ranges: Vec<(Range<usize>, &ExplicitGroup)> = groups
        .iter()
        .filter_map(|group| group_range(group, len).map(|range| (range, group)))
        .collect();
    ranges.sort_by_key(|(range, _)| range.start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (range, group) in ranges {
        if range.start < cursor {
            warn!(
                "Ignoring group '{}': it overlaps an earlier group at clause {}",
                group.id, range.start
            );
            continue;
        }
        if cursor < range.start {
            segments.push(Segment::Run(cursor..range.start));
        }
        cursor = range.end;
        segments.push(Segment::Group(range, group));
    }
    if cursor < len {
        segments.push(Segment::Run(cursor..len));
    }

    segments
}

fn group_range(group: &ExplicitGroup, len: usize) -> Option<Range<usize>> {
    let mut indices: Vec<usize> = group
        .clause_indices
        .iter()
        .copied()
        .filter(|&i| i < len)
        .collect();
    indices.sort_unstable();
    indices.dedup();

    let (&first, &last) = (indices.first()?, indices.last()?);
    if last - first + 1 != indices.len() {
        warn!(
            "Ignoring group '{}': clause indices {:?} are not contiguous",
            group.id, indices
        );
        return None;
    }
    Some(first..last + 1)
}
