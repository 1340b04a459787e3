//! Filter bar state: clauses, explicit groups and the user's selection
//!
//! [`FilterBar`] is the single owner of the clause sequence and the group set.
//! Every structural operation validates first and returns an
//! [`InvalidGroupError`] without touching the state when it cannot proceed.
//! The tree, query and preview are recomputed from scratch on every call.

mod selection;
mod separator;

pub use selection::{SelectModifier, Selection};
pub use separator::{Separator, separators};

use crate::filter::{
    Clause, ExplicitGroup, InvalidGroupError, LogicOp, Node, PreviewRenderer, QueryCompiler,
    build_with_groups,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

const GROUP_ID_PREFIX: &str = "group-";

/// The part of the filter bar a host application stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterBarState {
    pub clauses: Vec<Clause>,
    pub groups: Vec<ExplicitGroup>,
}

impl FilterBarState {
    /// Parse a stored state. Accepts JSON5 so hand-edited files can carry
    /// comments and trailing commas.
    pub fn from_json(raw: &str) -> Result<Self, json5::Error> {
        json5::from_str(raw)
    }
}

#[derive(Debug, Clone)]
pub struct FilterBar {
    clauses: Vec<Clause>,
    groups: Vec<ExplicitGroup>,
    selection: Selection,
    next_group_id: usize,
}

impl Default for FilterBar {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
            groups: Vec::new(),
            selection: Selection::new(),
            next_group_id: 1,
        }
    }
}

impl FilterBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stored state, checking every group invariant
    pub fn from_state(state: FilterBarState) -> Result<Self, InvalidGroupError> {
        validate_groups(&state.groups, state.clauses.len())?;

        let next_group_id = state
            .groups
            .iter()
            .filter_map(|g| g.id.strip_prefix(GROUP_ID_PREFIX)?.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        let groups = state
            .groups
            .into_iter()
            .map(|group| ExplicitGroup {
                clause_indices: distinct_sorted(&group.clause_indices),
                ..group
            })
            .collect();

        let mut bar = Self {
            clauses: state.clauses,
            groups,
            selection: Selection::new(),
            next_group_id,
        };
        for clause in &mut bar.clauses {
            clause.clear_group_metadata();
        }
        bar.groups.sort_by_key(|g| g.first());
        bar.retag_groups();
        Ok(bar)
    }

    pub fn state(&self) -> FilterBarState {
        FilterBarState {
            clauses: self.clauses.clone(),
            groups: self.groups.clone(),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn groups(&self) -> &[ExplicitGroup] {
        &self.groups
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn group_of(&self, index: usize) -> Option<&ExplicitGroup> {
        self.groups.iter().find(|g| g.contains(index))
    }

    /// Append a clause; group metadata on it is dropped. Returns its index.
    pub fn push_clause(&mut self, mut clause: Clause) -> usize {
        clause.clear_group_metadata();
        self.clauses.push(clause);
        self.clauses.len() - 1
    }

    /// Insert an empty clause right after `index`. Returns the new index.
    ///
    /// The new clause never joins a group; inserting between two members of the
    /// same group is rejected.
    pub fn insert_clause_after(
        &mut self,
        index: usize,
        connector: LogicOp,
    ) -> Result<usize, InvalidGroupError> {
        self.check_index(index)?;
        if let Some(group) = self.group_of(index)
            && group.last() != Some(index)
        {
            return Err(InvalidGroupError::SplitsGroup {
                index,
                group_id: group.id.clone(),
            });
        }

        let new_index = index + 1;
        self.clauses
            .insert(new_index, Clause::empty(Some(connector)));
        for group in &mut self.groups {
            for i in &mut group.clause_indices {
                if *i > index {
                    *i += 1;
                }
            }
        }
        self.selection.clear();
        Ok(new_index)
    }

    /// Replace what a clause filters on, keeping its connector and group
    pub fn update_clause(&mut self, index: usize, clause: Clause) -> Result<(), InvalidGroupError> {
        self.check_index(index)?;
        let current = &mut self.clauses[index];
        *current = Clause {
            connector: current.connector,
            group_id: current.group_id.take(),
            is_group_start: current.is_group_start,
            is_group_end: current.is_group_end,
            ..clause
        };
        Ok(())
    }

    pub fn set_connector(&mut self, index: usize, connector: LogicOp) -> Result<(), InvalidGroupError> {
        self.check_index(index)?;
        self.clauses[index].connector = Some(connector);
        Ok(())
    }

    /// Flip the disabled flag, returning the new value
    pub fn toggle_disabled(&mut self, index: usize) -> Result<bool, InvalidGroupError> {
        self.check_index(index)?;
        let clause = &mut self.clauses[index];
        clause.disabled = !clause.disabled;
        Ok(clause.disabled)
    }

    /// Remove a clause, renumbering groups and dissolving any group left with
    /// fewer than 2 members
    pub fn remove_clause(&mut self, index: usize) -> Result<Clause, InvalidGroupError> {
        self.check_index(index)?;

        let mut kept = Vec::with_capacity(self.groups.len());
        let mut orphans = Vec::new();
        for group in self.groups.drain(..) {
            let shifted: Vec<usize> = group
                .clause_indices
                .iter()
                .filter(|&&i| i != index)
                .map(|&i| if i > index { i - 1 } else { i })
                .collect();
            let indices = distinct_sorted(&shifted);

            if indices.len() < 2 {
                debug!("Dissolving group '{}' after removing clause {index}", group.id);
                orphans.extend(indices);
            } else {
                kept.push(ExplicitGroup {
                    clause_indices: indices,
                    ..group
                });
            }
        }

        let removed = self.clauses.remove(index);
        self.groups = kept;
        for i in orphans {
            self.clauses[i].clear_group_metadata();
        }
        self.retag_groups();
        self.selection.clear();
        Ok(removed)
    }

    /// Click on a clause
    pub fn select(&mut self, index: usize, modifier: SelectModifier) -> Result<(), InvalidGroupError> {
        self.check_index(index)?;
        self.selection.apply(index, modifier);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Group the selected clauses. Returns the new group's id.
    ///
    /// The selection must hold at least 2 adjacent clauses. Groups overlapping
    /// the selection are replaced.
    pub fn create_group(&mut self, group_type: LogicOp) -> Result<String, InvalidGroupError> {
        let range = self.selection.contiguous_range()?;
        if range.end > self.clauses.len() {
            return Err(InvalidGroupError::IndexOutOfRange {
                index: range.end - 1,
                len: self.clauses.len(),
            });
        }

        let overlapping: Vec<String> = self
            .groups
            .iter()
            .filter(|g| g.clause_indices.iter().any(|i| range.contains(i)))
            .map(|g| g.id.clone())
            .collect();
        for id in &overlapping {
            debug!("Replacing overlapping group '{id}'");
            self.detach_group(id);
        }

        let id = format!("{GROUP_ID_PREFIX}{}", self.next_group_id);
        self.next_group_id += 1;
        self.groups
            .push(ExplicitGroup::new(id.clone(), group_type, range.collect()));
        self.groups.sort_by_key(|g| g.first());
        self.retag_groups();
        self.selection.clear();
        Ok(id)
    }

    /// Ungroup: the clauses stay, the grouping goes
    pub fn remove_group(&mut self, id: &str) -> Result<ExplicitGroup, InvalidGroupError> {
        self.detach_group(id)
            .ok_or_else(|| InvalidGroupError::GroupNotFound(id.to_string()))
    }

    pub fn separators(&self) -> Vec<Separator> {
        separators(&self.clauses, &self.groups)
    }

    pub fn ast(&self) -> Option<Node> {
        build_with_groups(&self.clauses, &self.groups)
    }

    /// `{"query": ...}` with default compiler settings
    pub fn query(&self) -> Value {
        self.query_with(&QueryCompiler::default())
    }

    pub fn query_with(&self, compiler: &QueryCompiler) -> Value {
        compiler.to_query_document(self.ast().as_ref())
    }

    pub fn preview(&self) -> String {
        self.preview_with(&PreviewRenderer::default())
    }

    pub fn preview_with(&self, renderer: &PreviewRenderer) -> String {
        renderer.render_preview(self.ast().as_ref())
    }

    fn check_index(&self, index: usize) -> Result<(), InvalidGroupError> {
        if index < self.clauses.len() {
            Ok(())
        } else {
            Err(InvalidGroupError::IndexOutOfRange {
                index,
                len: self.clauses.len(),
            })
        }
    }

    fn detach_group(&mut self, id: &str) -> Option<ExplicitGroup> {
        let pos = self.groups.iter().position(|g| g.id == id)?;
        let group = self.groups.remove(pos);
        for &i in &group.clause_indices {
            if let Some(clause) = self.clauses.get_mut(i) {
                clause.clear_group_metadata();
            }
        }
        Some(group)
    }

    /// Write group id and start/end flags onto every grouped clause
    fn retag_groups(&mut self) {
        for group in &self.groups {
            let (first, last) = (group.first(), group.last());
            for &i in &group.clause_indices {
                let clause = &mut self.clauses[i];
                clause.group_id = Some(group.id.clone());
                clause.is_group_start = Some(i) == first;
                clause.is_group_end = Some(i) == last;
            }
        }
    }
}

fn distinct_sorted(indices: &[usize]) -> Vec<usize> {
    let mut out = indices.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Check size, bounds, contiguity, overlap and id uniqueness of a group set
fn validate_groups(groups: &[ExplicitGroup], len: usize) -> Result<(), InvalidGroupError> {
    let mut ids = HashSet::new();
    let mut covered = HashSet::new();

    for group in groups {
        if !ids.insert(group.id.as_str()) {
            return Err(InvalidGroupError::InvalidState(format!(
                "duplicate group id '{}'",
                group.id
            )));
        }

        let indices = distinct_sorted(&group.clause_indices);
        if indices.len() < 2 {
            return Err(InvalidGroupError::TooFewMembers(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(InvalidGroupError::IndexOutOfRange { index, len });
        }
        if indices[indices.len() - 1] - indices[0] + 1 != indices.len() {
            return Err(InvalidGroupError::NonContiguous(indices));
        }
        for &i in &indices {
            if !covered.insert(i) {
                return Err(InvalidGroupError::InvalidState(format!(
                    "clause {i} belongs to more than one group"
                )));
            }
        }
    }

    Ok(())
}
