use crate::filter::InvalidGroupError;
use std::collections::BTreeSet;
use std::ops::Range;

/// How a click on a clause combines with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectModifier {
    /// Plain click: select only this clause
    #[default]
    None,
    /// Toggle this clause in or out of the selection
    Ctrl,
    /// Select everything between the last clicked clause and this one
    Shift,
}

/// Clauses picked by the user, waiting to be grouped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
    last_clicked: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected indices in ascending order
    pub fn indices(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    pub fn last_clicked(&self) -> Option<usize> {
        self.last_clicked
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.last_clicked = None;
    }

    pub(crate) fn apply(&mut self, index: usize, modifier: SelectModifier) {
        match (modifier, self.last_clicked) {
            (SelectModifier::Ctrl, _) => {
                if !self.indices.remove(&index) {
                    self.indices.insert(index);
                }
            }
            (SelectModifier::Shift, Some(anchor)) => {
                self.indices = (anchor.min(index)..=anchor.max(index)).collect();
            }
            (SelectModifier::None | SelectModifier::Shift, _) => {
                self.indices = BTreeSet::from([index]);
            }
        }
        self.last_clicked = Some(index);
    }

    /// The selection as a range, if it is big enough and has no gaps
    pub fn contiguous_range(&self) -> Result<Range<usize>, InvalidGroupError> {
        let (Some(&first), Some(&last)) = (self.indices.first(), self.indices.last()) else {
            return Err(InvalidGroupError::TooFewMembers(0));
        };
        if self.indices.len() < 2 {
            return Err(InvalidGroupError::TooFewMembers(self.indices.len()));
        }
        if last - first + 1 != self.indices.len() {
            return Err(InvalidGroupError::NonContiguous(self.indices()));
        }
        Ok(first..last + 1)
    }
}
