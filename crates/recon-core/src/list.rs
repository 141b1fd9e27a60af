//! Positional list edits: a context-sensitive reference change family.
//!
//! A changeset is a sequence of single-element insertions and removals at
//! explicit indexes, with the removed value recorded so every operation has
//! an inverse. Unlike integer intentions, rebasing here genuinely
//! transforms indexes against the changes that came before: a change's
//! meaning depends on where it lands, so this family exercises the
//! transposition paths end to end.

use crate::codec::{ChangeCodec, CodecError};
use crate::family::ChangeFamily;
use serde::{Deserialize, Serialize};

/// Codec version for [`ListChange`] payloads.
pub const LIST_CODEC_VERSION: u32 = 1;

/// One positional edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOp {
    /// Insert `value` so it ends up at `index`.
    Insert { index: usize, value: char },
    /// Remove the element at `index`, which must be `value`.
    Remove { index: usize, value: char },
}

impl ListOp {
    pub fn insert(index: usize, value: char) -> Self {
        ListOp::Insert { index, value }
    }

    pub fn remove(index: usize, value: char) -> Self {
        ListOp::Remove { index, value }
    }

    fn inverse(&self) -> Self {
        match self {
            ListOp::Insert { index, value } => ListOp::Remove {
                index: *index,
                value: *value,
            },
            ListOp::Remove { index, value } => ListOp::Insert {
                index: *index,
                value: *value,
            },
        }
    }

    /// Transform this operation to apply after `over`. On an index tie
    /// between two insertions, the smaller value keeps its slot.
    fn transformed_over(&self, over: &ListOp) -> ListOp {
        match (self, over) {
            (ListOp::Insert { index, value }, ListOp::Insert { index: j, value: vj }) => {
                let shifted = j < index || (j == index && vj <= value);
                ListOp::Insert {
                    index: if shifted { index + 1 } else { *index },
                    value: *value,
                }
            }
            (ListOp::Insert { index, value }, ListOp::Remove { index: j, .. }) => ListOp::Insert {
                index: if j < index { index - 1 } else { *index },
                value: *value,
            },
            (ListOp::Remove { index, value }, ListOp::Insert { index: j, .. }) => ListOp::Remove {
                index: if j <= index { index + 1 } else { *index },
                value: *value,
            },
            (ListOp::Remove { index, value }, ListOp::Remove { index: j, .. }) => ListOp::Remove {
                index: if j < index { index - 1 } else { *index },
                value: *value,
            },
        }
    }
}

/// A changeset over positional edits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChange {
    ops: Vec<ListOp>,
}

impl ListChange {
    /// The identity change.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A change carrying a single operation.
    pub fn mint(op: ListOp) -> Self {
        Self { ops: vec![op] }
    }

    pub fn from_ops(ops: impl IntoIterator<Item = ListOp>) -> Self {
        Self {
            ops: ops.into_iter().collect(),
        }
    }

    pub fn ops(&self) -> &[ListOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Apply an emitted delta to a list-of-characters view.
pub fn apply_list_delta(view: &mut Vec<char>, delta: &[ListOp]) {
    for op in delta {
        match op {
            ListOp::Insert { index, value } => view.insert(*index, *value),
            ListOp::Remove { index, value } => {
                debug_assert_eq!(
                    view.get(*index),
                    Some(value),
                    "removal targets a different element"
                );
                view.remove(*index);
            }
        }
    }
}

/// The positional reference change family.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListFamily;

/// Anchor set for the list family: positions into the sequenced document,
/// shifted in place as changes land.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListAnchors {
    positions: Vec<usize>,
}

impl ListAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(positions: impl IntoIterator<Item = usize>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

impl ChangeFamily for ListFamily {
    type Change = ListChange;
    type Delta = Vec<ListOp>;
    type Anchors = ListAnchors;

    fn compose(&self, changes: &[ListChange]) -> ListChange {
        let mut ops = Vec::new();
        for change in changes {
            ops.extend_from_slice(&change.ops);
        }
        ListChange { ops }
    }

    fn invert(&self, change: &ListChange) -> ListChange {
        ListChange {
            ops: change.ops.iter().rev().map(ListOp::inverse).collect(),
        }
    }

    /// Transform every operation of `change` past the whole of `over`,
    /// threading both contexts: each operation of `change` advances the
    /// image of `over` that the next operation is transformed against.
    fn rebase(&self, change: &ListChange, over: &ListChange) -> ListChange {
        let mut over_ops = over.ops.clone();
        let mut rebased = Vec::with_capacity(change.ops.len());
        for op in &change.ops {
            let mut transformed = op.clone();
            let mut advanced = Vec::with_capacity(over_ops.len());
            for over_op in &over_ops {
                let original = transformed.clone();
                transformed = original.transformed_over(over_op);
                advanced.push(over_op.transformed_over(&original));
            }
            over_ops = advanced;
            rebased.push(transformed);
        }
        ListChange { ops: rebased }
    }

    fn rebase_anchors(&self, anchors: &mut ListAnchors, over: &ListChange) {
        for op in &over.ops {
            for position in &mut anchors.positions {
                match op {
                    ListOp::Insert { index, .. } if *index <= *position => *position += 1,
                    ListOp::Remove { index, .. } if *index < *position => *position -= 1,
                    _ => {}
                }
            }
        }
    }

    fn into_delta(&self, change: &ListChange) -> Vec<ListOp> {
        change.ops.clone()
    }

    fn is_identity(&self, change: &ListChange) -> bool {
        change.is_empty()
    }
}

impl ChangeCodec for ListFamily {
    fn encode_json(
        &self,
        version: u32,
        change: &ListChange,
    ) -> Result<serde_json::Value, CodecError> {
        if version != LIST_CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        serde_json::to_value(change).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    fn decode_json(
        &self,
        version: u32,
        data: &serde_json::Value,
    ) -> Result<ListChange, CodecError> {
        if version != LIST_CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        serde_json::from_value(data.clone()).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
