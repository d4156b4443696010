//! Label definitions for per-node integer slots.
//!
//! A label is an `i32` slot carried by every node, addressed by the offset
//! returned from [`MtgGraph::define_label`](crate::topology::graph::MtgGraph::define_label).
//! Callers pick their own integer tag for each label and can resolve a tag
//! back to its offset later. The values themselves live in the node arena;
//! this table only records what each slot means.

use crate::mesh_error::MtgError;

/// How a label is expected to behave around a vertex.
///
/// This is documentation for callers. The kernel does not enforce it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LabelKind {
    /// Constant on every node of a vertex loop (e.g. a vertex index).
    Vertex,
    /// May differ per face corner (e.g. a normal or texture index).
    Sector,
}

/// One defined label slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LabelDefinition {
    /// Caller-chosen tag.
    pub tag: i32,
    pub kind: LabelKind,
    /// Value given to nodes that have never been written.
    pub default: i32,
}

/// Ordered list of label definitions; a definition's position is its offset.
#[derive(Clone, Debug, Default)]
pub(crate) struct LabelTable {
    defs: Vec<LabelDefinition>,
}

impl LabelTable {
    /// Appends a definition and returns its offset.
    pub(crate) fn define(
        &mut self,
        tag: i32,
        kind: LabelKind,
        default: i32,
    ) -> Result<usize, MtgError> {
        if self.search(tag).is_some() {
            return Err(MtgError::DuplicateLabelTag(tag));
        }
        self.defs.push(LabelDefinition { tag, kind, default });
        Ok(self.defs.len() - 1)
    }

    pub(crate) fn search(&self, tag: i32) -> Option<usize> {
        self.defs.iter().position(|d| d.tag == tag)
    }

    pub(crate) fn get(&self, offset: usize) -> Option<&LabelDefinition> {
        self.defs.get(offset)
    }

    pub(crate) fn len(&self) -> usize {
        self.defs.len()
    }

    pub(crate) fn check_offset(&self, offset: usize) -> Result<(), MtgError> {
        if offset < self.defs.len() {
            Ok(())
        } else {
            Err(MtgError::LabelOffsetOutOfRange {
                offset,
                count: self.defs.len(),
            })
        }
    }

    /// Default values in offset order, i.e. a fresh node's label record.
    pub(crate) fn defaults(&self) -> impl Iterator<Item = i32> + '_ {
        self.defs.iter().map(|d| d.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_search() {
        let mut table = LabelTable::default();
        assert_eq!(table.define(100, LabelKind::Vertex, -1), Ok(0));
        assert_eq!(table.define(200, LabelKind::Sector, 7), Ok(1));
        assert_eq!(table.search(200), Some(1));
        assert_eq!(table.search(300), None);
        assert_eq!(table.defaults().collect::<Vec<_>>(), vec![-1, 7]);
        assert_eq!(table.get(1).map(|d| d.kind), Some(LabelKind::Sector));
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut table = LabelTable::default();
        table.define(5, LabelKind::Vertex, 0).unwrap();
        assert_eq!(
            table.define(5, LabelKind::Sector, 1),
            Err(MtgError::DuplicateLabelTag(5))
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn offset_check() {
        let mut table = LabelTable::default();
        assert!(table.check_offset(0).is_err());
        table.define(1, LabelKind::Vertex, 0).unwrap();
        assert!(table.check_offset(0).is_ok());
        assert_eq!(
            table.check_offset(3),
            Err(MtgError::LabelOffsetOutOfRange { offset: 3, count: 1 })
        );
    }
}
