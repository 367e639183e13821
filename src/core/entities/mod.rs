use serde::{Deserialize, Serialize};

/// Node handle, unique within a single contraction level.
///
/// At level 0 the handle indexes the interned node names of the input graph;
/// after a contraction it indexes the hyper-nodes of the new level.
#[derive(
    Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize, Default,
)]
#[repr(transparent)]
pub struct VID(pub usize);

impl VID {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for VID {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Stable community handle, assigned once at community creation.
///
/// Replaces the original concatenated-label identity; the human-readable
/// label is computed on demand from the community members instead.
#[derive(
    Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize, Default,
)]
#[repr(transparent)]
pub struct ComID(pub usize);

impl ComID {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ComID {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl<'a> From<&'a usize> for ComID {
    fn from(value: &'a usize) -> Self {
        Self(*value)
    }
}
