// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use smallvec::SmallVec;

/// One step of an [`IdPath`]: a node's short type name and its index among its siblings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PathSegment {
    /// Short type name of the node.
    pub type_name: &'static str,
    /// Index among the resolved children of the parent.
    pub index: usize,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.type_name, self.index)
    }
}

/// The identity of a node: the chain of `(type, sibling index)` pairs from the root.
///
/// Two nodes of consecutive rebuilds are the same logical node iff their paths are equal.
/// The router stores paths rather than node handles, so a path that no longer resolves
/// simply means "nothing".
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct IdPath(SmallVec<[PathSegment; 8]>);

impl IdPath {
    /// The path of a root node.
    pub fn root(type_name: &'static str) -> Self {
        Self(SmallVec::from_slice(&[PathSegment {
            type_name,
            index: 0,
        }]))
    }

    /// The path of the child at `index` of the node at `self`.
    pub fn child(&self, type_name: &'static str, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment { type_name, index });
        path
    }

    /// The path of the parent node, or `None` for a root.
    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            len => Some(Self(self.0[..len - 1].iter().copied().collect())),
        }
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The last segment.
    pub fn last(&self) -> Option<PathSegment> {
        self.0.last().copied()
    }

    /// Depth of the node, `1` for a root.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segment.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` is `ancestor` or one of its descendants.
    pub fn starts_with(&self, ancestor: &Self) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Compare with a path written as segment names, such as `["Stack-0", "Text-1"]`.
    pub fn matches(&self, names: &[&str]) -> bool {
        self.0.len() == names.len()
            && self
                .0
                .iter()
                .zip(names)
                .all(|(segment, name)| segment.to_string() == *name)
    }
}

impl FromIterator<PathSegment> for IdPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdPath({self})")
    }
}
