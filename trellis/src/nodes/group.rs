// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::Node;

/// A generic container.
///
/// Children are stacked on top of each other, each centred in the group's inner
/// rectangle. A group is always reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group;

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self
    }
}

impl Node for Group {}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};

    use super::*;
    use crate::core::NodeExt;
    use crate::nodes::Text;
    use crate::style::StyleExt;
    use crate::testing::TestHarness;

    #[test]
    fn children_are_centred_in_the_inner_rect() {
        let tree = Group::new()
            .with_child(Text::new("wide text"))
            .with_child(Text::new("a"))
            .padding(10.);
        let harness = TestHarness::create_with_size(tree, Size::new(200., 100.));

        // 90 px of text plus 10 px padding on both sides.
        let group = harness.get(&["Group-0"]);
        assert_eq!(group.layout_rect(), Rect::new(45., 32., 155., 68.));
        let narrow = harness.get(&["Group-0", "Text-1"]);
        assert_eq!(narrow.layout_rect(), Rect::new(95., 42., 105., 58.));
    }
}
