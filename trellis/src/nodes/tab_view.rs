// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};
use tracing::trace;

use crate::core::{
    BuildCtx, BuildError, Content, LayoutCtx, NewNode, Node, NodeExt, PaintCtx, expand_contents,
};
use crate::nodes::{Button, Group, Spacer, Stack, Text};
use crate::style::StyleExt;

/// Shows one child at a time, below a row of tab buttons.
///
/// Each button is labelled with its child's navigation [`item`](NodeExt::item), or
/// "Tab N" when the child has none. The index of the shown child lives in the view's own
/// `selected` state cell, so it survives rebuilds that reuse the view.
#[derive(Clone, Debug, Default)]
pub struct TabView;

impl TabView {
    /// Create a tab view showing its first child.
    pub fn new() -> Self {
        Self
    }
}

impl Node for TabView {
    fn children(
        &mut self,
        ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        let selected = ctx.state("selected", || 0usize)?;
        let pages = expand_contents(contents)?;

        let buttons: Vec<NewNode> = pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let label = page
                    .nav_item()
                    .cloned()
                    .unwrap_or_else(|| Text::new(format!("Tab {}", index + 1)).into());
                let selected = selected.clone();
                Button::with_label(label)
                    .on_click(move |_| {
                        trace!("tab {index} selected");
                        selected.set(index);
                    })
                    .into()
            })
            .collect();
        let tabs = Stack::horizontal()
            .with_child(Spacer::new())
            .with_child(Stack::horizontal().with_children(buttons))
            .with_child(Spacer::new())
            .spacing(0.);

        let page = pages
            .into_iter()
            .nth(selected.get())
            .unwrap_or_else(|| Group::new().into());
        Ok(vec![
            Stack::vertical()
                .with_child(tabs)
                .with_child(page)
                .spacing(0.),
        ])
    }

    fn content_size(&mut self, _ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        available
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        ctx.fill_background();
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    const BUTTONS: [&str; 4] = ["TabView-0", "Stack-0", "Stack-0", "Stack-1"];

    fn tabs() -> NewNode {
        TabView::new()
            .with_child(Text::new("first page").item(Text::new("One")))
            .with_child(Text::new("second page"))
    }

    fn button(harness: &TestHarness, index: usize) -> crate::core::NodeRef<'_> {
        let name = format!("Button-{index}");
        let mut path = BUTTONS.to_vec();
        path.push(&name);
        harness.get(&path)
    }

    fn page(harness: &TestHarness) -> String {
        let page = harness.get(&["TabView-0", "Stack-0"]).child(1).unwrap();
        page.downcast::<Text>().unwrap().text().to_string()
    }

    #[test]
    fn buttons_are_labelled_from_items() {
        let harness = TestHarness::create(tabs());
        let label = |index| {
            let label = button(&harness, index).child(0).unwrap();
            label.downcast::<Text>().unwrap().text().to_string()
        };
        assert_eq!(label(0), "One");
        assert_eq!(label(1), "Tab 2");
        assert_eq!(page(&harness), "first page");
    }

    #[test]
    fn clicking_a_tab_shows_its_page() {
        let mut harness = TestHarness::create(tabs());
        let id = button(&harness, 1).id();
        harness.mouse_click_on(id);
        assert_eq!(page(&harness), "second page");

        // The selection is kept when the application rebuilds.
        harness.rebuild(tabs()).unwrap();
        assert_eq!(page(&harness), "second page");
        let selected = harness.root().state::<usize>("selected").unwrap().unwrap();
        assert_eq!(selected.get(), 1);
    }

    #[test]
    fn out_of_range_selection_shows_nothing() {
        let mut harness = TestHarness::create(tabs());
        let id = button(&harness, 1).id();
        harness.mouse_click_on(id);
        harness.rebuild(TabView::new().with_child(Text::new("only"))).unwrap();

        let page = harness.get(&["TabView-0", "Stack-0"]).child(1).unwrap();
        assert!(page.downcast::<Group>().is_some());
    }
}
