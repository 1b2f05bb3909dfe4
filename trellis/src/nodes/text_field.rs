// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Insets, Rect, Size};
use peniko::Color;
use tracing::trace;

use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, Key, KeyState, LayoutCtx, NewNode, Node,
    PaintCtx, TextEvent,
};
use crate::nodes::Text;
use crate::state::StateCell;
use crate::style::{Style, StyleExt};

const PLACEHOLDER_COLOR: Color = Color::from_rgba8(128, 128, 128, 255);

/// A single-line text input bound to a string.
///
/// While focused, inserted text is appended and Backspace deletes the last character.
/// The field takes the full offered width and shows its placeholder while empty.
#[derive(Clone, Debug)]
pub struct TextField {
    text: StateCell<String>,
    placeholder: String,
}

// --- MARK: BUILDERS
impl TextField {
    /// A field editing `text`.
    pub fn new(text: StateCell<String>) -> Self {
        Self {
            text,
            placeholder: String::new(),
        }
    }

    /// Set the text shown while the field is empty.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.text.get()
    }
}

// --- MARK: IMPL NODE
impl Node for TextField {
    fn is_interactive(&self) -> bool {
        true
    }

    fn default_style(&self) -> Style {
        Style {
            padding: Some(Insets::new(20., 4., 20., 5.)),
            ..Default::default()
        }
    }

    fn children(
        &mut self,
        _ctx: &mut BuildCtx<'_>,
        _contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        let text = self.text.get();
        let label = if text.is_empty() {
            Text::new(self.placeholder.clone()).color(PLACEHOLDER_COLOR)
        } else {
            Text::new(text).into()
        };
        Ok(vec![label])
    }

    fn content_size(&mut self, _ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        Size::new(available.width, 0.)
    }

    fn on_text_event(&mut self, ctx: &mut EventCtx<'_>, event: &TextEvent) -> Handled {
        match event {
            TextEvent::Insert(inserted) => {
                self.text.update(|text| text.push_str(inserted));
                ctx.request_rebuild();
                Handled::Yes
            }
            TextEvent::Keyboard(key) if key.state == KeyState::Down => match &key.key {
                Key::Backspace => {
                    let mut text = self.text.get();
                    if text.pop().is_some() {
                        trace!("deleted from {}", ctx.node_id());
                        self.text.set(text);
                        ctx.request_rebuild();
                    }
                    Handled::Yes
                }
                Key::Character(_) => Handled::Yes,
                _ => Handled::No,
            },
            TextEvent::Keyboard(_) => Handled::No,
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        let frame = ctx.frame();
        if !ctx.draw_asset("textfield", frame) {
            ctx.fill_background();
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeExt;
    use crate::nodes::Stack;
    use crate::testing::TestHarness;

    fn label(harness: &TestHarness) -> String {
        let text = harness.find_by_type("Text");
        text.downcast::<Text>().unwrap().text().to_string()
    }

    #[test]
    fn placeholder_while_empty() {
        let text = StateCell::detached(String::new());
        let harness = TestHarness::create(TextField::new(text).placeholder("Name"));
        assert_eq!(label(&harness), "Name");
        let color = harness.find_by_type("Text").style().color;
        assert_eq!(color.to_rgba8().to_u8_array(), [128, 128, 128, 255]);
        assert_eq!(harness.root().size(), Size::new(400., 25.));
    }

    #[test]
    fn typing_into_the_focused_field() {
        let text = StateCell::detached(String::new());
        let tree = Stack::vertical().with_child(TextField::new(text.clone()).placeholder("Name"));
        let mut harness = TestHarness::create(tree);

        assert!(!harness.type_text("ignored").is_handled());
        harness.press_tab(true);
        harness.type_text("hi");
        harness.type_text("!");
        assert_eq!(text.get(), "hi!");
        assert_eq!(label(&harness), "hi!");

        harness.key_down(Key::Backspace);
        assert_eq!(text.get(), "hi");
        assert_eq!(label(&harness), "hi");
    }

    #[test]
    fn space_does_not_click() {
        let text = StateCell::detached(String::from("a"));
        let mut harness = TestHarness::create(TextField::new(text.clone()));
        let id = harness.root().id();
        harness.mouse_click_on(id);

        assert!(harness.key_down(Key::Character(" ".into())).is_handled());
        harness.type_text(" ");
        assert_eq!(text.get(), "a ");
    }

    #[test]
    fn backspace_on_empty_is_harmless() {
        let text = StateCell::detached(String::new());
        let mut harness = TestHarness::create(TextField::new(text.clone()));
        let id = harness.root().id();
        harness.mouse_click_on(id);
        harness.key_down(Key::Backspace);
        assert_eq!(text.get(), "");
    }
}
