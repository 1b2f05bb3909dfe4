// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::rc::Rc;

use kurbo::{Insets, Point, Rect, Size};
use peniko::Color;
use tracing::debug;

use crate::backend::Primitive;
use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, LayoutCtx, Lifecycle, LifecycleCtx,
    NewNode, Node, NodeExt, PaintCtx, PlaceCtx, PointerEvent, Update, UpdateCtx,
    expand_contents,
};
use crate::geometry::{Alignment, Axis};
use crate::layout::stack;
use crate::nodes::{Button, Spacer, Text};
use crate::state::StateCell;
use crate::style::{Style, StyleExt};

const HIGHLIGHT: Color = Color::from_rgba8(0, 100, 200, 255);
const MENU_WIDTH: f64 = 150.;

type SelectAction = Rc<dyn Fn(&mut EventCtx<'_>)>;
type PickAction = Rc<dyn Fn(&mut EventCtx<'_>, usize)>;

// --- MARK: MENU
/// A column of [`MenuItem`]s, shown above the tree with
/// [`EventCtx::show_menu`](crate::core::EventCtx::show_menu).
///
/// Draws the `menu` asset behind its items.
#[derive(Clone, Debug, Default)]
pub struct Menu;

impl Menu {
    /// An empty menu.
    pub fn new() -> Self {
        Self
    }
}

impl Node for Menu {
    fn default_style(&self) -> Style {
        Style {
            spacing: Some(0.),
            alignment: Some(Alignment::Leading),
            ..Default::default()
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, Axis::Vertical)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, Axis::Vertical, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, Axis::Vertical, inside)
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        ctx.fill_background();
        let frame = ctx.frame();
        ctx.draw_asset("menu", frame);
    }
}

// --- MARK: MENU ITEM
/// A row of a [`Menu`].
///
/// Highlighted while hovered. Clicking it runs its action; the menu closes once the click
/// is handled.
#[derive(Clone, Default)]
pub struct MenuItem {
    action: Option<SelectAction>,
}

impl MenuItem {
    /// An item without an action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback invoked when the item is clicked.
    pub fn on_select(mut self, action: impl Fn(&mut EventCtx<'_>) + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl Node for MenuItem {
    fn is_interactive(&self) -> bool {
        true
    }

    fn draws_focus(&self) -> bool {
        false
    }

    fn default_style(&self) -> Style {
        Style {
            padding: Some(Insets::uniform_xy(10., 5.)),
            spacing: Some(0.),
            ..Default::default()
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, Axis::Horizontal)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, Axis::Horizontal, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, Axis::Horizontal, inside)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Click { .. } => {
                debug!("menu item {} selected", ctx.path());
                if let Some(action) = self.action.clone() {
                    action(ctx);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>, event: &Update) {
        if let Update::HoveredChanged(_) = event {
            ctx.request_render();
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        if ctx.is_hovered() {
            let frame = ctx.frame();
            ctx.draw(&Primitive::Fill(HIGHLIGHT), frame);
        } else {
            ctx.fill_background();
        }
    }
}

// --- MARK: PICKER
/// A button showing the selected option, which opens a [`Menu`] of all options.
///
/// Every child is an option. The button shows the option at the index held in
/// `selection`, or "Select" when the index is out of range. Picking an item writes its
/// index to `selection` and rebuilds the picker.
#[derive(Clone)]
pub struct Picker {
    selection: StateCell<usize>,
    action: Option<PickAction>,
    options: Vec<NewNode>,
    /// The cell this instance's node is subscribed to.
    watched: Option<StateCell<usize>>,
}

// --- MARK: BUILDERS
impl Picker {
    /// A picker whose selected index is kept in `selection`.
    pub fn new(selection: StateCell<usize>) -> Self {
        Self {
            selection,
            action: None,
            options: Vec::new(),
            watched: None,
        }
    }

    /// Set the callback invoked with the index of a picked option.
    pub fn on_pick(mut self, action: impl Fn(&mut EventCtx<'_>, usize) + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// The selected index.
    pub fn selected(&self) -> usize {
        self.selection.get()
    }

    fn menu(&self) -> NewNode {
        let items: Vec<NewNode> = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let selection = self.selection.clone();
                let action = self.action.clone();
                MenuItem::new()
                    .on_select(move |ctx| {
                        selection.set(index);
                        if let Some(action) = &action {
                            action(ctx, index);
                        }
                    })
                    .with_child(option.clone())
                    .with_child(Spacer::new())
            })
            .collect();
        Menu::new().with_children(items).size(MENU_WIDTH, None)
    }
}

impl fmt::Debug for Picker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("selection", &self.selection)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

// --- MARK: IMPL NODE
impl Node for Picker {
    fn is_interactive(&self) -> bool {
        true
    }

    fn default_style(&self) -> Style {
        Style {
            spacing: Some(0.),
            ..Default::default()
        }
    }

    fn children(
        &mut self,
        _ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        self.options = expand_contents(contents)?;
        let label = self
            .options
            .get(self.selection.get())
            .cloned()
            .unwrap_or_else(|| Text::new("Select").into());
        Ok(vec![Button::with_label(label).interactive(false)])
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        if let Some(previous) = previous.downcast_ref::<Self>() {
            self.watched = previous.watched.clone();
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifecycleCtx<'_>, event: Lifecycle) {
        if !matches!(event, Lifecycle::Mounted | Lifecycle::Updated) {
            return;
        }
        let subscribed = self
            .watched
            .as_ref()
            .is_some_and(|watched| watched.ptr_eq(&self.selection));
        if !subscribed {
            ctx.watch(&self.selection);
            self.watched = Some(self.selection.clone());
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, Axis::Horizontal)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, Axis::Horizontal, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, Axis::Horizontal, inside)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Click { pos } => {
                debug!("picker {} opened with {} options", ctx.path(), self.options.len());
                ctx.show_menu(self.menu(), *pos);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::nodes::Stack;
    use crate::testing::{DrawCommand, TestHarness};

    fn picker(selection: &StateCell<usize>) -> Picker {
        Picker::new(selection.clone())
    }

    fn options(picker: Picker) -> NewNode {
        picker
            .with_child(Text::new("Item One"))
            .with_child(Text::new("Item Two"))
            .with_child(Text::new("Item Three"))
    }

    fn label(harness: &TestHarness) -> String {
        let text = harness.get(&["Picker-0", "Button-0"]).child(0).unwrap();
        text.downcast::<Text>().unwrap().text().to_string()
    }

    fn open(harness: &mut TestHarness) -> Point {
        let center = harness.root().layout_rect().center();
        harness.mouse_click_at(center);
        center
    }

    #[test]
    fn shows_the_selected_option() {
        let selection = StateCell::detached(1);
        let harness = TestHarness::create(options(picker(&selection)));
        assert_eq!(label(&harness), "Item Two");

        let selection = StateCell::detached(7);
        let harness = TestHarness::create(options(picker(&selection)));
        assert_eq!(label(&harness), "Select");
    }

    #[test]
    fn click_opens_a_menu_at_the_pointer() {
        let selection = StateCell::detached(0);
        let mut harness = TestHarness::create(options(picker(&selection)));
        assert!(harness.menu().is_none());

        let at = open(&mut harness);
        let menu = harness.menu().unwrap();
        assert_eq!(menu.layout_rect().origin(), at);
        assert_eq!(menu.size().width, MENU_WIDTH);
        assert_eq!(menu.children().count(), 3);

        // Rows are 16 px of text plus 5 px of padding above and below.
        let item = harness.get(&["Menu-0", "MenuItem-2"]);
        assert_eq!(
            item.layout_rect(),
            Rect::from_origin_size(Point::new(at.x, at.y + 52.), (MENU_WIDTH, 26.))
        );
    }

    #[test]
    fn picking_an_item_selects_it_and_closes_the_menu() {
        let selection = StateCell::detached(0);
        let picked = Rc::new(Cell::new(None));
        let record = picked.clone();
        let tree = options(picker(&selection).on_pick(move |_, index| record.set(Some(index))));
        let mut harness = TestHarness::create(tree);
        let picker_id = harness.root().id();

        open(&mut harness);
        let item = harness.get(&["Menu-0", "MenuItem-2"]).id();
        harness.mouse_click_on(item);

        assert_eq!(selection.get(), 2);
        assert_eq!(picked.get(), Some(2));
        assert!(harness.menu().is_none());
        assert_eq!(label(&harness), "Item Three");
        assert_eq!(harness.root().id(), picker_id);
    }

    #[test]
    fn release_elsewhere_dismisses_without_picking() {
        let selection = StateCell::detached(1);
        let mut harness = TestHarness::create(options(picker(&selection)));

        open(&mut harness);
        assert!(harness.menu().is_some());
        harness.mouse_click_at((1., 1.));

        assert!(harness.menu().is_none());
        assert_eq!(selection.get(), 1);
        assert_eq!(label(&harness), "Item Two");
    }

    #[test]
    fn hovered_item_is_highlighted() {
        let selection = StateCell::detached(0);
        let mut harness = TestHarness::create(options(picker(&selection)));
        open(&mut harness);

        let item = harness.get(&["Menu-0", "MenuItem-1"]).layout_rect();
        harness.mouse_move(item.center());
        assert!(harness.get(&["Menu-0", "MenuItem-1"]).is_hovered());

        let highlight = DrawCommand::Fill {
            frame: item,
            color: [0, 100, 200, 255],
            opacity: 1.,
        };
        assert!(harness.draw_log().commands().contains(&highlight));
    }

    #[test]
    fn picker_inside_a_stack_keeps_its_selection_cell() {
        let selection = StateCell::detached(0);
        let tree = || Stack::vertical().with_child(options(picker(&selection)));
        let mut harness = TestHarness::create(tree());
        harness.rebuild(tree()).unwrap();

        let center = harness.get(&["Stack-0", "Picker-0"]).layout_rect().center();
        harness.mouse_click_at(center);
        let item = harness.get(&["Menu-0", "MenuItem-1"]).id();
        harness.mouse_click_on(item);

        let button = harness.get(&["Stack-0", "Picker-0", "Button-0"]);
        let text = button.child(0).unwrap();
        assert_eq!(text.downcast::<Text>().unwrap().text(), "Item Two");
    }
}
