// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::rc::Rc;

use kurbo::{Rect, Size};
use tracing::warn;

use crate::backend::Drawable;
use crate::core::{LayoutCtx, Node, PaintCtx};

/// How an [`Image`] derives its size from the drawable's natural size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageSizing {
    /// The natural size multiplied by a factor.
    Scale(f64),
    /// A fixed width, keeping the aspect ratio.
    Width(f64),
    /// A fixed height, keeping the aspect ratio.
    Height(f64),
}

impl Default for ImageSizing {
    fn default() -> Self {
        Self::Scale(1.)
    }
}

impl ImageSizing {
    /// The size of a drawable of `natural` size, at scale 1.
    pub fn apply(self, natural: Size) -> Size {
        match self {
            Self::Scale(factor) => natural * factor,
            Self::Width(width) if natural.width > 0. => {
                Size::new(width, natural.height * width / natural.width)
            }
            Self::Height(height) if natural.height > 0. => {
                Size::new(natural.width * height / natural.height, height)
            }
            Self::Width(_) | Self::Height(_) => Size::ZERO,
        }
    }
}

/// Draws a named asset.
///
/// The drawable is looked up the first time the image is laid out and kept for as long as
/// the node is reused. A missing asset takes no space and draws nothing.
#[derive(Clone)]
pub struct Image {
    name: Rc<str>,
    sizing: ImageSizing,
    drawable: Option<Rc<dyn Drawable>>,
    missing: bool,
}

// --- MARK: BUILDERS
impl Image {
    /// An image of the asset `name` at its natural size.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self {
            name: name.into(),
            sizing: ImageSizing::default(),
            drawable: None,
            missing: false,
        }
    }

    /// Scale the natural size by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        self.sizing(ImageSizing::Scale(factor))
    }

    /// Set the width, keeping the aspect ratio.
    pub fn width(self, width: f64) -> Self {
        self.sizing(ImageSizing::Width(width))
    }

    /// Set the height, keeping the aspect ratio.
    pub fn height(self, height: f64) -> Self {
        self.sizing(ImageSizing::Height(height))
    }

    /// Set the sizing mode.
    pub fn sizing(mut self, sizing: ImageSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// The asset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, ctx: &mut LayoutCtx<'_>) -> Option<Rc<dyn Drawable>> {
        if self.drawable.is_none() && !self.missing {
            self.drawable = ctx.load_asset(&self.name);
            if self.drawable.is_none() {
                warn!("missing image asset {:?} for {}", self.name, ctx.path());
                self.missing = true;
            }
        }
        self.drawable.clone()
    }

    fn measure(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        match self.load(ctx) {
            Some(drawable) => self.sizing.apply(drawable.natural_size()) * ctx.scale(),
            None => Size::ZERO,
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("name", &self.name)
            .field("sizing", &self.sizing)
            .field("loaded", &self.drawable.is_some())
            .finish()
    }
}

// --- MARK: IMPL NODE
impl Node for Image {
    fn debug_text(&self) -> Option<String> {
        Some(self.name.to_string())
    }

    fn can_reuse(&self, candidate: &dyn Node) -> bool {
        candidate
            .downcast_ref::<Self>()
            .is_some_and(|candidate| candidate.name == self.name)
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        if let Some(previous) = previous.downcast_ref::<Self>() {
            self.drawable = previous.drawable.clone();
            self.missing = previous.missing;
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        self.measure(ctx)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, _available: Size) -> Size {
        self.measure(ctx)
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
        if let Some(drawable) = &self.drawable {
            ctx.draw_drawable(&**drawable, inner);
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::app::RenderRootOptions;
    use crate::backend::{AssetLoader, Theme};
    use crate::core::NodeExt;
    use crate::nodes::Stack;
    use crate::style::Style;
    use crate::testing::{TestHarness, TextureDrawable};

    struct CountingLoader {
        loads: Rc<Cell<u32>>,
        theme: Theme,
    }

    impl AssetLoader for CountingLoader {
        fn load_asset(&self, name: &str) -> Option<Rc<dyn Drawable>> {
            self.loads.set(self.loads.get() + 1);
            self.theme.load_asset(name)
        }

        fn style_for(&self, type_name: &str) -> Style {
            self.theme.style_for(type_name)
        }
    }

    fn harness_with(tree: impl Into<crate::core::NewNode>) -> (Rc<Cell<u32>>, TestHarness) {
        let loads = Rc::new(Cell::new(0));
        let loader = CountingLoader {
            loads: loads.clone(),
            theme: Theme::new().with_asset("logo", TextureDrawable::new("logo", (40., 20.))),
        };
        let options = RenderRootOptions {
            theme: Box::new(loader),
            ..Default::default()
        };
        (loads, TestHarness::create_with(tree, options))
    }

    #[test]
    fn sizing_modes() {
        let natural = Size::new(40., 20.);
        assert_eq!(ImageSizing::Scale(0.5).apply(natural), Size::new(20., 10.));
        assert_eq!(ImageSizing::Width(80.).apply(natural), Size::new(80., 40.));
        assert_eq!(ImageSizing::Height(10.).apply(natural), Size::new(20., 10.));
        assert_eq!(ImageSizing::Width(80.).apply(Size::ZERO), Size::ZERO);
    }

    #[test]
    fn draws_at_its_natural_size() {
        let (_, harness) = harness_with(Image::new("logo"));
        assert_eq!(harness.root().size(), Size::new(40., 20.));
        assert!(harness.draw_log().drew_texture("logo"));
    }

    #[test]
    fn drawable_is_cached_across_reuse() {
        let tree = || Stack::vertical().with_child(Image::new("logo").width(80.));
        let (loads, mut harness) = harness_with(tree());
        assert_eq!(loads.get(), 1);
        let id = harness.get(&["Stack-0", "Image-0"]).id();

        harness.rebuild(tree()).unwrap();
        harness.resize((300., 300.));
        assert_eq!(harness.get(&["Stack-0", "Image-0"]).id(), id);
        assert_eq!(harness.get(&["Stack-0", "Image-0"]).size(), Size::new(80., 40.));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn changed_name_is_a_new_node() {
        let (_, mut harness) = harness_with(Image::new("logo"));
        let id = harness.root().id();
        harness.rebuild(Image::new("other")).unwrap();
        assert_ne!(harness.root().id(), id);
    }

    #[test]
    fn missing_asset_takes_no_space() {
        let (loads, mut harness) = harness_with(Image::new("nothing"));
        assert_eq!(harness.root().size(), Size::ZERO);
        harness.resize((300., 300.));
        assert_eq!(loads.get(), 1);
    }
}
