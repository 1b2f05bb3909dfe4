// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Contracts of the collaborators the runtime draws with and loads assets from.
//!
//! The runtime never rasterizes anything itself: it measures text and issues draw calls
//! through a [`Renderer`], and asks an [`AssetLoader`] for named [`Drawable`]s and for the
//! per-type style defaults. [`Theme`] is the JSON-configured loader used by default.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use kurbo::{Insets, Point, Rect, Size};
use peniko::Color;
use serde::Deserialize;
use tracing::warn;

use crate::geometry::{Alignment, Priority};
use crate::style::{FontSpec, ResolvedStyle, Style};

/// Something the renderer knows how to draw into a frame.
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    /// Fill the frame, honouring the style's corner radius.
    Fill(Color),
    /// Draw text wrapped to the frame with the style's font, colour and line limit.
    Text(&'a str),
    /// Outline the frame.
    FocusRing(Color),
    /// A straight line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke width.
        width: f64,
        /// Stroke colour.
        color: Color,
    },
}

/// The rasterizer behind a window.
///
/// Implementations may cache backend resources (glyph runs, textures) keyed by content;
/// the runtime only guarantees that identical content is requested with identical keys.
pub trait Renderer {
    /// Measure `text` set in `font`.
    ///
    /// With `max_width`, text wraps at word boundaries to fit. `max_lines` of `0` means
    /// unlimited.
    fn measure_text(
        &mut self,
        text: &str,
        font: &FontSpec,
        max_width: Option<f64>,
        max_lines: usize,
    ) -> Size;

    /// Draw a primitive into `frame`.
    fn draw(&mut self, primitive: &Primitive<'_>, frame: Rect, style: &ResolvedStyle);

    /// Draw the texture cached under `key`, loading it on first use.
    fn draw_texture(&mut self, key: &str, frame: Rect, alpha: f64);

    /// Restrict drawing to `rect` until the matching [`pop_clip`](Self::pop_clip).
    fn push_clip(&mut self, rect: Rect);

    /// Undo the last [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);

    /// Start a frame by filling the window.
    fn clear(&mut self, color: Color);

    /// Finish a frame.
    fn present(&mut self);

    /// The window's drawable area changed.
    fn resize(&mut self, size: Size) {
        let _ = size;
    }
}

/// A named, possibly nine-slice, asset.
pub trait Drawable {
    /// Size at scale 1.
    fn natural_size(&self) -> Size;

    /// Draw into `frame`.
    fn render(&self, renderer: &mut dyn Renderer, frame: Rect, alpha: f64, scale: f64);
}

/// Source of assets and per-type style defaults.
pub trait AssetLoader {
    /// Look up a drawable. `None` means the asset is missing and nothing is drawn.
    fn load_asset(&self, name: &str) -> Option<Rc<dyn Drawable>>;

    /// Style defaults for nodes of the given short type name.
    fn style_for(&self, type_name: &str) -> Style;

    /// Colour the window is cleared with.
    fn window_background(&self) -> Color {
        Color::BLACK
    }

    /// Colour of the focus ring.
    fn focus_color(&self) -> Color {
        DEFAULT_FOCUS_COLOR
    }
}

const DEFAULT_FOCUS_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);

/// Errors raised while loading a [`Theme`].
#[derive(Debug)]
pub enum ThemeError {
    /// The configuration is not valid JSON or does not match the expected layout.
    Parse(serde_json::Error),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(_) => f.write_str("invalid theme configuration"),
        }
    }
}

impl Error for ThemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum InsetsConfig {
    Uniform(f64),
    /// Left, top, right, bottom.
    Edges([f64; 4]),
}

impl From<InsetsConfig> for Insets {
    fn from(config: InsetsConfig) -> Self {
        match config {
            InsetsConfig::Uniform(value) => Self::uniform(value),
            InsetsConfig::Edges([x0, y0, x1, y1]) => Self::new(x0, y0, x1, y1),
        }
    }
}

fn rgba(color: [u8; 4]) -> Color {
    let [r, g, b, a] = color;
    Color::from_rgba8(r, g, b, a)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleConfig {
    padding: Option<InsetsConfig>,
    border: Option<InsetsConfig>,
    spacing: Option<f64>,
    priority: Option<Priority>,
    alignment: Option<Alignment>,
    color: Option<[u8; 4]>,
    background: Option<[u8; 4]>,
    radius: Option<f64>,
    font: Option<String>,
    font_size: Option<f64>,
    lines: Option<usize>,
    opacity: Option<f64>,
    text_shadow: Option<[u8; 4]>,
}

impl From<StyleConfig> for Style {
    fn from(config: StyleConfig) -> Self {
        Self {
            padding: config.padding.map(Into::into),
            border: config.border.map(Into::into),
            spacing: config.spacing,
            priority: config.priority,
            alignment: config.alignment,
            color: config.color.map(rgba),
            background: config.background.map(rgba),
            radius: config.radius,
            font: config.font.map(Into::into),
            font_size: config.font_size,
            lines: config.lines,
            opacity: config.opacity,
            text_shadow: config.text_shadow.map(rgba),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeConfig {
    background: Option<[u8; 4]>,
    focus: Option<[u8; 4]>,
    styles: std::collections::BTreeMap<String, StyleConfig>,
}

/// A JSON-configured [`AssetLoader`].
///
/// ```json
/// {
///     "background": [32, 32, 32, 255],
///     "styles": {
///         "Button": { "padding": [20, 5, 20, 6], "color": [255, 255, 255, 255] },
///         "Stack": { "spacing": 8 }
///     }
/// }
/// ```
///
/// Insets are either one number or `[left, top, right, bottom]`; colours are RGBA bytes.
/// Drawables are registered from code with [`Theme::register_asset`].
#[derive(Default)]
pub struct Theme {
    background: Option<Color>,
    focus: Option<Color>,
    styles: HashMap<String, Style>,
    assets: HashMap<String, Rc<dyn Drawable>>,
}

impl Theme {
    /// An empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a theme configuration.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let config: ThemeConfig = serde_json::from_str(json)?;
        Ok(Self {
            background: config.background.map(rgba),
            focus: config.focus.map(rgba),
            styles: config
                .styles
                .into_iter()
                .map(|(name, style)| (name, style.into()))
                .collect(),
            assets: HashMap::new(),
        })
    }

    /// Builder-style method to register a drawable under `name`.
    pub fn with_asset(mut self, name: impl Into<String>, drawable: impl Drawable + 'static) -> Self {
        self.register_asset(name, drawable);
        self
    }

    /// Register a drawable under `name`, replacing any previous one.
    pub fn register_asset(&mut self, name: impl Into<String>, drawable: impl Drawable + 'static) {
        self.assets.insert(name.into(), Rc::new(drawable));
    }

    /// Set the style defaults for a node type.
    pub fn set_style(&mut self, type_name: impl Into<String>, style: Style) {
        self.styles.insert(type_name.into(), style);
    }
}

impl AssetLoader for Theme {
    fn load_asset(&self, name: &str) -> Option<Rc<dyn Drawable>> {
        let asset = self.assets.get(name).cloned();
        if asset.is_none() {
            warn!("missing asset `{name}`");
        }
        asset
    }

    fn style_for(&self, type_name: &str) -> Style {
        self.styles.get(type_name).cloned().unwrap_or_default()
    }

    fn window_background(&self) -> Color {
        self.background.unwrap_or(Color::BLACK)
    }

    fn focus_color(&self) -> Color {
        self.focus.unwrap_or(DEFAULT_FOCUS_COLOR)
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("styles", &self.styles.keys().collect::<Vec<_>>())
            .field("assets", &self.assets.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
