// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The style context of a node.
//!
//! A [`Style`] is the sparse set of attributes authored on a node descriptor through the
//! modifiers of [`StyleExt`]. During reconciliation it is resolved into a
//! [`ResolvedStyle`], where every attribute has a value:
//!
//! - Inherited attributes (colour, font, font size, text shadow, scale) fall back to the
//!   parent's resolved value, then to the type defaults.
//! - Every other attribute falls back to the type defaults (the theme's style for the node
//!   type, then the type's own [`default_style`](crate::core::Node::default_style)),
//!   then to a fixed global default. Never to the parent.
//!
//! Lengths are authored in logical units and multiplied by the resolved scale.

use std::rc::Rc;
use std::time::Duration;

use kurbo::{Insets, Size};
use peniko::Color;

use crate::anim::{AnimationSpec, Curve};
use crate::core::NewNode;
use crate::geometry::{Alignment, Priority, add_insets, scale_insets};

/// Default font size, in logical units.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default foreground colour.
pub const DEFAULT_COLOR: Color = Color::from_rgba8(230, 230, 230, 255);

/// Authored style attributes. `None` means "not set here".
#[derive(Clone, Debug, Default)]
pub struct Style {
    /// Space between the border and the content.
    pub padding: Option<Insets>,
    /// Border thickness.
    pub border: Option<Insets>,
    /// Space between children of stacks and grids.
    pub spacing: Option<f64>,
    /// Layout priority inside a stack.
    pub priority: Option<Priority>,
    /// Cross-axis alignment of children.
    pub alignment: Option<Alignment>,
    /// Explicit width override.
    pub width: Option<f64>,
    /// Explicit height override.
    pub height: Option<f64>,
    /// Opacity, clamped to `[0, 1]`.
    pub opacity: Option<f64>,
    /// Frame animation applied when a reused node moves or resizes.
    pub animation: Option<AnimationSpec>,
    /// Foreground colour. Inherited.
    pub color: Option<Color>,
    /// Background fill.
    pub background: Option<Color>,
    /// Corner radius of the background.
    pub radius: Option<f64>,
    /// Font family. Inherited.
    pub font: Option<Rc<str>>,
    /// Font size. Inherited.
    pub font_size: Option<f64>,
    /// Maximum number of text lines, `0` for unlimited.
    pub lines: Option<usize>,
    /// Text shadow colour. Inherited.
    pub text_shadow: Option<Color>,
    /// Scale factor applied to lengths. Inherited.
    pub scale: Option<f64>,
}

impl Style {
    /// Returns a style where every attribute unset in `self` is taken from `fallback`.
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            padding: self.padding.or(fallback.padding),
            border: self.border.or(fallback.border),
            spacing: self.spacing.or(fallback.spacing),
            priority: self.priority.or(fallback.priority),
            alignment: self.alignment.or(fallback.alignment),
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
            opacity: self.opacity.or(fallback.opacity),
            animation: self.animation.or(fallback.animation),
            color: self.color.or(fallback.color),
            background: self.background.or(fallback.background),
            radius: self.radius.or(fallback.radius),
            font: self.font.clone().or_else(|| fallback.font.clone()),
            font_size: self.font_size.or(fallback.font_size),
            lines: self.lines.or(fallback.lines),
            text_shadow: self.text_shadow.or(fallback.text_shadow),
            scale: self.scale.or(fallback.scale),
        }
    }

    /// Resolve against the parent's resolved style and the defaults of the node type.
    pub fn resolve(&self, parent: &ResolvedStyle, type_defaults: &Self) -> ResolvedStyle {
        let scale = self
            .scale
            .or(Some(parent.scale))
            .or(type_defaults.scale)
            .unwrap_or(1.0);
        let local = self.or(type_defaults);
        let inherited = |own: Option<Color>, from_parent: Option<Color>, default: Option<Color>| {
            own.or(from_parent).or(default)
        };
        ResolvedStyle {
            padding: scale_insets(local.padding.unwrap_or(Insets::ZERO), scale),
            border: scale_insets(local.border.unwrap_or(Insets::ZERO), scale),
            spacing: local.spacing.unwrap_or(0.) * scale,
            priority: local.priority.unwrap_or_default(),
            alignment: local.alignment.unwrap_or_default(),
            width: local.width.map(|w| w * scale),
            height: local.height.map(|h| h * scale),
            opacity: local.opacity.unwrap_or(1.0).clamp(0., 1.),
            animation: local.animation,
            color: inherited(self.color, Some(parent.color), type_defaults.color)
                .unwrap_or(DEFAULT_COLOR),
            background: local.background,
            radius: local.radius.unwrap_or(0.) * scale,
            font: FontSpec {
                family: self
                    .font
                    .clone()
                    .or_else(|| parent.font.family.clone())
                    .or_else(|| type_defaults.font.clone()),
                size: self
                    .font_size
                    .map(|size| size * scale)
                    .unwrap_or(parent.font.size),
            },
            lines: local.lines.unwrap_or(0),
            text_shadow: inherited(self.text_shadow, parent.text_shadow, type_defaults.text_shadow),
            scale,
        }
    }
}

/// Font selection passed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name, `None` for the backend default.
    pub family: Option<Rc<str>>,
    /// Size in backend pixels.
    pub size: f64,
}

/// A style where every attribute has a value, lengths already scaled.
#[derive(Clone, Debug)]
pub struct ResolvedStyle {
    /// Space between the border and the content.
    pub padding: Insets,
    /// Border thickness.
    pub border: Insets,
    /// Space between children of stacks and grids.
    pub spacing: f64,
    /// Layout priority inside a stack.
    pub priority: Priority,
    /// Cross-axis alignment of children.
    pub alignment: Alignment,
    /// Explicit width override.
    pub width: Option<f64>,
    /// Explicit height override.
    pub height: Option<f64>,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Frame animation.
    pub animation: Option<AnimationSpec>,
    /// Foreground colour.
    pub color: Color,
    /// Background fill.
    pub background: Option<Color>,
    /// Corner radius.
    pub radius: f64,
    /// Font.
    pub font: FontSpec,
    /// Maximum number of text lines, `0` for unlimited.
    pub lines: usize,
    /// Text shadow colour.
    pub text_shadow: Option<Color>,
    /// Scale factor.
    pub scale: f64,
}

impl ResolvedStyle {
    /// The style a root node inherits from.
    pub fn root(scale: f64) -> Self {
        Self {
            padding: Insets::ZERO,
            border: Insets::ZERO,
            spacing: 0.,
            priority: Priority::Normal,
            alignment: Alignment::Center,
            width: None,
            height: None,
            opacity: 1.0,
            animation: None,
            color: DEFAULT_COLOR,
            background: None,
            radius: 0.,
            font: FontSpec {
                family: None,
                size: DEFAULT_FONT_SIZE * scale,
            },
            lines: 0,
            text_shadow: None,
            scale,
        }
    }

    /// Padding plus border.
    pub fn insets(&self) -> Insets {
        add_insets(self.padding, self.border)
    }

    /// Clamp an offered size to the explicit size override.
    pub fn constrain(&self, available: Size) -> Size {
        Size::new(
            self.width.map_or(available.width, |w| w.min(available.width)),
            self.height
                .map_or(available.height, |h| h.min(available.height)),
        )
    }

    /// Scale a logical length.
    pub fn scaled(&self, length: f64) -> f64 {
        length * self.scale
    }
}

/// Chainable style modifiers, available on every node descriptor.
///
/// Each modifier sets one authored attribute and returns the descriptor. Setting an
/// attribute twice keeps the last value.
pub trait StyleExt: Into<NewNode> {
    /// Space between the border and the content.
    fn padding(self, padding: impl Into<Insets>) -> NewNode {
        with_style(self, |style| style.padding = Some(padding.into()))
    }

    /// Border thickness.
    fn border(self, border: impl Into<Insets>) -> NewNode {
        with_style(self, |style| style.border = Some(border.into()))
    }

    /// Space between children.
    fn spacing(self, spacing: f64) -> NewNode {
        with_style(self, |style| style.spacing = Some(spacing))
    }

    /// Layout priority inside a stack.
    fn priority(self, priority: Priority) -> NewNode {
        with_style(self, |style| style.priority = Some(priority))
    }

    /// Cross-axis alignment of children.
    fn alignment(self, alignment: Alignment) -> NewNode {
        with_style(self, |style| style.alignment = Some(alignment))
    }

    /// Explicit size override. `None` leaves a dimension unconstrained.
    fn size(self, width: impl Into<Option<f64>>, height: impl Into<Option<f64>>) -> NewNode {
        let (width, height) = (width.into(), height.into());
        with_style(self, |style| {
            style.width = width.or(style.width);
            style.height = height.or(style.height);
        })
    }

    /// Opacity, clamped to `[0, 1]`.
    fn opacity(self, opacity: f64) -> NewNode {
        with_style(self, |style| style.opacity = Some(opacity.clamp(0., 1.)))
    }

    /// Animate frame changes with the given curve, duration and delay.
    fn animate(self, curve: Curve, duration: Duration, delay: Duration) -> NewNode {
        with_style(self, |style| {
            style.animation = Some(AnimationSpec::new(curve, duration).with_delay(delay));
        })
    }

    /// Animate frame changes with the default parametric curve.
    fn animate_default(self) -> NewNode {
        with_style(self, |style| style.animation = Some(AnimationSpec::default()))
    }

    /// Foreground colour.
    fn color(self, color: Color) -> NewNode {
        with_style(self, |style| style.color = Some(color))
    }

    /// Background fill.
    fn background(self, color: Color) -> NewNode {
        with_style(self, |style| style.background = Some(color))
    }

    /// Corner radius of the background.
    fn radius(self, radius: f64) -> NewNode {
        with_style(self, |style| style.radius = Some(radius))
    }

    /// Font family.
    fn font(self, family: impl Into<Rc<str>>) -> NewNode {
        with_style(self, |style| style.font = Some(family.into()))
    }

    /// Font size.
    fn font_size(self, size: f64) -> NewNode {
        with_style(self, |style| style.font_size = Some(size))
    }

    /// Maximum number of text lines, `0` for unlimited.
    fn lines(self, lines: usize) -> NewNode {
        with_style(self, |style| style.lines = Some(lines))
    }

    /// Text shadow colour.
    fn text_shadow(self, color: Color) -> NewNode {
        with_style(self, |style| style.text_shadow = Some(color))
    }

    /// Scale factor applied to lengths of this node and its descendants.
    fn scale(self, scale: f64) -> NewNode {
        with_style(self, |style| style.scale = Some(scale))
    }
}

impl<T: Into<NewNode>> StyleExt for T {}

fn with_style(node: impl Into<NewNode>, f: impl FnOnce(&mut Style)) -> NewNode {
    let mut node = node.into();
    f(&mut node.style);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_attributes_fall_back_to_parent() {
        let parent = Style {
            font_size: Some(24.),
            color: Some(Color::from_rgba8(1, 2, 3, 255)),
            spacing: Some(40.),
            ..Default::default()
        }
        .resolve(&ResolvedStyle::root(1.0), &Style::default());
        let child = Style::default().resolve(&parent, &Style::default());
        assert_eq!(child.font.size, 24.);
        assert_eq!(
            child.color.to_rgba8().to_u8_array(),
            [1, 2, 3, 255],
            "colour is inherited"
        );
        assert_eq!(child.spacing, 0., "spacing is not inherited");
    }

    #[test]
    fn type_defaults_sit_between_local_and_global() {
        let type_defaults = Style {
            spacing: Some(10.),
            padding: Some(Insets::uniform(2.)),
            ..Default::default()
        };
        let resolved = Style {
            spacing: Some(3.),
            ..Default::default()
        }
        .resolve(&ResolvedStyle::root(1.0), &type_defaults);
        assert_eq!(resolved.spacing, 3.);
        assert_eq!(resolved.padding, Insets::uniform(2.));
        assert_eq!(resolved.priority, Priority::Normal);
    }

    #[test]
    fn lengths_are_scaled() {
        let resolved = Style {
            padding: Some(Insets::uniform(5.)),
            width: Some(10.),
            ..Default::default()
        }
        .resolve(&ResolvedStyle::root(2.0), &Style::default());
        assert_eq!(resolved.scale, 2.0);
        assert_eq!(resolved.padding, Insets::uniform(10.));
        assert_eq!(resolved.width, Some(20.));
        assert_eq!(resolved.font.size, 32.);
    }

    #[test]
    fn modifiers_are_idempotent_setters() {
        let node = crate::nodes::Text::new("x")
            .padding(4.)
            .spacing(2.)
            .padding(6.)
            .size(20., None)
            .size(None, 30.);
        let style = node.style();
        assert_eq!(style.padding, Some(Insets::uniform(6.)));
        assert_eq!(style.spacing, Some(2.));
        assert_eq!((style.width, style.height), (Some(20.), Some(30.)));
    }

    #[test]
    fn constrain_caps_at_budget() {
        let resolved = Style {
            width: Some(50.),
            ..Default::default()
        }
        .resolve(&ResolvedStyle::root(1.0), &Style::default());
        assert_eq!(
            resolved.constrain(Size::new(30., 80.)),
            Size::new(30., 80.)
        );
        assert_eq!(
            resolved.constrain(Size::new(100., 80.)),
            Size::new(50., 80.)
        );
    }
}
