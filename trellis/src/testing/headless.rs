// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::backend::{Drawable, Primitive, Renderer};
use crate::style::{DEFAULT_FONT_SIZE, FontSpec, ResolvedStyle};

/// Horizontal advance of every glyph at the default font size.
pub const GLYPH_ADVANCE: f64 = 10.;

/// Height of a line of text at the default font size.
pub const LINE_HEIGHT: f64 = 16.;

/// One call made to a [`HeadlessRenderer`].
///
/// Colours are recorded as RGBA bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The frame was started.
    Clear([u8; 4]),
    /// A filled rectangle.
    Fill {
        /// Target rectangle.
        frame: Rect,
        /// Fill colour.
        color: [u8; 4],
        /// Opacity of the drawing node.
        opacity: f64,
    },
    /// A run of text.
    Text {
        /// Target rectangle.
        frame: Rect,
        /// The text.
        text: String,
    },
    /// A focus ring.
    FocusRing(Rect),
    /// A line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// A cached texture.
    Texture {
        /// Cache key.
        key: String,
        /// Target rectangle.
        frame: Rect,
        /// Opacity.
        alpha: f64,
    },
    /// A clip was pushed.
    PushClip(Rect),
    /// A clip was popped.
    PopClip,
    /// The frame was finished.
    Present,
}

fn rgba(color: Color) -> [u8; 4] {
    color.to_rgba8().to_u8_array()
}

/// A shared handle to the commands of the last frame drawn by a [`HeadlessRenderer`].
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Rc<RefCell<Vec<DrawCommand>>>);

impl DrawLog {
    /// A copy of the recorded commands.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.0.borrow().clone()
    }

    /// The text runs of the last frame, in drawing order.
    pub fn texts(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether the last frame drew the texture `key`.
    pub fn drew_texture(&self, key: &str) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|command| matches!(command, DrawCommand::Texture { key: drawn, .. } if drawn == key))
    }

    fn push(&self, command: DrawCommand) {
        self.0.borrow_mut().push(command);
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A [`Renderer`] that rasterizes nothing.
///
/// Text is measured as fixed-advance glyphs: 10 px per character and 16 px per line at
/// font size 16, proportionally at other sizes. Wrapping breaks at spaces; a word wider
/// than the offered width gets a line of its own. Draw calls of the last frame are kept
/// in a [`DrawLog`].
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    log: DrawLog,
    clip_depth: usize,
    size: Size,
}

impl HeadlessRenderer {
    /// Create a renderer with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the draw log, usable after the renderer moved into a root.
    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }

    /// Width and line height of one glyph for `font`.
    pub fn glyph_metrics(font: &FontSpec) -> (f64, f64) {
        let ratio = font.size / DEFAULT_FONT_SIZE;
        (GLYPH_ADVANCE * ratio, LINE_HEIGHT * ratio)
    }

    /// Break `text` into lines no wider than `max_width`, at spaces.
    pub fn wrap(text: &str, advance: f64, max_width: Option<f64>) -> Vec<usize> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let Some(max_width) = max_width else {
                lines.push(paragraph.chars().count());
                continue;
            };
            let mut current = 0_usize;
            for word in paragraph.split(' ') {
                let len = word.chars().count();
                if current == 0 {
                    current = len;
                } else if (current + 1 + len) as f64 * advance <= max_width {
                    current += 1 + len;
                } else {
                    lines.push(current);
                    current = len;
                }
            }
            lines.push(current);
        }
        lines
    }
}

impl Renderer for HeadlessRenderer {
    fn measure_text(
        &mut self,
        text: &str,
        font: &FontSpec,
        max_width: Option<f64>,
        max_lines: usize,
    ) -> Size {
        let (advance, line_height) = Self::glyph_metrics(font);
        let mut lines = Self::wrap(text, advance, max_width);
        if max_lines > 0 {
            lines.truncate(max_lines);
        }
        let longest = lines.iter().copied().max().unwrap_or(0);
        Size::new(longest as f64 * advance, lines.len() as f64 * line_height)
    }

    fn draw(&mut self, primitive: &Primitive<'_>, frame: Rect, style: &ResolvedStyle) {
        let command = match primitive {
            Primitive::Fill(color) => DrawCommand::Fill {
                frame,
                color: rgba(*color),
                opacity: style.opacity,
            },
            Primitive::Text(text) => DrawCommand::Text {
                frame,
                text: (*text).to_string(),
            },
            Primitive::FocusRing(_) => DrawCommand::FocusRing(frame),
            Primitive::Line { from, to, .. } => DrawCommand::Line {
                from: *from,
                to: *to,
            },
        };
        self.log.push(command);
    }

    fn draw_texture(&mut self, key: &str, frame: Rect, alpha: f64) {
        self.log.push(DrawCommand::Texture {
            key: key.to_string(),
            frame,
            alpha,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.log.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            debug_panic!("pop_clip without matching push_clip");
            return;
        }
        self.clip_depth -= 1;
        self.log.push(DrawCommand::PopClip);
    }

    fn clear(&mut self, color: Color) {
        self.log.clear();
        self.log.push(DrawCommand::Clear(rgba(color)));
    }

    fn present(&mut self) {
        debug_assert_eq!(self.clip_depth, 0, "unbalanced clips at the end of a frame");
        self.log.push(DrawCommand::Present);
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }
}

/// A [`Drawable`] that draws a texture named after it, at a fixed natural size.
#[derive(Debug, Clone)]
pub struct TextureDrawable {
    key: String,
    size: Size,
}

impl TextureDrawable {
    /// A drawable drawing the texture `key`.
    pub fn new(key: impl Into<String>, size: impl Into<Size>) -> Self {
        Self {
            key: key.into(),
            size: size.into(),
        }
    }
}

impl Drawable for TextureDrawable {
    fn natural_size(&self) -> Size {
        self.size
    }

    fn render(&self, renderer: &mut dyn Renderer, frame: Rect, alpha: f64, _scale: f64) {
        renderer.draw_texture(&self.key, frame, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f64) -> FontSpec {
        FontSpec { family: None, size }
    }

    #[test]
    fn glyphs_have_fixed_advance() {
        let mut renderer = HeadlessRenderer::new();
        assert_eq!(
            renderer.measure_text("hello", &font(16.), None, 0),
            Size::new(50., 16.)
        );
        assert_eq!(
            renderer.measure_text("hi", &font(32.), None, 0),
            Size::new(40., 32.)
        );
    }

    #[test]
    fn wraps_at_spaces() {
        let mut renderer = HeadlessRenderer::new();
        // "aaa bbb" is 70 px wide; 50 px only fits one word per line.
        assert_eq!(
            renderer.measure_text("aaa bbb", &font(16.), Some(50.), 0),
            Size::new(30., 32.)
        );
        assert_eq!(
            renderer.measure_text("aaa bbb", &font(16.), Some(50.), 1),
            Size::new(30., 16.)
        );
        // A word that doesn't fit keeps its own line.
        assert_eq!(
            renderer.measure_text("abcdefgh", &font(16.), Some(50.), 0),
            Size::new(80., 16.)
        );
    }

    #[test]
    fn log_keeps_the_last_frame() {
        let mut renderer = HeadlessRenderer::new();
        let log = renderer.log();
        renderer.clear(Color::BLACK);
        renderer.draw_texture("a", Rect::ZERO, 1.0);
        renderer.present();
        renderer.clear(Color::BLACK);
        renderer.present();
        assert_eq!(log.commands().len(), 2);
        assert!(!log.drew_texture("a"));
    }
}
