//! Layout cursor: the running (x, y, page) position while content is placed.
//!
//! Every drawing helper takes `&mut LayoutContext`; nothing about the cursor
//! lives outside it, so a render is reentrant and can be inspected in tests.

use crate::report::document::{DrawOp, Element, Mark, Page, PageGeometry, Rgb};
use crate::report::font_metrics::{get_metrics, FontFace};

pub struct LayoutContext {
    geometry: PageGeometry,
    pub x: f32,
    pub y: f32,
    pages: Vec<Page>,
}

impl LayoutContext {
    /// Starts with one empty page and the cursor at the top-left margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            x: geometry.margin_x,
            y: geometry.margin_top,
            pages: vec![Page::default()],
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Vertical space left above the bottom margin on the current page.
    pub fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.y
    }

    /// Starts a new page when fewer than `height` points remain.
    ///
    /// Returns `true` when a page break happened. A block taller than a whole
    /// page is placed at the top of a fresh page and allowed to overflow.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        let at_top = (self.y - self.geometry.margin_top).abs() < f32::EPSILON;
        if height > self.remaining() && !at_top {
            self.new_page();
            return true;
        }
        false
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.x = self.geometry.margin_x;
        self.y = self.geometry.margin_top;
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn current(&mut self) -> &mut Page {
        let idx = self.pages.len() - 1;
        &mut self.pages[idx]
    }

    pub fn push(&mut self, op: DrawOp) {
        self.current().ops.push(op);
    }

    pub fn mark(&mut self, element: Element, y: f32, height: f32) {
        self.current().marks.push(Mark { element, y, height });
    }

    // ── primitives ──────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Rgb) {
        self.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            radius: 0.0,
            fill: Some(fill),
            stroke: None,
        });
    }

    pub fn rounded_rect(
        &mut self,
        (x, y, w, h): (f32, f32, f32, f32),
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) {
        self.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            radius,
            fill,
            stroke,
        });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Rgb) {
        self.push(DrawOp::Circle { cx, cy, r, fill });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    /// Left-aligned text with its baseline at `y`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            size: style.size,
            face: style.face,
            color: style.color,
        });
    }

    pub fn text_right(&mut self, right: f32, y: f32, text: &str, style: TextStyle) {
        let w = measure(text, style);
        self.text(right - w, y, text, style);
    }

    pub fn text_centered(&mut self, center: f32, y: f32, text: &str, style: TextStyle) {
        let w = measure(text, style);
        self.text(center - w / 2.0, y, text, style);
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(size: f32, face: FontFace, color: Rgb) -> Self {
        Self { size, face, color }
    }

    /// Baseline-to-baseline distance for this size.
    pub fn line_height(&self) -> f32 {
        self.size * 1.4
    }
}

pub fn measure(text: &str, style: TextStyle) -> f32 {
    get_metrics(style.face).measure_str(text, style.size)
}

pub fn wrap(text: &str, width: f32, style: TextStyle) -> Vec<String> {
    get_metrics(style.face).wrap(text, width, style.size)
}
