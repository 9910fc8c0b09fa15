//! In-memory document model produced by the layout pass.
//!
//! Coordinates are points with a top-left origin and `y` growing downwards;
//! the PDF writer flips them. Text positions are baselines.

use serde::Serialize;

use crate::report::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Report palette.
pub mod palette {
    use super::Rgb;

    pub const PRIMARY: Rgb = Rgb(37, 99, 235);
    pub const SUCCESS: Rgb = Rgb(22, 163, 74);
    pub const SECONDARY: Rgb = Rgb(14, 165, 233);
    pub const WARNING: Rgb = Rgb(234, 179, 8);
    pub const DANGER: Rgb = Rgb(220, 38, 38);
    pub const ORANGE: Rgb = Rgb(234, 88, 12);
    pub const TEXT: Rgb = Rgb(31, 41, 55);
    pub const MUTED: Rgb = Rgb(107, 114, 128);
    pub const BORDER: Rgb = Rgb(209, 213, 219);
    pub const LIGHT: Rgb = Rgb(243, 244, 246);
    pub const PRIMARY_LIGHT: Rgb = Rgb(219, 234, 254);
    pub const DANGER_LIGHT: Rgb = Rgb(254, 226, 226);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_top: f32,
    /// Reserved below the content area; the footer lives inside it.
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// A4 portrait with the footer band reserved at the bottom.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_x: 40.0,
            margin_top: 40.0,
            margin_bottom: 60.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_x
    }

    /// Lowest `y` content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        face: FontFace,
        color: Rgb,
    },
}

/// Structural element recorded alongside the drawing operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    HeaderBand,
    TitleBlock,
    IdentityPanel,
    ScorePanel { label: String, color: Rgb },
    ExpiringAlert { offers: usize },
    SectionTitle(String),
    ParagraphLine,
    ComparativeHeader,
    ComparativeRow { index: usize },
    SkillBadge { index: usize },
    TableHeader,
    JobMatchRow { index: usize, compatibility_color: Rgb },
    RecommendationItem { index: usize },
    EmptyNotice,
    ConclusionPanel { truncated: bool },
    Footer { page: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub element: Element,
    /// Top of the element on its page.
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All marks in page order.
    #[cfg(test)]
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.pages.iter().flat_map(|p| p.marks.iter())
    }

    /// All text runs in page order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| {
            p.ops.iter().filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
        })
    }
}
