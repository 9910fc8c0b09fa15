//! Paginating table primitive.
//!
//! The table owns pagination while it draws: rows never split across pages and
//! the header row is repeated on every continuation page. It returns the `y`
//! just below its last row so the caller can re-synchronise its cursor.

use crate::report::document::{palette, Element, Rgb};
use crate::report::font_metrics::{get_metrics, FontFace};
use crate::report::layout::{measure, wrap, LayoutContext, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub title: String,
    /// Share of the content width; shares are normalised when drawn.
    pub share: f32,
    pub align: Align,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub fill: Option<Rgb>,
    pub color: Rgb,
    pub face: FontFace,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fill: None,
            color: palette::TEXT,
            face: FontFace::Regular,
        }
    }

    pub fn highlighted(text: impl Into<String>, fill: Rgb) -> Self {
        Self {
            text: text.into(),
            fill: Some(fill),
            color: palette::WHITE,
            face: FontFace::Bold,
        }
    }

    pub fn colored(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            fill: None,
            color,
            face: FontFace::Bold,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub cells: Vec<Cell>,
    pub element: Element,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct TableStyle {
    pub font_size: f32,
    pub padding: f32,
    pub header_fill: Rgb,
    pub stripe_fill: Rgb,
    pub border: Rgb,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            padding: 5.0,
            header_fill: palette::PRIMARY,
            stripe_fill: palette::LIGHT,
            border: palette::BORDER,
        }
    }
}

/// Height of the header plus the first row: the least a table needs on the
/// page it starts on.
pub fn lead_height(table: &Table, style: &TableStyle, width: f32) -> f32 {
    let widths = column_widths(&table.columns, width);
    let first_row_h = table
        .rows
        .first()
        .map(|row| row_height(row, &widths, style))
        .unwrap_or(0.0);
    header_height(style) + first_row_h
}

/// Draws `table` starting at the context cursor and returns the `y` below
/// its last row.
pub fn draw_table(ctx: &mut LayoutContext, table: &Table, style: &TableStyle) -> f32 {
    let geometry = *ctx.geometry();
    let widths = column_widths(&table.columns, geometry.content_width());
    let line_h = TextStyle::new(style.font_size, FontFace::Bold, palette::WHITE).line_height();
    let header_h = header_height(style);

    ctx.ensure_space(lead_height(table, style, geometry.content_width()));

    let mut y = ctx.y;
    draw_header(ctx, table, &widths, style, y);
    y += header_h;

    // A row taller than a whole page still goes under the header it starts
    // with instead of leaving that header alone on its page.
    let mut rows_on_page = 0;
    for (i, row) in table.rows.iter().enumerate() {
        let h = row_height(row, &widths, style);
        if rows_on_page > 0 && y + h > geometry.content_bottom() {
            ctx.new_page();
            y = ctx.y;
            draw_header(ctx, table, &widths, style, y);
            y += header_h;
            rows_on_page = 0;
        }

        if i % 2 == 1 {
            ctx.fill_rect(geometry.margin_x, y, geometry.content_width(), h, style.stripe_fill);
        }

        let mut x = geometry.margin_x;
        for ((cell, column), &w) in row.cells.iter().zip(&table.columns).zip(&widths) {
            if let Some(fill) = cell.fill {
                ctx.fill_rect(x, y, w, h, fill);
            }
            let cell_style = TextStyle::new(style.font_size, cell.face, cell.color);
            let lines = wrap(&cell.text, w - 2.0 * style.padding, cell_style);
            let mut baseline = y + style.padding + style.font_size;
            for line in &lines {
                match column.align {
                    Align::Left => ctx.text(x + style.padding, baseline, line, cell_style),
                    Align::Center => ctx.text_centered(x + w / 2.0, baseline, line, cell_style),
                }
                baseline += line_h;
            }
            x += w;
        }

        ctx.line(
            geometry.margin_x,
            y + h,
            geometry.right_edge(),
            y + h,
            0.5,
            style.border,
        );
        ctx.mark(row.element.clone(), y, h);
        y += h;
        rows_on_page += 1;
    }

    y
}

fn header_height(style: &TableStyle) -> f32 {
    let line_h = TextStyle::new(style.font_size, FontFace::Bold, palette::WHITE).line_height();
    line_h + 2.0 * style.padding
}

fn draw_header(
    ctx: &mut LayoutContext,
    table: &Table,
    widths: &[f32],
    style: &TableStyle,
    y: f32,
) {
    let geometry = *ctx.geometry();
    let header_style = TextStyle::new(style.font_size, FontFace::Bold, palette::WHITE);
    let header_h = header_height(style);

    ctx.fill_rect(
        geometry.margin_x,
        y,
        geometry.content_width(),
        header_h,
        style.header_fill,
    );

    let baseline = y + style.padding + style.font_size;
    let mut x = geometry.margin_x;
    for (column, &w) in table.columns.iter().zip(widths) {
        let max_w = w - 2.0 * style.padding;
        let title = if measure(&column.title, header_style) > max_w {
            get_metrics(FontFace::Bold).truncate_to_width(
                &column.title,
                max_w,
                style.font_size,
            )
        } else {
            column.title.clone()
        };
        match column.align {
            Align::Left => ctx.text(x + style.padding, baseline, &title, header_style),
            Align::Center => ctx.text_centered(x + w / 2.0, baseline, &title, header_style),
        }
        x += w;
    }
    ctx.mark(Element::TableHeader, y, header_h);
}

fn column_widths(columns: &[Column], total: f32) -> Vec<f32> {
    let shares: f32 = columns.iter().map(|c| c.share).sum();
    if shares <= 0.0 {
        return vec![total / columns.len().max(1) as f32; columns.len()];
    }
    columns.iter().map(|c| total * c.share / shares).collect()
}

fn row_height(row: &TableRow, widths: &[f32], style: &TableStyle) -> f32 {
    let line_h = TextStyle::new(style.font_size, FontFace::Regular, palette::TEXT).line_height();
    let lines = row
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| {
            let cell_style = TextStyle::new(style.font_size, cell.face, cell.color);
            wrap(&cell.text, w - 2.0 * style.padding, cell_style).len().max(1)
        })
        .max()
        .unwrap_or(1);
    lines as f32 * line_h + 2.0 * style.padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{DrawOp, PageGeometry};

    fn table_with_rows(n: usize) -> Table {
        Table {
            columns: vec![
                Column {
                    title: "#".to_string(),
                    share: 1.0,
                    align: Align::Center,
                },
                Column {
                    title: "Puesto".to_string(),
                    share: 5.0,
                    align: Align::Left,
                },
            ],
            rows: (0..n)
                .map(|i| TableRow {
                    cells: vec![Cell::plain((i + 1).to_string()), Cell::plain("Backend")],
                    element: Element::JobMatchRow {
                        index: i,
                        compatibility_color: palette::SUCCESS,
                    },
                })
                .collect(),
        }
    }

    fn count_rows(ctx: LayoutContext) -> (usize, usize, usize) {
        let pages = ctx.into_pages();
        let rows = pages
            .iter()
            .flat_map(|p| &p.marks)
            .filter(|m| matches!(m.element, Element::JobMatchRow { .. }))
            .count();
        let headers = pages
            .iter()
            .flat_map(|p| &p.marks)
            .filter(|m| m.element == Element::TableHeader)
            .count();
        (rows, headers, pages.len())
    }

    #[test]
    fn test_column_widths_are_normalised() {
        let widths = column_widths(&table_with_rows(0).columns, 600.0);
        assert!((widths[0] - 100.0).abs() < 1e-3);
        assert!((widths[1] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_small_table_stays_on_one_page() {
        let mut ctx = LayoutContext::new(PageGeometry::a4());
        let end_y = draw_table(&mut ctx, &table_with_rows(3), &TableStyle::default());
        assert!(end_y > PageGeometry::a4().margin_top);
        assert_eq!(count_rows(ctx), (3, 1, 1));
    }

    #[test]
    fn test_long_table_spans_pages_and_repeats_header() {
        let mut ctx = LayoutContext::new(PageGeometry::a4());
        draw_table(&mut ctx, &table_with_rows(120), &TableStyle::default());
        let (rows, headers, pages) = count_rows(ctx);
        assert_eq!(rows, 120);
        assert!(pages > 1);
        assert_eq!(headers, pages);
    }

    #[test]
    fn test_rows_never_cross_bottom_margin() {
        let geometry = PageGeometry::a4();
        let mut ctx = LayoutContext::new(geometry);
        draw_table(&mut ctx, &table_with_rows(80), &TableStyle::default());
        for page in ctx.into_pages() {
            for mark in &page.marks {
                assert!(mark.y + mark.height <= geometry.content_bottom() + 1e-3);
            }
        }
    }

    #[test]
    fn test_odd_rows_are_striped() {
        let mut ctx = LayoutContext::new(PageGeometry::a4());
        draw_table(&mut ctx, &table_with_rows(2), &TableStyle::default());
        let pages = ctx.into_pages();
        let stripes = pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { fill: Some(c), .. } if *c == palette::LIGHT))
            .count();
        assert_eq!(stripes, 1);
    }

    #[test]
    fn test_lead_height_covers_header_and_first_row() {
        let style = TableStyle::default();
        let table = table_with_rows(4);
        let header_only = lead_height(&table_with_rows(0), &style, 500.0);
        let lead = lead_height(&table, &style, 500.0);
        assert!((header_only - header_height(&style)).abs() < 1e-3);
        assert!(lead > header_only);
    }

    #[test]
    fn test_oversized_first_row_shares_page_with_header() {
        let geometry = PageGeometry::a4();
        let mut table = table_with_rows(2);
        table.rows[0].cells[1] = Cell::plain("Descripción muy extensa del puesto. ".repeat(400));

        let mut ctx = LayoutContext::new(geometry);
        ctx.y = geometry.content_bottom() - 60.0;
        draw_table(&mut ctx, &table, &TableStyle::default());

        let pages = ctx.into_pages();
        for (n, page) in pages.iter().enumerate() {
            let headers = page
                .marks
                .iter()
                .filter(|m| m.element == Element::TableHeader)
                .count();
            let rows = page
                .marks
                .iter()
                .filter(|m| matches!(m.element, Element::JobMatchRow { .. }))
                .count();
            if headers > 0 {
                assert!(rows > 0, "page {n} holds a header with no rows");
            }
        }
        let total_rows = pages
            .iter()
            .flat_map(|p| &p.marks)
            .filter(|m| matches!(m.element, Element::JobMatchRow { .. }))
            .count();
        assert_eq!(total_rows, 2);
    }
}
