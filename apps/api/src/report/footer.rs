//! Second pass: stamps the footer on every page once the total is known.

use crate::report::document::{palette, DrawOp, Element, Mark, Page, PageGeometry};
use crate::report::font_metrics::{get_metrics, FontFace};
use crate::report::layout::{measure, TextStyle};
use crate::report::locale::Labels;

const FOOTER_STYLE: TextStyle = TextStyle::new(8.0, FontFace::Regular, palette::MUTED);
/// Distance from the page bottom to the separator line.
const SEPARATOR_OFFSET: f32 = 40.0;
const BASELINE_OFFSET: f32 = 24.0;

pub fn stamp_footers(
    pages: &mut [Page],
    geometry: &PageGeometry,
    organization: &str,
    labels: &Labels,
) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        stamp(page, geometry, organization, labels, i + 1, total);
    }
}

fn stamp(
    page: &mut Page,
    geometry: &PageGeometry,
    organization: &str,
    labels: &Labels,
    number: usize,
    total: usize,
) {
    let separator_y = geometry.height - SEPARATOR_OFFSET;
    let baseline = geometry.height - BASELINE_OFFSET;

    page.ops.push(DrawOp::Line {
        x1: geometry.margin_x,
        y1: separator_y,
        x2: geometry.right_edge(),
        y2: separator_y,
        width: 0.5,
        color: palette::BORDER,
    });

    let counter = labels.page_counter(number, total);
    let counter_w = measure(&counter, FOOTER_STYLE);
    let side_w = (geometry.content_width() - counter_w) / 2.0 - 8.0;
    let metrics = get_metrics(FOOTER_STYLE.face);

    let org = metrics.truncate_to_width(organization, side_w, FOOTER_STYLE.size);
    push_text(page, geometry.margin_x, baseline, org);

    push_text(
        page,
        geometry.width / 2.0 - counter_w / 2.0,
        baseline,
        counter,
    );

    let notice = metrics.truncate_to_width(labels.confidential, side_w, FOOTER_STYLE.size);
    let notice_w = measure(&notice, FOOTER_STYLE);
    push_text(page, geometry.right_edge() - notice_w, baseline, notice);

    page.marks.push(Mark {
        element: Element::Footer {
            page: number,
            total,
        },
        y: separator_y,
        height: SEPARATOR_OFFSET,
    });
}

fn push_text(page: &mut Page, x: f32, y: f32, text: String) {
    if text.is_empty() {
        return;
    }
    page.ops.push(DrawOp::Text {
        x,
        y,
        text,
        size: FOOTER_STYLE.size,
        face: FOOTER_STYLE.face,
        color: FOOTER_STYLE.color,
    });
}
