//! Content pass: places every report block on the page list.
//!
//! Each block estimates its height and calls `ensure_space` before drawing,
//! so page breaks only happen between blocks (or between lines/rows/items of a
//! block), never inside a primitive.

use chrono::NaiveDate;

use crate::models::analysis::{AnalysisResult, ExpiringOffer};
use crate::report::document::{palette, Element, Page, PageGeometry};
use crate::report::font_metrics::{get_metrics, FontFace};
use crate::report::layout::{measure, wrap, LayoutContext, TextStyle};
use crate::report::locale::Labels;
use crate::report::table::{
    draw_table, lead_height, Align, Cell, Column, Table, TableRow, TableStyle,
};
use crate::report::tier::{recommendation_color, score_to_tier, urgency_color, Tier};

const HEADER_BAND_H: f32 = 56.0;
const SECTION_GAP: f32 = 14.0;
const PANEL_H: f32 = 78.0;
const SCORE_PANEL_W: f32 = 140.0;
const PANEL_GAP: f32 = 12.0;
const ALERT_HEADER_H: f32 = 26.0;
const ALERT_LINE_H: f32 = 15.0;
const ALERT_PADDING: f32 = 8.0;
const SECTION_TITLE_H: f32 = 26.0;
const CHIP_H: f32 = 22.0;
const PILL_H: f32 = 20.0;
const PILL_PADDING: f32 = 9.0;
const PILL_GUTTER: f32 = 6.0;
const NUMBER_BADGE_R: f32 = 9.0;
const NUMBERED_TEXT_INDENT: f32 = 28.0;
const NUMBERED_MIN_ROW_H: f32 = 22.0;
const CONCLUSION_H: f32 = 84.0;
const CONCLUSION_MAX_LINES: usize = 3;

const BODY: TextStyle = TextStyle::new(10.0, FontFace::Regular, palette::TEXT);
const MUTED: TextStyle = TextStyle::new(9.0, FontFace::Regular, palette::MUTED);

/// Everything the content pass reads. Borrowed, never mutated.
pub struct ReportInput<'a> {
    pub candidate_id: &'a str,
    pub candidate_name: &'a str,
    pub result: &'a AnalysisResult,
    pub organization: &'a str,
    pub labels: &'static Labels,
    pub date: NaiveDate,
}

/// Integer percentage with a literal `%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

pub fn format_score(value: f64) -> String {
    format!("{}/100", value.round() as i64)
}

/// Tier of the value as printed, so a colour always agrees with its number.
fn display_tier(value: f64) -> Tier {
    score_to_tier(value.round())
}

/// Lays out all report content. Footers are stamped afterwards, once the
/// page count is known.
pub fn layout_content(input: &ReportInput<'_>, geometry: PageGeometry) -> Vec<Page> {
    let mut ctx = LayoutContext::new(geometry);
    let labels = input.labels;
    let result = input.result;

    draw_header_band(&mut ctx, input);
    draw_title_block(&mut ctx, labels);
    draw_identity_and_score(&mut ctx, input);
    draw_expiring_alert(&mut ctx, result.expiring_offers(), labels);

    draw_paragraph(&mut ctx, labels.executive_summary, &result.executive_summary, labels);
    draw_comparative_lists(&mut ctx, &result.strengths, &result.improvement_areas, labels);
    draw_skill_badges(&mut ctx, labels.highlighted_skills, &result.highlighted_skills, labels);
    draw_job_matches(&mut ctx, labels.job_matches, result, labels);
    draw_numbered_list(
        &mut ctx,
        labels.development_recommendations,
        &result.development_recommendations,
        labels,
    );
    draw_paragraph(&mut ctx, labels.final_recommendation, &result.final_recommendation, labels);

    draw_conclusion(&mut ctx, input);

    ctx.into_pages()
}

// ────────────────────────────────────────────────────────────────────────────
// Header, title, identity
// ────────────────────────────────────────────────────────────────────────────

fn draw_header_band(ctx: &mut LayoutContext, input: &ReportInput<'_>) {
    let geometry = *ctx.geometry();
    ctx.fill_rect(0.0, 0.0, geometry.width, HEADER_BAND_H, palette::PRIMARY);

    let org_style = TextStyle::new(14.0, FontFace::Bold, palette::WHITE);
    let date_style = TextStyle::new(10.0, FontFace::Regular, palette::WHITE);
    let date = input.labels.long_date(input.date);
    let org_max_w = geometry.content_width() - measure(&date, date_style) - 20.0;
    let org = get_metrics(FontFace::Bold).truncate_to_width(input.organization, org_max_w, 14.0);

    ctx.text(geometry.margin_x, 34.0, &org, org_style);
    ctx.text_right(geometry.right_edge(), 34.0, &date, date_style);
    ctx.mark(Element::HeaderBand, 0.0, HEADER_BAND_H);

    ctx.y = HEADER_BAND_H + 24.0;
}

fn draw_title_block(ctx: &mut LayoutContext, labels: &Labels) {
    let x = ctx.geometry().margin_x;
    let top = ctx.y;
    ctx.text(
        x,
        top + 18.0,
        labels.report_title,
        TextStyle::new(18.0, FontFace::Bold, palette::TEXT),
    );
    ctx.text(
        x,
        top + 36.0,
        labels.report_subtitle,
        TextStyle::new(11.0, FontFace::Regular, palette::MUTED),
    );
    ctx.mark(Element::TitleBlock, top, 46.0);
    ctx.advance(46.0 + SECTION_GAP);
}

fn draw_identity_and_score(ctx: &mut LayoutContext, input: &ReportInput<'_>) {
    ctx.ensure_space(PANEL_H);
    let geometry = *ctx.geometry();
    let labels = input.labels;
    let top = ctx.y;

    // Left: identity.
    let left_w = geometry.content_width() - SCORE_PANEL_W - PANEL_GAP;
    let x = geometry.margin_x;
    ctx.rounded_rect(
        (x, top, left_w, PANEL_H),
        6.0,
        Some(palette::LIGHT),
        Some(palette::BORDER),
    );
    let inner_w = left_w - 24.0;
    let name = get_metrics(FontFace::Bold).truncate_to_width(input.candidate_name, inner_w, 14.0);
    ctx.text(
        x + 12.0,
        top + 24.0,
        &name,
        TextStyle::new(14.0, FontFace::Bold, palette::TEXT),
    );
    let id_line = format!("{}: {}", labels.candidate_id, input.candidate_id);
    let id_line = get_metrics(FontFace::Regular).truncate_to_width(&id_line, inner_w, 9.0);
    ctx.text(x + 12.0, top + 42.0, &id_line, MUTED);
    let level_line = format!(
        "{}: {}",
        labels.experience_level,
        labels.experience(input.result.experience_level)
    );
    ctx.text(x + 12.0, top + 60.0, &level_line, BODY);
    ctx.mark(Element::IdentityPanel, top, PANEL_H);

    // Right: score, coloured by tier.
    let tier = display_tier(input.result.overall_score);
    let tier_label = labels.tier(tier.level);
    let score_x = geometry.right_edge() - SCORE_PANEL_W;
    let center = score_x + SCORE_PANEL_W / 2.0;
    ctx.rounded_rect(
        (score_x, top, SCORE_PANEL_W, PANEL_H),
        6.0,
        Some(tier.color),
        None,
    );
    ctx.text_centered(
        center,
        top + 18.0,
        labels.overall_score,
        TextStyle::new(9.0, FontFace::Regular, palette::WHITE),
    );
    ctx.text_centered(
        center,
        top + 46.0,
        &format_score(input.result.overall_score),
        TextStyle::new(22.0, FontFace::Bold, palette::WHITE),
    );
    ctx.text_centered(
        center,
        top + 66.0,
        tier_label,
        TextStyle::new(11.0, FontFace::Bold, palette::WHITE),
    );
    ctx.mark(
        Element::ScorePanel {
            label: tier_label.to_string(),
            color: tier.color,
        },
        top,
        PANEL_H,
    );

    ctx.advance(PANEL_H + SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Expiring offers alert
// ────────────────────────────────────────────────────────────────────────────

/// Height of the alert block; zero when there is nothing to show.
pub fn alert_height(offers: usize) -> f32 {
    if offers == 0 {
        return 0.0;
    }
    ALERT_HEADER_H + offers as f32 * ALERT_LINE_H + ALERT_PADDING
}

fn draw_expiring_alert(ctx: &mut LayoutContext, offers: &[ExpiringOffer], labels: &Labels) {
    if offers.is_empty() {
        return;
    }
    let height = alert_height(offers.len());
    ctx.ensure_space(height);
    let geometry = *ctx.geometry();
    let top = ctx.y;
    let x = geometry.margin_x;

    ctx.rounded_rect(
        (x, top, geometry.content_width(), height),
        4.0,
        Some(palette::DANGER_LIGHT),
        Some(palette::DANGER),
    );
    ctx.text(
        x + 12.0,
        top + 17.0,
        &format!("{} ({})", labels.expiring_offers, offers.len()),
        TextStyle::new(11.0, FontFace::Bold, palette::DANGER),
    );

    let right = geometry.right_edge() - 12.0;
    for (i, offer) in offers.iter().enumerate() {
        let baseline = top + ALERT_HEADER_H + i as f32 * ALERT_LINE_H + 10.0;
        let color = urgency_color(offer.urgency);
        let days_style = TextStyle::new(9.0, FontFace::Bold, color);
        let days = labels.remaining(offer.days_remaining);
        let days_w = measure(&days, days_style);

        ctx.circle(x + 16.0, baseline - 3.0, 2.5, color);
        let title = if offer.company.is_empty() {
            offer.title.clone()
        } else {
            format!("{} - {}", offer.title, offer.company)
        };
        let title_max = right - days_w - 12.0 - (x + 24.0);
        let title = get_metrics(FontFace::Regular).truncate_to_width(&title, title_max, 9.0);
        ctx.text(
            x + 24.0,
            baseline,
            &title,
            TextStyle::new(9.0, FontFace::Regular, palette::TEXT),
        );
        ctx.text_right(right, baseline, &days, days_style);
    }

    ctx.mark(
        Element::ExpiringAlert {
            offers: offers.len(),
        },
        top,
        height,
    );
    ctx.advance(height + SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Generic blocks
// ────────────────────────────────────────────────────────────────────────────

/// `lead_h` is the height of the first block under the title; both move to a
/// new page together.
fn draw_section_title(ctx: &mut LayoutContext, title: &str, lead_h: f32) {
    ctx.ensure_space(SECTION_TITLE_H + lead_h);
    let geometry = *ctx.geometry();
    let top = ctx.y;
    ctx.text(
        geometry.margin_x,
        top + 14.0,
        title,
        TextStyle::new(13.0, FontFace::Bold, palette::PRIMARY),
    );
    ctx.line(
        geometry.margin_x,
        top + 19.0,
        geometry.right_edge(),
        top + 19.0,
        1.0,
        palette::PRIMARY_LIGHT,
    );
    ctx.mark(Element::SectionTitle(title.to_string()), top, SECTION_TITLE_H);
    ctx.advance(SECTION_TITLE_H);
}

fn draw_empty_notice(ctx: &mut LayoutContext, labels: &Labels) {
    let lh = BODY.line_height();
    ctx.ensure_space(lh);
    let top = ctx.y;
    let x = ctx.geometry().margin_x;
    ctx.text(
        x,
        top + BODY.size,
        labels.none_available,
        TextStyle::new(10.0, FontFace::Regular, palette::MUTED),
    );
    ctx.mark(Element::EmptyNotice, top, lh);
    ctx.advance(lh + SECTION_GAP);
}

/// Titled free text wrapped to the content width, one page-break check per
/// line.
fn draw_paragraph(ctx: &mut LayoutContext, title: &str, text: &str, labels: &Labels) {
    let width = ctx.geometry().content_width();
    let lines = wrap(text, width, BODY);
    let lh = BODY.line_height();
    draw_section_title(ctx, title, lh);
    if lines.is_empty() {
        draw_empty_notice(ctx, labels);
        return;
    }

    for line in &lines {
        ctx.ensure_space(lh);
        let top = ctx.y;
        let x = ctx.geometry().margin_x;
        ctx.text(x, top + BODY.size, line, BODY);
        ctx.mark(Element::ParagraphLine, top, lh);
        ctx.advance(lh);
    }
    ctx.advance(SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Strengths vs improvement areas
// ────────────────────────────────────────────────────────────────────────────

fn draw_comparative_lists(
    ctx: &mut LayoutContext,
    left: &[String],
    right: &[String],
    labels: &Labels,
) {
    let geometry = *ctx.geometry();
    let lh = BODY.line_height();
    let col_w = (geometry.content_width() - PANEL_GAP) / 2.0;
    let left_x = geometry.margin_x;
    let right_x = left_x + col_w + PANEL_GAP;

    ctx.ensure_space(CHIP_H + 6.0 + lh);
    let top = ctx.y;
    let chip_style = TextStyle::new(10.0, FontFace::Bold, palette::WHITE);
    ctx.rounded_rect((left_x, top, col_w, CHIP_H), 4.0, Some(palette::SUCCESS), None);
    ctx.text(
        left_x + 10.0,
        top + 15.0,
        &format!("{} ({})", labels.strengths, left.len()),
        chip_style,
    );
    ctx.rounded_rect((right_x, top, col_w, CHIP_H), 4.0, Some(palette::WARNING), None);
    ctx.text(
        right_x + 10.0,
        top + 15.0,
        &format!("{} ({})", labels.improvement_areas, right.len()),
        chip_style,
    );
    ctx.mark(Element::ComparativeHeader, top, CHIP_H);
    ctx.advance(CHIP_H + 6.0);

    let rows = left.len().max(right.len());
    if rows == 0 {
        draw_empty_notice(ctx, labels);
        return;
    }

    let cell_w = col_w - 10.0;
    for i in 0..rows {
        let left_lines = left
            .get(i)
            .map(|item| wrap(&format!("• {item}"), cell_w, BODY))
            .unwrap_or_default();
        let right_lines = right
            .get(i)
            .map(|item| wrap(&format!("• {item}"), cell_w, BODY))
            .unwrap_or_default();
        let row_h = left_lines.len().max(right_lines.len()).max(1) as f32 * lh + 4.0;

        ctx.ensure_space(row_h);
        let top = ctx.y;
        for (k, line) in left_lines.iter().enumerate() {
            ctx.text(left_x + 5.0, top + BODY.size + k as f32 * lh, line, BODY);
        }
        for (k, line) in right_lines.iter().enumerate() {
            ctx.text(right_x + 5.0, top + BODY.size + k as f32 * lh, line, BODY);
        }
        ctx.mark(Element::ComparativeRow { index: i }, top, row_h);
        ctx.advance(row_h);
    }
    ctx.advance(SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Skill badges
// ────────────────────────────────────────────────────────────────────────────

fn draw_skill_badges(ctx: &mut LayoutContext, title: &str, skills: &[String], labels: &Labels) {
    if skills.is_empty() {
        draw_section_title(ctx, title, BODY.line_height());
        draw_empty_notice(ctx, labels);
        return;
    }
    draw_section_title(ctx, title, PILL_H);
    let geometry = *ctx.geometry();
    let style = TextStyle::new(9.0, FontFace::Bold, palette::WHITE);
    let metrics = get_metrics(FontFace::Bold);
    let max_text_w = geometry.content_width() - 2.0 * PILL_PADDING;

    ctx.ensure_space(PILL_H);
    ctx.x = geometry.margin_x;

    for (i, skill) in skills.iter().enumerate() {
        let text = metrics.truncate_to_width(skill.trim(), max_text_w, style.size);
        let w = measure(&text, style) + 2.0 * PILL_PADDING;

        if ctx.x + w > geometry.right_edge() && ctx.x > geometry.margin_x {
            ctx.x = geometry.margin_x;
            ctx.advance(PILL_H + PILL_GUTTER);
            ctx.ensure_space(PILL_H);
        }

        let (x, top) = (ctx.x, ctx.y);
        ctx.rounded_rect((x, top, w, PILL_H), PILL_H / 2.0, Some(palette::PRIMARY), None);
        ctx.text(x + PILL_PADDING, top + 13.5, &text, style);
        ctx.mark(Element::SkillBadge { index: i }, top, PILL_H);
        ctx.x += w + PILL_GUTTER;
    }

    ctx.x = geometry.margin_x;
    ctx.advance(PILL_H + SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Job matches table
// ────────────────────────────────────────────────────────────────────────────

pub fn job_match_table(result: &AnalysisResult, labels: &Labels) -> Table {
    let columns = vec![
        Column {
            title: labels.column_index.to_string(),
            share: 0.6,
            align: Align::Center,
        },
        Column {
            title: labels.column_position.to_string(),
            share: 3.6,
            align: Align::Left,
        },
        Column {
            title: labels.column_skills.to_string(),
            share: 1.3,
            align: Align::Center,
        },
        Column {
            title: labels.column_compatibility.to_string(),
            share: 1.6,
            align: Align::Center,
        },
        Column {
            title: labels.column_recommendation.to_string(),
            share: 2.4,
            align: Align::Left,
        },
    ];

    let rows = result
        .job_matches
        .iter()
        .enumerate()
        .map(|(i, job)| {
            let tier = display_tier(job.compatibility_percent);
            TableRow {
                cells: vec![
                    Cell::plain((i + 1).to_string()),
                    Cell::plain(job.job_title.clone()),
                    Cell::plain(job.skill_ratio()),
                    Cell::highlighted(format_percent(job.compatibility_percent), tier.color),
                    Cell::colored(
                        labels.recommendation(job.recommendation),
                        recommendation_color(job.recommendation),
                    ),
                ],
                element: Element::JobMatchRow {
                    index: i,
                    compatibility_color: tier.color,
                },
            }
        })
        .collect();

    Table { columns, rows }
}

fn draw_job_matches(
    ctx: &mut LayoutContext,
    title: &str,
    result: &AnalysisResult,
    labels: &Labels,
) {
    if result.job_matches.is_empty() {
        draw_section_title(ctx, title, BODY.line_height());
        draw_empty_notice(ctx, labels);
        return;
    }
    let table = job_match_table(result, labels);
    let style = TableStyle::default();
    let width = ctx.geometry().content_width();
    draw_section_title(ctx, title, lead_height(&table, &style, width));
    let end_y = draw_table(ctx, &table, &style);
    ctx.y = end_y;
    ctx.advance(SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Numbered recommendations
// ────────────────────────────────────────────────────────────────────────────

fn numbered_item_height(lines: usize) -> f32 {
    (lines as f32 * BODY.line_height()).max(NUMBERED_MIN_ROW_H) + 4.0
}

fn draw_numbered_list(ctx: &mut LayoutContext, title: &str, items: &[String], labels: &Labels) {
    let geometry = *ctx.geometry();
    let lh = BODY.line_height();
    let text_w = geometry.content_width() - NUMBERED_TEXT_INDENT;
    let wrapped: Vec<Vec<String>> = items.iter().map(|item| wrap(item, text_w, BODY)).collect();

    let lead_h = wrapped
        .first()
        .map(|lines| numbered_item_height(lines.len()))
        .unwrap_or(lh);
    draw_section_title(ctx, title, lead_h);
    if items.is_empty() {
        draw_empty_notice(ctx, labels);
        return;
    }
    let number_style = TextStyle::new(9.0, FontFace::Bold, palette::WHITE);

    for (i, lines) in wrapped.iter().enumerate() {
        let advance = numbered_item_height(lines.len());
        ctx.ensure_space(advance);

        let top = ctx.y;
        let cx = geometry.margin_x + NUMBER_BADGE_R;
        let cy = top + NUMBER_BADGE_R;
        ctx.circle(cx, cy, NUMBER_BADGE_R, palette::PRIMARY);
        ctx.text_centered(cx, cy + 3.2, &(i + 1).to_string(), number_style);

        for (k, line) in lines.iter().enumerate() {
            ctx.text(
                geometry.margin_x + NUMBERED_TEXT_INDENT,
                top + 12.0 + k as f32 * lh,
                line,
                BODY,
            );
        }
        ctx.mark(Element::RecommendationItem { index: i }, top, advance);
        ctx.advance(advance);
    }
    ctx.advance(SECTION_GAP);
}

// ────────────────────────────────────────────────────────────────────────────
// Conclusion
// ────────────────────────────────────────────────────────────────────────────

/// Body of the conclusion panel: verdict, best match, final recommendation.
pub fn conclusion_text(input: &ReportInput<'_>) -> String {
    let result = input.result;
    let labels = input.labels;
    let tier = display_tier(result.overall_score);
    let mut text = labels.verdict(
        input.candidate_name,
        &format_score(result.overall_score),
        tier.level,
        result.experience_level,
    );

    let best = result.job_matches.iter().max_by(|a, b| {
        a.compatibility_percent
            .partial_cmp(&b.compatibility_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(job) = best {
        text.push_str(&format!(
            " {}: {} ({}).",
            labels.best_match,
            job.job_title,
            format_percent(job.compatibility_percent)
        ));
    }

    let final_text = result.final_recommendation.trim();
    if !final_text.is_empty() {
        text.push(' ');
        text.push_str(final_text);
    }
    text
}

/// Wraps `text` and keeps at most `max_lines`; the last kept line ends with
/// "..." when anything was dropped.
pub fn clip_lines(
    text: &str,
    width: f32,
    style: TextStyle,
    max_lines: usize,
) -> (Vec<String>, bool) {
    let mut lines = wrap(text, width, style);
    if lines.len() <= max_lines {
        return (lines, false);
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = get_metrics(style.face).ellipsize(last, width, style.size);
    }
    (lines, true)
}

fn draw_conclusion(ctx: &mut LayoutContext, input: &ReportInput<'_>) {
    ctx.ensure_space(CONCLUSION_H);
    let geometry = *ctx.geometry();
    let top = ctx.y;
    let x = geometry.margin_x;

    ctx.rounded_rect(
        (x, top, geometry.content_width(), CONCLUSION_H),
        6.0,
        Some(palette::PRIMARY_LIGHT),
        Some(palette::PRIMARY),
    );
    ctx.text(
        x + 12.0,
        top + 20.0,
        input.labels.conclusion,
        TextStyle::new(12.0, FontFace::Bold, palette::PRIMARY),
    );

    let body = conclusion_text(input);
    let (lines, truncated) = clip_lines(
        &body,
        geometry.content_width() - 24.0,
        BODY,
        CONCLUSION_MAX_LINES,
    );
    for (k, line) in lines.iter().enumerate() {
        ctx.text(
            x + 12.0,
            top + 38.0 + k as f32 * BODY.line_height(),
            line,
            BODY,
        );
    }

    ctx.mark(Element::ConclusionPanel { truncated }, top, CONCLUSION_H);
    ctx.advance(CONCLUSION_H);
}
