//! Serialises a laid-out `Document` into PDF bytes with lopdf.
//!
//! Only the two standard Helvetica faces are used, with WinAnsiEncoding, so
//! no font program is embedded.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, Stream, StringFormat};

use crate::report::document::{Document, DrawOp, Rgb};
use crate::report::font_metrics::FontFace;
use crate::report::ReportError;

/// Bezier control-point factor for quarter circles.
const KAPPA: f32 = 0.552_284_8;

pub struct PdfMetadata<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub date: NaiveDate,
}

pub fn write_pdf(document: &Document, meta: &PdfMetadata<'_>) -> Result<Vec<u8>, ReportError> {
    let mut doc = lopdf::Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), Object::Reference(font_id));
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let geometry = document.geometry;
    let mut kids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content: Content<Vec<Operation>> = Content {
            operations: page
                .ops
                .iter()
                .flat_map(|op| operations(op, geometry.height))
                .collect(),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.width),
                Object::Real(geometry.height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(meta.title), StringFormat::Literal),
        "Author" => Object::String(encode_win_ansi(meta.author), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("recruiter-api ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(format!("D:{}", meta.date.format("%Y%m%d"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![
        real(color.0 as f32 / 255.0),
        real(color.1 as f32 / 255.0),
        real(color.2 as f32 / 255.0),
    ]
}

/// PDF operators for one draw op. `page_height` flips the y axis.
fn operations(op: &DrawOp, page_height: f32) -> Vec<Operation> {
    let flip = |y: f32| page_height - y;
    match op {
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            radius,
            fill,
            stroke,
        } => {
            let paint = match (fill, stroke) {
                (Some(_), Some(_)) => "B",
                (Some(_), None) => "f",
                (None, Some(_)) => "S",
                (None, None) => return Vec::new(),
            };
            let mut ops = vec![Operation::new("q", vec![])];
            if let Some(fill) = fill {
                ops.push(Operation::new("rg", color_operands(*fill)));
            }
            if let Some(stroke) = stroke {
                ops.push(Operation::new("RG", color_operands(*stroke)));
                ops.push(Operation::new("w", vec![real(0.8)]));
            }
            let bottom = flip(y + h);
            if *radius <= 0.0 {
                ops.push(Operation::new(
                    "re",
                    vec![real(*x), real(bottom), real(*w), real(*h)],
                ));
            } else {
                ops.extend(rounded_rect_path(*x, bottom, *w, *h, *radius));
            }
            ops.push(Operation::new(paint, vec![]));
            ops.push(Operation::new("Q", vec![]));
            ops
        }
        DrawOp::Circle { cx, cy, r, fill } => {
            let mut ops = vec![
                Operation::new("q", vec![]),
                Operation::new("rg", color_operands(*fill)),
            ];
            ops.extend(rounded_rect_path(cx - r, flip(*cy) - r, 2.0 * r, 2.0 * r, *r));
            ops.push(Operation::new("f", vec![]));
            ops.push(Operation::new("Q", vec![]));
            ops
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("RG", color_operands(*color)),
            Operation::new("w", vec![real(*width)]),
            Operation::new("m", vec![real(*x1), real(flip(*y1))]),
            Operation::new("l", vec![real(*x2), real(flip(*y2))]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
        DrawOp::Text {
            x,
            y,
            text,
            size,
            face,
            color,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new("rg", color_operands(*color)),
            Operation::new(
                "Tf",
                vec![Object::Name(face.resource_name().to_vec()), real(*size)],
            ),
            Operation::new("Td", vec![real(*x), real(flip(*y))]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
    }
}

/// Closed path for a rectangle with rounded corners, in PDF coordinates
/// (`y` is the bottom edge).
fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Vec<Operation> {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;
    let (x1, y1, x2, y2) = (x, y, x + w, y + h);
    let curve = |pts: [f32; 6]| Operation::new("c", pts.iter().map(|v| real(*v)).collect());

    vec![
        Operation::new("m", vec![real(x1 + r), real(y1)]),
        Operation::new("l", vec![real(x2 - r), real(y1)]),
        curve([x2 - r + k, y1, x2, y1 + r - k, x2, y1 + r]),
        Operation::new("l", vec![real(x2), real(y2 - r)]),
        curve([x2, y2 - r + k, x2 - r + k, y2, x2 - r, y2]),
        Operation::new("l", vec![real(x1 + r), real(y2)]),
        curve([x1 + r - k, y2, x1, y2 - r + k, x1, y2 - r]),
        Operation::new("l", vec![real(x1), real(y1 + r)]),
        curve([x1, y1 + r - k, x1 + r - k, y1, x1 + r, y1]),
        Operation::new("h", vec![]),
    ]
}

/// Encodes text for a WinAnsiEncoding font. Characters outside the code page
/// become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{palette, Page, PageGeometry};

    fn meta() -> PdfMetadata<'static> {
        PdfMetadata {
            title: "Evaluación",
            author: "Portal",
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        }
    }

    fn document(pages: usize) -> Document {
        let page = Page {
            ops: vec![
                DrawOp::Rect {
                    x: 40.0,
                    y: 40.0,
                    w: 100.0,
                    h: 30.0,
                    radius: 6.0,
                    fill: Some(palette::PRIMARY),
                    stroke: Some(palette::BORDER),
                },
                DrawOp::Circle {
                    cx: 60.0,
                    cy: 100.0,
                    r: 9.0,
                    fill: palette::SUCCESS,
                },
                DrawOp::Line {
                    x1: 40.0,
                    y1: 120.0,
                    x2: 500.0,
                    y2: 120.0,
                    width: 1.0,
                    color: palette::BORDER,
                },
                DrawOp::Text {
                    x: 40.0,
                    y: 150.0,
                    text: "Áreas de mejora (2)".to_string(),
                    size: 10.0,
                    face: FontFace::Bold,
                    color: palette::TEXT,
                },
            ],
            marks: vec![],
        };
        Document {
            geometry: PageGeometry::a4(),
            pages: vec![page; pages],
        }
    }

    #[test]
    fn test_written_pdf_loads_with_page_count() {
        let bytes = write_pdf(&document(3), &meta()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn test_output_is_deterministic() {
        let a = write_pdf(&document(2), &meta()).unwrap();
        let b = write_pdf(&document(2), &meta()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_y_is_flipped() {
        let ops = operations(
            &DrawOp::Text {
                x: 10.0,
                y: 100.0,
                text: "x".to_string(),
                size: 9.0,
                face: FontFace::Regular,
                color: palette::TEXT,
            },
            800.0,
        );
        let td = ops.iter().find(|op| op.operator == "Td").unwrap();
        match td.operands[1] {
            Object::Real(y) => assert!((y - 700.0).abs() < 1e-3),
            ref other => panic!("unexpected operand {other:?}"),
        }
    }

    #[test]
    fn test_rect_without_paint_emits_nothing() {
        let ops = operations(
            &DrawOp::Rect {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 1.0,
                radius: 0.0,
                fill: None,
                stroke: None,
            },
            800.0,
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Año"), vec![b'A', 0xf1, b'o']);
        assert_eq!(encode_win_ansi("• …"), vec![0x95, b' ', 0x85]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
