// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, CustomPdfConformance, IndirectFontRef, Line, Mm, PdfConformance, PdfDocument,
    PdfLayerReference, Point,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use time::OffsetDateTime;

use crate::errors::RenderError;
use crate::models::{EmployeeAggregate, LoanType};

// A4, millimetres.
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const BOTTOM_MARGIN: f32 = 20.0;
pub const ROW_HEIGHT: f32 = 10.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const DESCRIPTION_LIMIT: usize = 40;
pub const SUMMARY_WIDTH: f32 = CONTENT_WIDTH / 2.0;

const MM_PER_PT: f32 = 25.4 / 72.0;
const COURIER_ADVANCE: f32 = 0.6; // em
const CELL_PADDING: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub width: f32,
    pub text: String,
    pub border: bool,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub cells: Vec<LayoutCell>,
    pub style: FontStyle,
    pub size: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Row(LayoutRow),
    /// Vertical space, in millimetres.
    Gap(f32),
}

/// Page-independent description of one report. Pagination is left to the
/// backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    /// Report date; also stamped into the document metadata.
    pub as_of: NaiveDate,
    pub blocks: Vec<Block>,
}

impl ReportLayout {
    pub fn rows(&self) -> impl Iterator<Item = &LayoutRow> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Row(r) => Some(r),
            Block::Gap(_) => None,
        })
    }

    /// Cell texts per row, handy for previews and assertions.
    pub fn lines(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }
}

/// Turns a layout into document bytes.
pub trait DocumentRenderer {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, RenderError>;
}

fn cell(width: f32, text: impl Into<String>, border: bool) -> LayoutCell {
    LayoutCell {
        width,
        text: text.into(),
        border,
        align: Align::Left,
    }
}

fn row(cells: Vec<LayoutCell>, style: FontStyle, size: f32) -> Block {
    Block::Row(LayoutRow {
        cells,
        style,
        size,
        height: ROW_HEIGHT,
    })
}

fn centered(text: String, style: FontStyle, size: f32) -> Block {
    row(
        vec![LayoutCell {
            width: CONTENT_WIDTH,
            text,
            border: false,
            align: Align::Center,
        }],
        style,
        size,
    )
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Characters of a monospaced font that fit in `width` mm at `size` pt.
pub fn cell_capacity(width: f32, size: f32) -> usize {
    let usable = (width - 2.0 * CELL_PADDING).max(0.0);
    (usable / (size * COURIER_ADVANCE * MM_PER_PT)).floor() as usize
}

pub fn layout_report(agg: &EmployeeAggregate, as_of: NaiveDate, currency: &str) -> ReportLayout {
    use FontStyle::{Bold, Regular};

    let mut blocks = vec![
        centered(
            format!("EOD Report - {} ({})", agg.employee_name, agg.employee_id),
            Bold,
            14.0,
        ),
        centered(
            format!("Date: {} | Branch: {}", as_of.format("%Y-%m-%d"), agg.branch),
            Regular,
            12.0,
        ),
        Block::Gap(10.0),
        row(
            vec![
                cell(
                    SUMMARY_WIDTH,
                    format!("Total Debits: {} {}", currency, agg.total_debit),
                    false,
                ),
                cell(
                    SUMMARY_WIDTH,
                    format!("Total Credits: {} {}", currency, agg.total_credit),
                    false,
                ),
            ],
            Bold,
            10.0,
        ),
        Block::Gap(5.0),
        row(
            vec![
                cell(60.0, "Loan Type", true),
                cell(60.0, "Paid", true),
                cell(60.0, "Remaining", true),
            ],
            Bold,
            11.0,
        ),
    ];

    for loan in LoanType::ALL {
        let bal = agg.loan(loan);
        blocks.push(row(
            vec![
                cell(60.0, loan.label(), true),
                cell(60.0, format!("{} {}", currency, bal.paid), true),
                cell(60.0, format!("{} {}", currency, bal.remaining), true),
            ],
            Regular,
            11.0,
        ));
    }

    blocks.push(Block::Gap(10.0));
    blocks.push(row(vec![cell(CONTENT_WIDTH, "Transaction History", false)], Bold, 12.0));
    blocks.push(row(
        vec![
            cell(40.0, "Date", true),
            cell(30.0, "Type", true),
            cell(40.0, "Amount", true),
            cell(80.0, "Description", true),
        ],
        Bold,
        10.0,
    ));
    for txn in &agg.transactions {
        blocks.push(row(
            vec![
                cell(40.0, txn.date.clone(), true),
                cell(30.0, txn.r#type.as_str(), true),
                cell(40.0, format!("{} {}", currency, txn.amount), true),
                cell(80.0, truncate_chars(&txn.description, DESCRIPTION_LIMIT), true),
            ],
            Regular,
            9.0,
        ));
    }

    ReportLayout {
        title: format!("EOD Report - {}", agg.employee_id),
        as_of,
        blocks,
    }
}

pub fn render_report<R: DocumentRenderer>(
    renderer: &R,
    agg: &EmployeeAggregate,
    as_of: NaiveDate,
    currency: &str,
) -> Result<Vec<u8>, RenderError> {
    renderer.render(&layout_report(agg, as_of, currency))
}

/// Draws layouts with printpdf's builtin Courier fonts. Document id and
/// dates derive from the layout, so equal layouts give equal bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

fn backend<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// 32 hex chars from the title and date.
fn document_id(layout: &ReportLayout) -> String {
    let mut first = DefaultHasher::new();
    (layout.title.as_str(), layout.as_of).hash(&mut first);
    let mut second = DefaultHasher::new();
    (layout.as_of, layout.title.as_str()).hash(&mut second);
    format!("{:016x}{:016x}", first.finish(), second.finish())
}

/// Midnight UTC of the report date.
fn stamp(as_of: NaiveDate) -> Result<OffsetDateTime, RenderError> {
    let midnight = as_of.and_hms_opt(0, 0, 0).unwrap_or_default();
    OffsetDateTime::from_unix_timestamp(midnight.and_utc().timestamp()).map_err(backend)
}

// XMP would carry a fresh instance id on every save.
fn conformance() -> PdfConformance {
    PdfConformance::Custom(CustomPdfConformance {
        identifier: "eodreport".into(),
        requires_xmp_metadata: false,
        requires_icc_profile: false,
        ..Default::default()
    })
}

fn draw_border(layer: &PdfLayerReference, x: f32, top: f32, width: f32, height: f32) {
    let (left, right) = (Mm(x), Mm(x + width));
    let (upper, lower) = (Mm(PAGE_HEIGHT - top), Mm(PAGE_HEIGHT - top - height));
    layer.add_line(Line {
        points: vec![
            (Point::new(left, upper), false),
            (Point::new(right, upper), false),
            (Point::new(right, lower), false),
            (Point::new(left, lower), false),
        ],
        is_closed: true,
    });
}

fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, row: &LayoutRow, top: f32) {
    let char_width = row.size * COURIER_ADVANCE * MM_PER_PT;
    let baseline = top + row.height / 2.0 + row.size * MM_PER_PT * 0.3;
    let mut x = MARGIN;
    for c in &row.cells {
        if c.border {
            draw_border(layer, x, top, c.width, row.height);
        }
        let visible = truncate_chars(&c.text, cell_capacity(c.width, row.size));
        let text_x = match c.align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (c.width - visible.chars().count() as f32 * char_width) / 2.0,
        };
        if !visible.is_empty() {
            layer.use_text(visible, row.size, Mm(text_x), Mm(PAGE_HEIGHT - baseline), font);
        }
        x += c.width;
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(layout.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let date = stamp(layout.as_of)?;
        let doc = doc
            .with_conformance(conformance())
            .with_document_id(document_id(layout))
            .with_creation_date(date)
            .with_mod_date(date)
            .with_metadata_date(date);
        let regular = doc.add_builtin_font(BuiltinFont::Courier).map_err(backend)?;
        let bold = doc.add_builtin_font(BuiltinFont::CourierBold).map_err(backend)?;

        let mut current = doc.get_page(page).get_layer(layer);
        current.set_outline_thickness(0.2);
        let mut pages = 1;
        let mut y = MARGIN;

        for block in &layout.blocks {
            match block {
                Block::Gap(h) => y += h,
                Block::Row(row) => {
                    if y + row.height > PAGE_HEIGHT - BOTTOM_MARGIN {
                        pages += 1;
                        let (p, l) = doc.add_page(
                            Mm(PAGE_WIDTH),
                            Mm(PAGE_HEIGHT),
                            format!("Page {}, Layer 1", pages),
                        );
                        current = doc.get_page(p).get_layer(l);
                        current.set_outline_thickness(0.2);
                        y = MARGIN;
                    }
                    let font = match row.style {
                        FontStyle::Regular => &regular,
                        FontStyle::Bold => &bold,
                    };
                    draw_row(&current, font, row, y);
                    y += row.height;
                }
            }
        }
        log::debug!("rendered '{}' on {} page(s)", layout.title, pages);
        doc.save_to_bytes().map_err(backend)
    }
}
