//! Paginated stock reports.
//!
//! Rendering is split in two passes. [`layout`] turns a result set into a
//! [`Document`], an explicit list of drawing operations per page, without
//! touching the filesystem. [`pdf`] paints a [`Document`] into a PDF file.
//! Every pagination, striping and grouping decision is made by the first
//! pass, so it can be inspected directly.

pub mod layout;
pub mod pdf;

use serde::{Deserialize, Serialize};

pub use layout::{layout_aisle, layout_article};
pub use pdf::write_pdf;

/// Tunable constants of the report layout. Coordinates are PDF points with
/// the origin at the bottom-left corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Distance from the top edge to the first baseline of every page.
    pub top_margin: f32,
    /// Descriptions longer than this many characters are cut in article
    /// reports.
    pub article_description_budget: usize,
    /// Descriptions longer than this many characters are cut in aisle
    /// reports.
    pub aisle_description_budget: usize,
    /// A new page starts once the cursor drops below this height.
    pub article_bottom_margin: f32,
    pub aisle_bottom_margin: f32,
    pub article_row_height: f32,
    pub aisle_row_height: f32,
    /// Grey level of the header band (0 is black, 1 is white).
    pub header_shade: f32,
    /// Grey level of the band behind even rows.
    pub zebra_shade: f32,
    /// Grey level of the height separators of aisle reports.
    pub separator_shade: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            top_margin: 50.0,
            article_description_budget: 60,
            aisle_description_budget: 18,
            article_bottom_margin: 100.0,
            aisle_bottom_margin: 80.0,
            article_row_height: 20.0,
            aisle_row_height: 18.0,
            header_shade: 0.85,
            zebra_shade: 0.95,
            separator_shade: 0.7,
        }
    }
}

impl ReportConfig {
    /// Baseline of the first line on every page.
    pub fn top(&self) -> f32 {
        self.page_height - self.top_margin
    }
}

/// A laid out report, ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    /// Every text drawn in the document, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts).map(|(_, text)| text)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Texts on this page with their role, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (TextRole, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { role, text, .. } => Some((*role, text.as_str())),
            _ => None,
        })
    }

    /// Number of table rows on this page.
    pub fn row_count(&self) -> usize {
        self.texts()
            .filter(|(role, _)| *role == TextRole::Cell(0))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// What a piece of text is, independent of where it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Meta,
    Heading,
    ColumnHeader,
    /// A table cell in the given column.
    Cell(usize),
    GroupSeparator,
    Summary,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandRole {
    Header,
    Zebra,
}

/// One drawing instruction. `y` of a text is its baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        gray: f32,
        role: TextRole,
        text: String,
    },
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
        role: BandRole,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
}
