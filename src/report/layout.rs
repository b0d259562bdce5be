use chrono::NaiveDateTime;

use crate::locator::{self, format_aisle_prefix};
use crate::model::InventoryRecord;
use crate::report::{BandRole, Document, DrawOp, FontWeight, Page, ReportConfig, TextRole};

/// Left edge of all free text.
const LEFT: f32 = 50.0;
/// Lowest baseline the closing summary may use.
const PAGE_FLOOR: f32 = 36.0;
/// Vertical space taken by the closing summary block.
const SUMMARY_HEIGHT: f32 = 50.0;
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";
const ELLIPSIS: &str = "...";
const CONTINUED: &str = "(continued)";

/// A table column: its header and the horizontal slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub offset: f32,
    pub width: f32,
}

pub const ARTICLE_COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec { header: "Locator", offset: 50.0, width: 150.0 },
    ColumnSpec { header: "On Hand", offset: 200.0, width: 100.0 },
    ColumnSpec { header: "LPN", offset: 300.0, width: 250.0 },
];

pub const AISLE_COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec { header: "Locator", offset: 50.0, width: 100.0 },
    ColumnSpec { header: "Article", offset: 150.0, width: 80.0 },
    ColumnSpec { header: "Description", offset: 230.0, width: 150.0 },
    ColumnSpec { header: "On Hand", offset: 380.0, width: 70.0 },
    ColumnSpec { header: "LPN", offset: 450.0, width: 50.0 },
];

/// Per-variant table geometry.
struct TableStyle {
    columns: &'static [ColumnSpec],
    row_height: f32,
    body_size: f32,
    bottom_margin: f32,
}

impl TableStyle {
    fn right_edge(&self) -> f32 {
        self.columns
            .last()
            .map(|column| column.offset + column.width)
            .unwrap_or(LEFT)
    }
}

/// Lays out the stock report of one article.
///
/// The heading shows the article and the description of the first record,
/// the table lists locator, quantity and LPN of every record, and the
/// summary carries the total quantity and the number of locations.
pub fn layout_article(
    config: &ReportConfig,
    article_code: &str,
    records: &[InventoryRecord],
    generated: NaiveDateTime,
) -> Document {
    let style = TableStyle {
        columns: &ARTICLE_COLUMNS,
        row_height: config.article_row_height,
        body_size: 10.0,
        bottom_margin: config.article_bottom_margin,
    };
    let title = format!("ARTICLE REPORT: {article_code}");
    let mut canvas = Canvas::new(config);
    canvas.preamble(&title, generated);

    let Some(first) = records.first() else {
        canvas.text(
            LEFT,
            12.0,
            FontWeight::Regular,
            TextRole::NoData,
            "No data found for this article.",
        );
        return canvas.finish(title);
    };

    let heading = format!("Article: {}", first.article_str());
    canvas.text(LEFT, 14.0, FontWeight::Bold, TextRole::Heading, &heading);
    canvas.advance(20.0);
    let description = truncate(first.description_str(), config.article_description_budget);
    canvas.text(
        LEFT,
        12.0,
        FontWeight::Regular,
        TextRole::Meta,
        &format!("Description: {description}"),
    );
    canvas.advance(30.0);
    canvas.text(LEFT, 11.0, FontWeight::Bold, TextRole::Heading, "LOCATIONS AND STOCK:");
    canvas.advance(25.0);
    canvas.table_header(&style);

    let mut total = 0.0;
    for record in records {
        if canvas.y < style.bottom_margin {
            canvas.page_break();
            canvas.page_heading(&heading);
            canvas.table_header(&style);
        }
        total += record.quantity_on_hand.as_total();
        canvas.table_row(
            &style,
            &[
                record.locator_str().to_string(),
                record.quantity_on_hand.to_string(),
                record.lpn_display(),
            ],
        );
    }

    canvas.close_table(&style, &heading);
    canvas.text(
        LEFT,
        11.0,
        FontWeight::Bold,
        TextRole::Summary,
        &format!("TOTAL IN STOCK: {total}"),
    );
    canvas.advance(20.0);
    canvas.text(
        LEFT,
        10.0,
        FontWeight::Regular,
        TextRole::Summary,
        &format!("Locations found: {}", records.len()),
    );
    canvas.finish(title)
}

/// Lays out the report of one aisle.
///
/// `records` must already be in aisle order. A dimmed separator is drawn
/// whenever the height of the locator changes; locators without a readable
/// height neither open nor close a group.
pub fn layout_aisle(
    config: &ReportConfig,
    aisle: u32,
    records: &[InventoryRecord],
    generated: NaiveDateTime,
) -> Document {
    let style = TableStyle {
        columns: &AISLE_COLUMNS,
        row_height: config.aisle_row_height,
        body_size: 9.0,
        bottom_margin: config.aisle_bottom_margin,
    };
    let title = format!("AISLE REPORT: {aisle}");
    let mut canvas = Canvas::new(config);
    canvas.preamble(&title, generated);

    if records.is_empty() {
        canvas.text(
            LEFT,
            12.0,
            FontWeight::Regular,
            TextRole::NoData,
            "No data found for this aisle.",
        );
        return canvas.finish(title);
    }

    let heading = format!("Aisle: {}", format_aisle_prefix(aisle));
    let continued = format!("{heading} {CONTINUED}");
    canvas.text(LEFT, 14.0, FontWeight::Bold, TextRole::Heading, &heading);
    canvas.advance(25.0);
    canvas.text(
        LEFT,
        11.0,
        FontWeight::Regular,
        TextRole::Meta,
        "Sorted by height and position",
    );
    canvas.advance(35.0);
    canvas.table_header(&style);

    let mut current_height: Option<u32> = None;
    let mut count = 0usize;
    for record in records {
        let height = locator::height_of(record.locator_str());
        let opens_group = height.filter(|height| current_height != Some(*height));

        if canvas.y < style.bottom_margin {
            canvas.page_break();
            canvas.page_heading(&continued);
            canvas.table_header(&style);
            if opens_group.is_none() {
                if let Some(height) = current_height {
                    canvas.group_separator(height, config.separator_shade);
                }
            }
        }
        if let Some(height) = opens_group {
            canvas.group_separator(height, config.separator_shade);
            current_height = Some(height);
        }

        canvas.table_row(
            &style,
            &[
                record.locator_str().to_string(),
                record.article_str().to_string(),
                truncate(record.description_str(), config.aisle_description_budget),
                record.quantity_on_hand.to_string(),
                record.lpn_display(),
            ],
        );
        count += 1;
    }

    canvas.close_table(&style, &continued);
    canvas.text(
        LEFT,
        11.0,
        FontWeight::Bold,
        TextRole::Summary,
        &format!("TOTAL ARTICLES IN AISLE: {count}"),
    );
    canvas.finish(title)
}

/// Cuts `text` to `budget` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(budget).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Cursor-driven page builder shared by both report variants.
struct Canvas<'a> {
    config: &'a ReportConfig,
    pages: Vec<Page>,
    ops: Vec<DrawOp>,
    y: f32,
    /// Table rows drawn on the current page; drives zebra parity.
    rows_on_page: usize,
}

impl<'a> Canvas<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            ops: Vec::new(),
            y: config.top(),
            rows_on_page: 0,
        }
    }

    fn preamble(&mut self, title: &str, generated: NaiveDateTime) {
        self.text(LEFT, 16.0, FontWeight::Bold, TextRole::Title, title);
        self.advance(30.0);
        let stamp = format!("Generated: {}", generated.format(TIMESTAMP_FORMAT));
        self.text(LEFT, 10.0, FontWeight::Regular, TextRole::Meta, &stamp);
        self.advance(40.0);
    }

    fn text(&mut self, x: f32, size: f32, weight: FontWeight, role: TextRole, text: &str) {
        self.text_with_gray(x, size, weight, 0.0, role, text);
    }

    fn text_with_gray(
        &mut self,
        x: f32,
        size: f32,
        weight: FontWeight,
        gray: f32,
        role: TextRole,
        text: &str,
    ) {
        self.ops.push(DrawOp::Text {
            x,
            y: self.y,
            size,
            weight,
            gray,
            role,
            text: text.to_string(),
        });
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn rule(&mut self, x1: f32, x2: f32) {
        self.ops.push(DrawOp::Rule { x1, x2, y: self.y });
    }

    fn page_break(&mut self) {
        self.pages.push(Page {
            ops: std::mem::take(&mut self.ops),
        });
        self.y = self.config.top();
        self.rows_on_page = 0;
    }

    fn page_heading(&mut self, heading: &str) {
        self.text(LEFT, 14.0, FontWeight::Bold, TextRole::Heading, heading);
        self.advance(30.0);
    }

    fn table_header(&mut self, style: &TableStyle) {
        for column in style.columns {
            self.ops.push(DrawOp::Band {
                x: column.offset - 2.0,
                y: self.y - 4.0,
                width: column.width,
                height: 16.0,
                gray: self.config.header_shade,
                role: BandRole::Header,
            });
        }
        for column in style.columns {
            self.text(
                column.offset,
                10.0,
                FontWeight::Bold,
                TextRole::ColumnHeader,
                column.header,
            );
        }
        self.advance(5.0);
        self.rule(LEFT, style.right_edge());
        self.advance(15.0);
    }

    fn table_row(&mut self, style: &TableStyle, cells: &[String]) {
        if self.rows_on_page % 2 == 0 {
            self.ops.push(DrawOp::Band {
                x: LEFT - 2.0,
                y: self.y - 5.0,
                width: style.right_edge() - LEFT + 2.0,
                height: style.row_height,
                gray: self.config.zebra_shade,
                role: BandRole::Zebra,
            });
        }
        for (index, (column, cell)) in style.columns.iter().zip(cells).enumerate() {
            self.text(
                column.offset,
                style.body_size,
                FontWeight::Regular,
                TextRole::Cell(index),
                cell,
            );
        }
        self.rows_on_page += 1;
        self.advance(style.row_height);
    }

    fn group_separator(&mut self, height: u32, shade: f32) {
        if self.rows_on_page > 0 {
            self.advance(5.0);
        }
        let label = format!("--- Altura {height} ---");
        self.text_with_gray(
            LEFT,
            8.0,
            FontWeight::Regular,
            shade,
            TextRole::GroupSeparator,
            &label,
        );
        self.advance(10.0);
    }

    /// Draws the closing rule and makes sure the summary fits on the page.
    fn close_table(&mut self, style: &TableStyle, heading: &str) {
        self.advance(10.0);
        self.rule(LEFT, style.right_edge());
        self.advance(20.0);
        if self.y - SUMMARY_HEIGHT < PAGE_FLOOR {
            self.page_break();
            self.page_heading(heading);
        }
    }

    fn finish(mut self, title: String) -> Document {
        self.pages.push(Page { ops: self.ops });
        Document {
            title,
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            pages: self.pages,
        }
    }
}
