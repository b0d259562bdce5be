use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocatorError;

/// Rendering of an LPN that is absent, blank or `nan`.
pub const MISSING_LPN: &str = "-";

/// The inventory columns understood by the crate, in the order they are
/// written to the difference log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Locator,
    Article,
    Description,
    OnHand,
    Lpn,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Locator,
        Column::Article,
        Column::Description,
        Column::OnHand,
        Column::Lpn,
    ];

    /// Header text used by the source workbooks.
    pub fn header(self) -> &'static str {
        match self {
            Column::Locator => "Localizador",
            Column::Article => "Artículo",
            Column::Description => "Desc Artículo",
            Column::OnHand => "En Mano",
            Column::Lpn => "LPN",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL
            .into_iter()
            .find(|column| column.header() == header)
    }
}

/// Zero-based positions of the known columns within one sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSet {
    pub locator: Option<usize>,
    pub article: Option<usize>,
    pub description: Option<usize>,
    pub on_hand: Option<usize>,
    pub lpn: Option<usize>,
}

impl ColumnSet {
    /// Builds the column set from a header row. The first occurrence of a
    /// duplicated header wins.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = ColumnSet::default();
        for (index, header) in headers.into_iter().enumerate() {
            let Some(column) = Column::from_header(header) else {
                continue;
            };
            let slot = columns.slot_mut(column);
            if slot.is_none() {
                *slot = Some(index);
            }
        }
        columns
    }

    pub fn get(&self, column: Column) -> Option<usize> {
        match column {
            Column::Locator => self.locator,
            Column::Article => self.article,
            Column::Description => self.description,
            Column::OnHand => self.on_hand,
            Column::Lpn => self.lpn,
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.get(column).is_some()
    }

    pub fn has_all(&self) -> bool {
        Column::ALL.into_iter().all(|column| self.has(column))
    }

    fn slot_mut(&mut self, column: Column) -> &mut Option<usize> {
        match column {
            Column::Locator => &mut self.locator,
            Column::Article => &mut self.article,
            Column::Description => &mut self.description,
            Column::OnHand => &mut self.on_hand,
            Column::Lpn => &mut self.lpn,
        }
    }
}

/// On-hand quantity of a record.
///
/// Numeric coercion never fails: values that are not numbers keep their
/// original text and count as zero in totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Quantity {
    Number(f64),
    Text(String),
    Missing,
}

impl Quantity {
    /// Interprets a textual cell value.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Quantity::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Quantity::Number(value),
            _ => Quantity::Text(raw.to_string()),
        }
    }

    pub fn from_number(value: f64) -> Self {
        if value.is_finite() {
            Quantity::Number(value)
        } else {
            Quantity::Missing
        }
    }

    /// Contribution of this quantity to a running total.
    pub fn as_total(&self) -> f64 {
        match self {
            Quantity::Number(value) => *value,
            Quantity::Text(_) | Quantity::Missing => 0.0,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(value) => write!(f, "{value}"),
            Quantity::Text(text) => f.write_str(text),
            Quantity::Missing => f.write_str("0"),
        }
    }
}

/// One inventory row extracted from a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Name of the sheet the row was read from.
    pub sheet: String,
    pub locator: Option<String>,
    pub article_code: Option<String>,
    pub description: Option<String>,
    pub quantity_on_hand: Quantity,
    pub lpn: Option<String>,
}

impl InventoryRecord {
    pub fn locator_str(&self) -> &str {
        self.locator.as_deref().unwrap_or_default()
    }

    pub fn article_str(&self) -> &str {
        self.article_code.as_deref().unwrap_or_default()
    }

    pub fn description_str(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// LPN as printed in reports.
    pub fn lpn_display(&self) -> String {
        render_lpn(self.lpn.as_deref())
    }
}

/// All records of one sheet together with the columns it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRows {
    pub name: String,
    pub columns: ColumnSet,
    pub records: Vec<InventoryRecord>,
}

/// Classification of a logged difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifferenceStatus {
    /// Stock expected at the locator was not found.
    Faltante,
    /// Stock found at the locator that was not expected.
    Sobrante,
}

impl DifferenceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DifferenceStatus::Faltante => "FALTANTE",
            DifferenceStatus::Sobrante => "SOBRANTE",
        }
    }
}

impl fmt::Display for DifferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifferenceStatus {
    type Err = LocatorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("faltante") {
            Ok(DifferenceStatus::Faltante)
        } else if trimmed.eq_ignore_ascii_case("sobrante") {
            Ok(DifferenceStatus::Sobrante)
        } else if trimmed.is_empty() {
            Err(LocatorError::Validation("a difference status is required".into()))
        } else {
            Err(LocatorError::Validation(format!(
                "unknown difference status '{trimmed}', expected FALTANTE or SOBRANTE"
            )))
        }
    }
}

/// Strips the `.0` left behind when an article code was stored in a
/// numeric column, e.g. `426367.0` -> `426367`.
pub fn normalize_article_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// Renders an LPN, mapping absent, blank and `nan` values to [`MISSING_LPN`].
pub fn render_lpn(lpn: Option<&str>) -> String {
    match lpn.map(str::trim) {
        None => MISSING_LPN.to_string(),
        Some(value) if value.is_empty() || value.eq_ignore_ascii_case("nan") => {
            MISSING_LPN.to_string()
        }
        Some(_) => lpn.unwrap_or_default().to_string(),
    }
}
