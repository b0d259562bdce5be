use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument};

use crate::error::{LocatorError, Result};
use crate::io::workbook_read;
use crate::io::workbook_write::{self, AppendSummary};
use crate::locator::parse_aisle_number;
use crate::model::{DifferenceStatus, InventoryRecord, SheetRows};
use crate::query;
use crate::report::{self, ReportConfig};

/// Directory reports are written to unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "pdfs";

/// Everything an operation needs to know about where it reads and writes.
///
/// A session holds no cached data: every operation reloads the workbook so
/// edits made between calls are always visible.
#[derive(Debug, Clone)]
pub struct Session {
    pub workbook: PathBuf,
    pub output_dir: PathBuf,
    pub report: ReportConfig,
}

impl Session {
    pub fn new(workbook: impl Into<PathBuf>) -> Self {
        Self {
            workbook: workbook.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            report: ReportConfig::default(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_report_config(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Builds the stock report of `article` and returns the path of the
    /// generated PDF. An unknown article still yields a document.
    #[instrument(level = "info", skip(self), fields(workbook = %self.workbook.display()))]
    pub fn article_report(&self, article: &str) -> Result<PathBuf> {
        let article = required(article, "article code")?;
        let sheets = self.load()?;
        let records = query::by_article(article, &sheets);
        info!(record_count = records.len(), "article records found");

        let document = report::layout_article(&self.report, article, &records, now());
        self.write_document(&document, &format!("Articulo{article}"))
    }

    /// Builds the report of aisle `aisle` (a positive number, as typed by
    /// the user) and returns the path of the generated PDF.
    #[instrument(level = "info", skip(self), fields(workbook = %self.workbook.display()))]
    pub fn aisle_report(&self, aisle: &str) -> Result<PathBuf> {
        let aisle_input = required(aisle, "aisle number")?;
        let aisle = parse_aisle_number(aisle_input).ok_or_else(|| {
            LocatorError::Validation(format!(
                "aisle must be a positive whole number, got '{aisle_input}'"
            ))
        })?;
        let sheets = self.load()?;
        let records = query::by_aisle(aisle, &sheets);
        info!(record_count = records.len(), "aisle records found");

        let document = report::layout_aisle(&self.report, aisle, &records, now());
        self.write_document(&document, &format!("Pasillo{aisle_input}"))
    }

    /// Returns the records stored exactly at `locator`.
    #[instrument(level = "info", skip(self), fields(workbook = %self.workbook.display()))]
    pub fn locate(&self, locator: &str) -> Result<Vec<InventoryRecord>> {
        let locator = required(locator, "locator")?;
        let sheets = self.load()?;
        Ok(query::by_locator(locator, &sheets))
    }

    /// Returns the description of `article`, empty when it is unknown.
    #[instrument(level = "info", skip(self), fields(workbook = %self.workbook.display()))]
    pub fn describe(&self, article: &str) -> Result<String> {
        let article = required(article, "article code")?;
        let sheets = self.load()?;
        Ok(query::description(article, &sheets))
    }

    /// Logs every record found at `locator` as a difference of kind
    /// `status` in the workbook itself.
    #[instrument(level = "info", skip(self), fields(workbook = %self.workbook.display()))]
    pub fn log_difference(
        &self,
        locator: &str,
        status: DifferenceStatus,
    ) -> Result<AppendSummary> {
        let locator = required(locator, "locator")?;
        self.require_workbook_path()?;
        if !self.workbook.is_file() {
            return Err(LocatorError::StoreNotFound(self.workbook.clone()));
        }

        let sheets = self.load()?;
        let records = query::by_locator(locator, &sheets);
        debug!(record_count = records.len(), %status, "logging difference");
        workbook_write::append_differences(&self.workbook, &records, status)
    }

    fn load(&self) -> Result<Vec<SheetRows>> {
        self.require_workbook_path()?;
        workbook_read::load_all_sheets(&self.workbook)
    }

    fn require_workbook_path(&self) -> Result<()> {
        if self.workbook.as_os_str().is_empty() {
            return Err(LocatorError::Validation("no workbook selected".into()));
        }
        Ok(())
    }

    fn write_document(&self, document: &report::Document, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.pdf", sanitize_file_stem(name)));
        report::write_pdf(document, &path)?;
        info!(path = %path.display(), pages = document.pages.len(), "report written");
        Ok(path)
    }
}

/// Message shown to the user once a report was generated.
pub fn success_message(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("PDF created successfully: {file_name}")
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LocatorError::Validation(format!("{what} is required")));
    }
    Ok(trimmed)
}

/// Replaces characters that cannot appear in file names.
fn sanitize_file_stem(name: &str) -> String {
    let invalid = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    name.chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
