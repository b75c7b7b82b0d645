//! Report rendering.
//!
//! Turns a format-agnostic report payload into a binary document: a
//! multi-sheet workbook (`rust_xlsxwriter`) or a paginated PDF
//! (`printpdf`). Renderers never fetch data; a failure surfaces as a
//! single generic error and no partial file is returned.

pub mod excel;
pub mod pdf;

#[cfg(test)]
mod tests;

use thiserror::Error;

use super::reports::types::{
    IncomeExpenseReport, InventoryReport, Periodo, PurchasesReport, SalesReport,
};

/// Target document format, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML spreadsheet.
    Excel,
}

impl ReportFormat {
    /// Parses a request-supplied format name.
    ///
    /// Returns `None` for anything outside `pdf` / `excel`; callers reject
    /// the request before touching the store.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }

    /// MIME type of the rendered document.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// File extension of the rendered document.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }
}

/// Errors surfaced by the renderers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Workbook construction failed.
    #[error("failed to build spreadsheet: {0}")]
    Excel(String),

    /// PDF construction failed.
    #[error("failed to build PDF document: {0}")]
    Pdf(String),
}

/// A rendered binary document, ready to ship as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Document bytes.
    pub bytes: Vec<u8>,
    /// MIME type.
    pub content_type: &'static str,
    /// Attachment filename.
    pub filename: String,
}

/// `<report-name>-<fechaInicio>-<fechaFin>.<ext>`
#[must_use]
pub fn report_filename(name: &str, periodo: Periodo, format: ReportFormat) -> String {
    format!(
        "{name}-{}-{}.{}",
        periodo.fecha_inicio,
        periodo.fecha_fin,
        format.extension()
    )
}

fn finish(
    bytes: Result<Vec<u8>, RenderError>,
    name: &str,
    periodo: Periodo,
    format: ReportFormat,
) -> Result<RenderedReport, RenderError> {
    Ok(RenderedReport {
        bytes: bytes?,
        content_type: format.content_type(),
        filename: report_filename(name, periodo, format),
    })
}

/// Renders the sales report.
pub fn render_sales(
    report: &SalesReport,
    format: ReportFormat,
) -> Result<RenderedReport, RenderError> {
    let bytes = match format {
        ReportFormat::Excel => excel::write_workbook(&excel::sales_sheets(report)),
        ReportFormat::Pdf => pdf::render_document(&pdf::sales_document(report)),
    };
    finish(bytes, "reporte-ventas", report.periodo, format)
}

/// Renders the purchases report.
pub fn render_purchases(
    report: &PurchasesReport,
    format: ReportFormat,
) -> Result<RenderedReport, RenderError> {
    let bytes = match format {
        ReportFormat::Excel => excel::write_workbook(&excel::purchases_sheets(report)),
        ReportFormat::Pdf => pdf::render_document(&pdf::purchases_document(report)),
    };
    finish(bytes, "reporte-compras", report.periodo, format)
}

/// Renders the income-vs-expense report.
pub fn render_income_expense(
    report: &IncomeExpenseReport,
    format: ReportFormat,
) -> Result<RenderedReport, RenderError> {
    let bytes = match format {
        ReportFormat::Excel => excel::write_workbook(&excel::income_expense_sheets(report)),
        ReportFormat::Pdf => pdf::render_document(&pdf::income_expense_document(report)),
    };
    finish(bytes, "reporte-ingresos-egresos", report.periodo, format)
}

/// Renders the inventory report.
pub fn render_inventory(
    report: &InventoryReport,
    format: ReportFormat,
) -> Result<RenderedReport, RenderError> {
    let bytes = match format {
        ReportFormat::Excel => excel::write_workbook(&excel::inventory_sheets(report)),
        ReportFormat::Pdf => pdf::render_document(&pdf::inventory_document(report)),
    };
    finish(bytes, "reporte-inventario", report.periodo, format)
}
