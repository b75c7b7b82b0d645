//! Tests for the report renderers.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::records::{IncomeRecord, SaleRecord};
use crate::reports::service::{build_income_expense_report, build_sales_report};
use crate::reports::types::{Periodo, SalesTargets};

use super::excel::{income_expense_sheets, sales_sheets};
use super::pdf::{SECTION_DISPLAY_CAP, sales_document};
use super::{ReportFormat, render_income_expense, render_sales, report_filename};

fn periodo() -> Periodo {
    Periodo {
        fecha_inicio: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        fecha_fin: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    }
}

fn venta(total: rust_decimal::Decimal, cliente: &str) -> SaleRecord {
    SaleRecord {
        id: Uuid::new_v4(),
        fecha: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        total,
        descripcion: None,
        cliente: Some(cliente.to_string()),
        tipo: Some("producto".to_string()),
        items: vec![],
    }
}

#[test]
fn test_format_parse_closed_set() {
    assert_eq!(ReportFormat::parse("pdf"), Some(ReportFormat::Pdf));
    assert_eq!(ReportFormat::parse("excel"), Some(ReportFormat::Excel));
    assert_eq!(ReportFormat::parse("PDF"), Some(ReportFormat::Pdf));
    assert_eq!(ReportFormat::parse("csv"), None);
    assert_eq!(ReportFormat::parse(""), None);
    assert_eq!(ReportFormat::parse("xlsx"), None);
}

#[test]
fn test_filename_convention() {
    assert_eq!(
        report_filename("reporte-ventas", periodo(), ReportFormat::Excel),
        "reporte-ventas-2024-01-01-2024-01-31.xlsx"
    );
    assert_eq!(
        report_filename("reporte-ventas", periodo(), ReportFormat::Pdf),
        "reporte-ventas-2024-01-01-2024-01-31.pdf"
    );
}

#[test]
fn test_content_types() {
    assert_eq!(ReportFormat::Pdf.content_type(), "application/pdf");
    assert_eq!(
        ReportFormat::Excel.content_type(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn test_empty_period_renders_valid_documents() {
    let report = build_income_expense_report(periodo(), &[], &[]);

    let excel = render_income_expense(&report, ReportFormat::Excel).unwrap();
    // xlsx files are zip archives.
    assert!(excel.bytes.starts_with(b"PK"));
    assert_eq!(
        excel.filename,
        "reporte-ingresos-egresos-2024-01-01-2024-01-31.xlsx"
    );

    let pdf = render_income_expense(&report, ReportFormat::Pdf).unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF-"));
    assert_eq!(pdf.content_type, "application/pdf");
}

#[test]
fn test_resumen_sheet_is_always_first_and_detail_sheets_are_conditional() {
    let empty = build_sales_report(periodo(), &[], &SalesTargets::default());
    let sheets = sales_sheets(&empty);
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].name, "Resumen");

    let populated = build_sales_report(
        periodo(),
        &[venta(dec!(100), "ACME")],
        &SalesTargets::default(),
    );
    let sheets = sales_sheets(&populated);
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    // No line items: the product sheet stays out, clients and types go in.
    assert_eq!(names, vec!["Resumen", "Clientes", "Por Tipo"]);
}

#[test]
fn test_income_expense_sheets_follow_collections() {
    let ingresos = vec![IncomeRecord {
        id: Uuid::new_v4(),
        fecha: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        monto: dec!(1000),
        descripcion: None,
        categoria: Some("Ventas".to_string()),
    }];
    let report = build_income_expense_report(periodo(), &ingresos, &[]);

    let names: Vec<String> = income_expense_sheets(&report)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Resumen", "Ingresos", "Detalle Diario"]);
}

#[test]
fn test_pdf_sections_are_capped_at_display_limit() {
    let ventas: Vec<SaleRecord> = (0..15)
        .map(|i| venta(rust_decimal::Decimal::from(100 + i), &format!("Cliente {i}")))
        .collect();
    let report = build_sales_report(periodo(), &ventas, &SalesTargets::default());
    assert_eq!(report.top_clientes.len(), 10);

    let document = sales_document(&report);
    let clientes = document
        .sections
        .iter()
        .find(|s| s.title == "Mejores clientes")
        .unwrap();
    // The payload keeps the full Top-10; the renderer displays 8.
    assert_eq!(clientes.entries.len(), 10);
    assert!(SECTION_DISPLAY_CAP < clientes.entries.len());

    let rendered = render_sales(&report, ReportFormat::Pdf).unwrap();
    assert!(rendered.bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_rendered_sales_workbook_has_bytes_for_populated_report() {
    let report = build_sales_report(
        periodo(),
        &[venta(dec!(5000), "ACME")],
        &SalesTargets::default(),
    );
    let rendered = render_sales(&report, ReportFormat::Excel).unwrap();
    assert!(rendered.bytes.starts_with(b"PK"));
    assert!(rendered.filename.ends_with(".xlsx"));
}
