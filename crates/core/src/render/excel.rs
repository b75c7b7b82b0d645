//! Excel workbook rendering.
//!
//! Sheets are built as plain row/cell grids first and written with
//! `rust_xlsxwriter` in one pass. A "Resumen" sheet is always produced;
//! detail and breakdown sheets appear only when their backing collection
//! is non-empty. Money cells are locale-formatted strings with a currency
//! prefix; counts stay numeric.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};

use gestia_shared::types::format_currency;

use crate::reports::types::{
    IncomeExpenseReport, InventoryReport, Periodo, PurchasesReport, RankedItem, SalesReport,
};

use super::RenderError;

/// One spreadsheet cell.
#[derive(Debug, Clone)]
pub(crate) enum Cell {
    /// Empty cell.
    Blank,
    /// Plain text.
    Text(String),
    /// Bold text (titles and section headers).
    Header(String),
    /// Monetary amount, written as a formatted currency string.
    Money(Decimal),
    /// Plain count, written as a number.
    Count(i64),
}

/// One named sheet as a grid of rows.
#[derive(Debug, Clone)]
pub(crate) struct Sheet {
    pub(crate) name: String,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Title row, period row, and a blank spacer.
    fn with_heading(name: &str, title: &str, periodo: Periodo) -> Self {
        let mut sheet = Self::new(name);
        sheet.push(vec![Cell::Header(title.to_string())]);
        sheet.push(vec![Cell::Text(periodo_label(periodo))]);
        sheet.push(vec![]);
        sheet
    }
}

fn periodo_label(periodo: Periodo) -> String {
    format!(
        "Período: {} - {}",
        periodo.fecha_inicio.format("%d/%m/%Y"),
        periodo.fecha_fin.format("%d/%m/%Y")
    )
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn header(s: &str) -> Cell {
    Cell::Header(s.to_string())
}

#[allow(clippy::cast_possible_wrap)]
fn count(n: u64) -> Cell {
    Cell::Count(n as i64)
}

/// Appends a breakdown map as a two-column section.
fn push_breakdown(sheet: &mut Sheet, title: &str, map: &IndexMap<String, Decimal>) {
    sheet.push(vec![header(title), header("Total")]);
    for (label, total) in map {
        sheet.push(vec![text(label), Cell::Money(*total)]);
    }
}

/// Appends a ranking as an indexed section.
fn push_ranking(sheet: &mut Sheet, columns: &[&str], items: &[RankedItem]) {
    let mut head = vec![header("#")];
    head.extend(columns.iter().map(|c| header(c)));
    sheet.push(head);

    for (idx, item) in items.iter().enumerate() {
        let mut row = vec![Cell::Count(idx as i64 + 1), text(&item.nombre)];
        row.push(count(item.cantidad));
        row.push(Cell::Money(item.total));
        if !item.detalles.is_empty() {
            row.push(text(&item.detalles.join(", ")));
        }
        sheet.push(row);
    }
}

// ============================================================================
// Sheet builders per report kind
// ============================================================================

pub(crate) fn sales_sheets(report: &SalesReport) -> Vec<Sheet> {
    let mut resumen = Sheet::with_heading("Resumen", "Reporte de Ventas", report.periodo);
    resumen.push(vec![header("Resumen")]);
    resumen.push(vec![
        text("Total de ventas"),
        Cell::Money(report.resumen.total_ventas),
    ]);
    resumen.push(vec![
        text("Cantidad de ventas"),
        count(report.resumen.cantidad_ventas),
    ]);
    resumen.push(vec![
        text("Promedio por venta"),
        Cell::Money(report.resumen.promedio_venta),
    ]);
    resumen.push(vec![
        text("Ventas altas"),
        count(report.resumen.ventas_altas),
    ]);
    resumen.push(vec![
        text("Avance de meta"),
        text(&format!("{} %", report.resumen.avance_meta.round_dp(2))),
    ]);

    let mut sheets = vec![resumen];

    if !report.top_productos.is_empty() {
        let mut sheet = Sheet::with_heading("Productos", "Productos más vendidos", report.periodo);
        push_ranking(&mut sheet, &["Producto", "Unidades", "Total"], &report.top_productos);
        sheets.push(sheet);
    }
    if !report.top_clientes.is_empty() {
        let mut sheet = Sheet::with_heading("Clientes", "Mejores clientes", report.periodo);
        push_ranking(&mut sheet, &["Cliente", "Ventas", "Total"], &report.top_clientes);
        sheets.push(sheet);
    }
    if !report.ventas_por_tipo.is_empty() {
        let mut sheet = Sheet::with_heading("Por Tipo", "Ventas por tipo", report.periodo);
        push_breakdown(&mut sheet, "Tipo", &report.ventas_por_tipo);
        sheets.push(sheet);
    }

    sheets
}

pub(crate) fn purchases_sheets(report: &PurchasesReport) -> Vec<Sheet> {
    let mut resumen = Sheet::with_heading("Resumen", "Reporte de Compras", report.periodo);
    resumen.push(vec![header("Resumen")]);
    resumen.push(vec![
        text("Total de compras"),
        Cell::Money(report.resumen.total_compras),
    ]);
    resumen.push(vec![
        text("Cantidad de compras"),
        count(report.resumen.cantidad_compras),
    ]);
    resumen.push(vec![
        text("Promedio por compra"),
        Cell::Money(report.resumen.promedio_compra),
    ]);

    let mut sheets = vec![resumen];

    if !report.top_productos.is_empty() {
        let mut sheet =
            Sheet::with_heading("Productos", "Productos más comprados", report.periodo);
        push_ranking(
            &mut sheet,
            &["Producto", "Unidades", "Total", "Proveedores"],
            &report.top_productos,
        );
        sheets.push(sheet);
    }
    if !report.top_proveedores.is_empty() {
        let mut sheet = Sheet::with_heading("Proveedores", "Mejores proveedores", report.periodo);
        push_ranking(
            &mut sheet,
            &["Proveedor", "Compras", "Total"],
            &report.top_proveedores,
        );
        sheets.push(sheet);
    }
    if !report.compras_por_proveedor.is_empty() {
        let mut sheet =
            Sheet::with_heading("Por Proveedor", "Compras por proveedor", report.periodo);
        push_breakdown(&mut sheet, "Proveedor", &report.compras_por_proveedor);
        sheets.push(sheet);
    }

    sheets
}

pub(crate) fn income_expense_sheets(report: &IncomeExpenseReport) -> Vec<Sheet> {
    let mut resumen =
        Sheet::with_heading("Resumen", "Reporte de Ingresos y Egresos", report.periodo);
    resumen.push(vec![header("Resumen")]);
    resumen.push(vec![
        text("Total de ingresos"),
        Cell::Money(report.resumen.total_ingresos),
    ]);
    resumen.push(vec![
        text("Total de egresos"),
        Cell::Money(report.resumen.total_egresos),
    ]);
    resumen.push(vec![text("Balance"), Cell::Money(report.resumen.balance)]);
    resumen.push(vec![
        text("Cantidad de ingresos"),
        count(report.resumen.cantidad_ingresos),
    ]);
    resumen.push(vec![
        text("Cantidad de egresos"),
        count(report.resumen.cantidad_egresos),
    ]);

    let mut sheets = vec![resumen];

    if !report.ingresos_por_categoria.is_empty() {
        let mut sheet = Sheet::with_heading("Ingresos", "Ingresos por categoría", report.periodo);
        push_breakdown(&mut sheet, "Categoría", &report.ingresos_por_categoria);
        sheets.push(sheet);
    }
    if !report.egresos_por_categoria.is_empty() {
        let mut sheet = Sheet::with_heading("Egresos", "Egresos por categoría", report.periodo);
        push_breakdown(&mut sheet, "Categoría", &report.egresos_por_categoria);
        sheets.push(sheet);
    }
    if !report.detalle_por_dia.is_empty() {
        let mut sheet = Sheet::with_heading("Detalle Diario", "Detalle por día", report.periodo);
        sheet.push(vec![
            header("Fecha"),
            header("Ingresos"),
            header("Egresos"),
            header("Neto"),
        ]);
        for day in &report.detalle_por_dia {
            sheet.push(vec![
                text(&day.fecha.format("%d/%m/%Y").to_string()),
                Cell::Money(day.ingresos),
                Cell::Money(day.egresos),
                Cell::Money(day.neto),
            ]);
        }
        sheets.push(sheet);
    }

    sheets
}

pub(crate) fn inventory_sheets(report: &InventoryReport) -> Vec<Sheet> {
    let mut resumen = Sheet::with_heading("Resumen", "Reporte de Inventario", report.periodo);
    resumen.push(vec![header("Resumen")]);
    resumen.push(vec![
        text("Total de productos"),
        count(report.resumen.total_productos),
    ]);
    resumen.push(vec![
        text("Unidades totales"),
        Cell::Count(report.resumen.unidades_totales),
    ]);
    resumen.push(vec![
        text("Valor del inventario"),
        Cell::Money(report.resumen.valor_inventario),
    ]);
    resumen.push(vec![text("Sin stock"), count(report.resumen.sin_stock)]);
    resumen.push(vec![text("Stock bajo"), count(report.resumen.stock_bajo)]);
    resumen.push(vec![text("Stock alto"), count(report.resumen.stock_alto)]);

    let mut sheets = vec![resumen];

    if !report.productos.is_empty() {
        let mut sheet = Sheet::with_heading("Productos", "Estado de productos", report.periodo);
        sheet.push(vec![
            header("Producto"),
            header("Stock"),
            header("Precio"),
            header("Valor"),
            header("Estado"),
            header("Vendidos"),
            header("Rotación"),
        ]);
        for p in &report.productos {
            sheet.push(vec![
                text(&p.nombre),
                Cell::Count(p.cantidad),
                Cell::Money(p.precio),
                Cell::Money(p.valor),
                text(p.estado.label()),
                Cell::Count(p.vendidos),
                text(&p.rotacion.round_dp(2).to_string()),
            ]);
        }
        sheets.push(sheet);
    }
    if !report.sin_movimiento.is_empty() {
        let mut sheet =
            Sheet::with_heading("Sin Movimiento", "Productos sin movimiento", report.periodo);
        sheet.push(vec![
            header("Producto"),
            header("Stock"),
            header("Valor inmovilizado"),
        ]);
        for p in &report.sin_movimiento {
            sheet.push(vec![
                text(&p.nombre),
                Cell::Count(p.cantidad),
                Cell::Money(p.valor),
            ]);
        }
        sheets.push(sheet);
    }

    sheets
}

// ============================================================================
// Workbook writer
// ============================================================================

/// Writes the sheet grids into a workbook and returns the file bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, RenderError> {
    let excel_err = |e: rust_xlsxwriter::XlsxError| RenderError::Excel(e.to_string());

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(excel_err)?;

        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Blank => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).map_err(excel_err)?;
                    }
                    Cell::Header(s) => {
                        worksheet
                            .write_string_with_format(r, c, s, &bold)
                            .map_err(excel_err)?;
                    }
                    Cell::Money(amount) => {
                        worksheet
                            .write_string(r, c, format_currency(*amount))
                            .map_err(excel_err)?;
                    }
                    Cell::Count(n) => {
                        worksheet.write_number(r, c, *n as f64).map_err(excel_err)?;
                    }
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(excel_err)
}
