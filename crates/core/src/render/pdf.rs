//! PDF report rendering.
//!
//! Reports are mapped onto a small document model (title, period subtitle,
//! color-coded summary panel, ranked sections) and laid out with `printpdf`
//! in two explicit passes: content layout first, producing the page list,
//! then footer stamping once the total page count is known.

// The f32 math below is page geometry only; monetary values reach this
// module already formatted as strings.
#![allow(clippy::float_arithmetic)]

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PaintMode, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rect, Rgb,
};
use rust_decimal::Decimal;

use gestia_shared::types::format_currency;

use crate::reports::types::{
    IncomeExpenseReport, InventoryReport, Periodo, PurchasesReport, RankedItem, SalesReport,
    StockStatus,
};

use super::RenderError;

/// Ranked sections display at most this many entries, even when the
/// payload carries more.
pub(crate) const SECTION_DISPLAY_CAP: usize = 8;

const WIDTH: Mm = Mm(210.0);
const HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 18.0;
const LEFT: Mm = Mm(MARGIN);
const RIGHT: Mm = Mm(WIDTH.0 - MARGIN);
const TOP: Mm = Mm(HEIGHT.0 - MARGIN);
const BOTTOM: Mm = Mm(MARGIN);

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 11.0;
const SECTION_TITLE_SIZE: f32 = 12.0;
const TEXT_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;

const ROW_HEIGHT: f32 = 6.0;
const PANEL_PADDING: f32 = 5.0;
const AMOUNT_X: Mm = Mm(130.0);
const DETAIL_X: Mm = Mm(165.0);

/// Vertical threshold: a new section starts on a fresh page below this.
const SECTION_BREAK_Y: f32 = 60.0;
/// Rows never render below this (footer space).
const CONTENT_FLOOR: f32 = BOTTOM.0 + 12.0;

/// Color role of a summary metric line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricColor {
    /// Body text color.
    Neutral,
    /// Highlight color for the headline figure.
    Accent,
    /// Favorable figure.
    Positive,
    /// Unfavorable figure.
    Negative,
}

impl MetricColor {
    fn color(self) -> Color {
        match self {
            Self::Neutral => Color::Rgb(Rgb::new(0.15, 0.15, 0.15, None)),
            Self::Accent => Color::Rgb(Rgb::new(0.12, 0.29, 0.55, None)),
            Self::Positive => Color::Rgb(Rgb::new(0.10, 0.45, 0.20, None)),
            Self::Negative => Color::Rgb(Rgb::new(0.65, 0.15, 0.15, None)),
        }
    }
}

fn text_color() -> Color {
    MetricColor::Neutral.color()
}

fn muted_color() -> Color {
    Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None))
}

fn panel_color() -> Color {
    Color::Rgb(Rgb::new(0.93, 0.93, 0.95, None))
}

/// One color-coded line of the summary panel.
#[derive(Debug, Clone)]
pub(crate) struct Metric {
    pub(crate) label: String,
    pub(crate) value: String,
    pub(crate) color: MetricColor,
}

/// One entry of a ranked section.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) label: String,
    pub(crate) amount: String,
    pub(crate) detail: Option<String>,
}

/// A titled ranked-list section.
#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub(crate) title: String,
    pub(crate) entries: Vec<Entry>,
}

/// The format-independent PDF document model.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub(crate) title: String,
    pub(crate) periodo: Periodo,
    pub(crate) metrics: Vec<Metric>,
    pub(crate) sections: Vec<Section>,
}

fn metric(label: &str, value: String, color: MetricColor) -> Metric {
    Metric {
        label: label.to_string(),
        value,
        color,
    }
}

fn ranked_entries(items: &[RankedItem], unit: &str) -> Vec<Entry> {
    items
        .iter()
        .map(|item| Entry {
            label: item.nombre.clone(),
            amount: format_currency(item.total),
            detail: Some(format!("{} {unit}", item.cantidad)),
        })
        .collect()
}

fn breakdown_entries(map: &indexmap::IndexMap<String, Decimal>) -> Vec<Entry> {
    map.iter()
        .map(|(label, total)| Entry {
            label: label.clone(),
            amount: format_currency(*total),
            detail: None,
        })
        .collect()
}

// ============================================================================
// Document builders per report kind
// ============================================================================

pub(crate) fn sales_document(report: &SalesReport) -> Document {
    Document {
        title: "Reporte de Ventas".to_string(),
        periodo: report.periodo,
        metrics: vec![
            metric(
                "Total de ventas",
                format_currency(report.resumen.total_ventas),
                MetricColor::Accent,
            ),
            metric(
                "Cantidad de ventas",
                report.resumen.cantidad_ventas.to_string(),
                MetricColor::Neutral,
            ),
            metric(
                "Promedio por venta",
                format_currency(report.resumen.promedio_venta),
                MetricColor::Neutral,
            ),
            metric(
                "Ventas altas",
                report.resumen.ventas_altas.to_string(),
                MetricColor::Neutral,
            ),
            metric(
                "Avance de meta",
                format!("{} %", report.resumen.avance_meta.round_dp(2)),
                MetricColor::Positive,
            ),
        ],
        sections: vec![
            Section {
                title: "Productos más vendidos".to_string(),
                entries: ranked_entries(&report.top_productos, "unidades"),
            },
            Section {
                title: "Mejores clientes".to_string(),
                entries: ranked_entries(&report.top_clientes, "ventas"),
            },
            Section {
                title: "Ventas por tipo".to_string(),
                entries: breakdown_entries(&report.ventas_por_tipo),
            },
        ],
    }
}

pub(crate) fn purchases_document(report: &PurchasesReport) -> Document {
    Document {
        title: "Reporte de Compras".to_string(),
        periodo: report.periodo,
        metrics: vec![
            metric(
                "Total de compras",
                format_currency(report.resumen.total_compras),
                MetricColor::Accent,
            ),
            metric(
                "Cantidad de compras",
                report.resumen.cantidad_compras.to_string(),
                MetricColor::Neutral,
            ),
            metric(
                "Promedio por compra",
                format_currency(report.resumen.promedio_compra),
                MetricColor::Neutral,
            ),
        ],
        sections: vec![
            Section {
                title: "Productos más comprados".to_string(),
                entries: ranked_entries(&report.top_productos, "unidades"),
            },
            Section {
                title: "Mejores proveedores".to_string(),
                entries: ranked_entries(&report.top_proveedores, "compras"),
            },
        ],
    }
}

pub(crate) fn income_expense_document(report: &IncomeExpenseReport) -> Document {
    let balance_color = if report.resumen.balance.is_sign_negative() {
        MetricColor::Negative
    } else {
        MetricColor::Positive
    };

    Document {
        title: "Reporte de Ingresos y Egresos".to_string(),
        periodo: report.periodo,
        metrics: vec![
            metric(
                "Total de ingresos",
                format_currency(report.resumen.total_ingresos),
                MetricColor::Positive,
            ),
            metric(
                "Total de egresos",
                format_currency(report.resumen.total_egresos),
                MetricColor::Negative,
            ),
            metric(
                "Balance",
                format_currency(report.resumen.balance),
                balance_color,
            ),
        ],
        sections: vec![
            Section {
                title: "Ingresos por categoría".to_string(),
                entries: breakdown_entries(&report.ingresos_por_categoria),
            },
            Section {
                title: "Egresos por categoría".to_string(),
                entries: breakdown_entries(&report.egresos_por_categoria),
            },
        ],
    }
}

pub(crate) fn inventory_document(report: &InventoryReport) -> Document {
    let stock_bajo: Vec<Entry> = report
        .productos
        .iter()
        .filter(|p| p.estado == StockStatus::StockBajo)
        .map(|p| Entry {
            label: p.nombre.clone(),
            amount: format_currency(p.valor),
            detail: Some(format!("{} en stock", p.cantidad)),
        })
        .collect();
    let sin_movimiento: Vec<Entry> = report
        .sin_movimiento
        .iter()
        .map(|p| Entry {
            label: p.nombre.clone(),
            amount: format_currency(p.valor),
            detail: Some(format!("{} en stock", p.cantidad)),
        })
        .collect();

    Document {
        title: "Reporte de Inventario".to_string(),
        periodo: report.periodo,
        metrics: vec![
            metric(
                "Valor del inventario",
                format_currency(report.resumen.valor_inventario),
                MetricColor::Accent,
            ),
            metric(
                "Total de productos",
                report.resumen.total_productos.to_string(),
                MetricColor::Neutral,
            ),
            metric(
                "Sin stock",
                report.resumen.sin_stock.to_string(),
                MetricColor::Negative,
            ),
            metric(
                "Stock bajo",
                report.resumen.stock_bajo.to_string(),
                MetricColor::Neutral,
            ),
        ],
        sections: vec![
            Section {
                title: "Stock bajo".to_string(),
                entries: stock_bajo,
            },
            Section {
                title: "Productos sin movimiento".to_string(),
                entries: sin_movimiento,
            },
        ],
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Rough centering for the builtin Helvetica metrics.
fn centered_x(text: &str, size: f32) -> Mm {
    let approx_width = text.chars().count() as f32 * size * 0.176;
    Mm(((WIDTH.0 - approx_width) / 2.0).max(LEFT.0))
}

struct Layout<'a> {
    doc: &'a PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    y: f32,
}

impl Layout<'_> {
    fn break_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(WIDTH, HEIGHT, format!("layer{}", self.pages.len()));
        self.pages.push((page, layer));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP.0;
    }
}

/// Lays out the document and returns the PDF bytes.
///
/// Pass 1 places all content, page-breaking as needed; pass 2 stamps the
/// footers, since `Página X de Y` needs the final page count.
pub(crate) fn render_document(document: &Document) -> Result<Vec<u8>, RenderError> {
    let pdf_err = |e: printpdf::Error| RenderError::Pdf(e.to_string());

    let (doc, first_page, first_layer) = PdfDocument::new(&document.title, WIDTH, HEIGHT, "layer");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    // Pass 1: content layout. The page list is all that survives it.
    let pages = {
        let mut layout = Layout {
            doc: &doc,
            pages: vec![(first_page, first_layer)],
            layer: doc.get_page(first_page).get_layer(first_layer),
            y: TOP.0,
        };

        render_heading(&mut layout, document, &bold, &font);
        render_summary_panel(&mut layout, &document.metrics, &font, &bold);
        for section in &document.sections {
            render_section(&mut layout, section, &font, &bold);
        }
        layout.pages
    };

    // Pass 2: footers, now that the page count is final.
    stamp_footers(&doc, &pages, &font);

    let mut bytes: Vec<u8> = Vec::new();
    let mut writer = BufWriter::new(&mut bytes);
    doc.save(&mut writer).map_err(pdf_err)?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn render_heading(
    layout: &mut Layout<'_>,
    document: &Document,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
) {
    layout.layer.set_fill_color(text_color());
    layout.layer.use_text(
        &document.title,
        TITLE_SIZE,
        centered_x(&document.title, TITLE_SIZE),
        Mm(layout.y),
        bold,
    );
    layout.y -= 9.0;

    let subtitle = format!(
        "Período: {} - {}",
        document.periodo.fecha_inicio.format("%d/%m/%Y"),
        document.periodo.fecha_fin.format("%d/%m/%Y")
    );
    layout.layer.set_fill_color(muted_color());
    layout.layer.use_text(
        &subtitle,
        SUBTITLE_SIZE,
        centered_x(&subtitle, SUBTITLE_SIZE),
        Mm(layout.y),
        font,
    );
    layout.y -= 12.0;
}

fn render_summary_panel(
    layout: &mut Layout<'_>,
    metrics: &[Metric],
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let panel_height = metrics.len() as f32 * ROW_HEIGHT + 2.0 * PANEL_PADDING;

    layout.layer.set_fill_color(panel_color());
    layout.layer.add_rect(
        Rect::new(LEFT, Mm(layout.y - panel_height), RIGHT, Mm(layout.y))
            .with_mode(PaintMode::Fill),
    );

    let mut metric_y = layout.y - PANEL_PADDING - 4.0;
    for metric in metrics {
        layout.layer.set_fill_color(metric.color.color());
        layout.layer.use_text(
            &metric.label,
            TEXT_SIZE,
            Mm(LEFT.0 + PANEL_PADDING),
            Mm(metric_y),
            font,
        );
        layout
            .layer
            .use_text(&metric.value, TEXT_SIZE, Mm(105.0), Mm(metric_y), bold);
        metric_y -= ROW_HEIGHT;
    }

    layout.layer.set_fill_color(text_color());
    layout.y -= panel_height + 10.0;
}

fn render_section(
    layout: &mut Layout<'_>,
    section: &Section,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    if section.entries.is_empty() {
        return;
    }
    if layout.y < SECTION_BREAK_Y {
        layout.break_page();
    }

    layout.layer.set_fill_color(text_color());
    layout
        .layer
        .use_text(&section.title, SECTION_TITLE_SIZE, LEFT, Mm(layout.y), bold);
    layout.y -= 8.0;

    for (idx, entry) in section.entries.iter().take(SECTION_DISPLAY_CAP).enumerate() {
        if layout.y < CONTENT_FLOOR {
            layout.break_page();
        }
        layout.layer.set_fill_color(text_color());
        layout.layer.use_text(
            format!("{}. {}", idx + 1, entry.label),
            TEXT_SIZE,
            Mm(LEFT.0 + 2.0),
            Mm(layout.y),
            font,
        );
        layout
            .layer
            .use_text(&entry.amount, TEXT_SIZE, AMOUNT_X, Mm(layout.y), font);
        if let Some(detail) = &entry.detail {
            layout.layer.set_fill_color(muted_color());
            layout
                .layer
                .use_text(detail, TEXT_SIZE, DETAIL_X, Mm(layout.y), font);
        }
        layout.y -= ROW_HEIGHT;
    }

    layout.y -= 6.0;
}

/// Second pass: footer on every page, after the page count is final.
fn stamp_footers(
    doc: &PdfDocumentReference,
    pages: &[(PdfPageIndex, PdfLayerIndex)],
    font: &IndirectFontRef,
) {
    let total = pages.len();
    let stamp = chrono::Local::now().format("%d/%m/%Y %H:%M").to_string();

    for (i, (page, layer)) in pages.iter().enumerate() {
        let layer = doc.get_page(*page).get_layer(*layer);
        layer.set_fill_color(muted_color());
        layer.use_text(
            format!("Página {} de {}", i + 1, total),
            FOOTER_SIZE,
            LEFT,
            BOTTOM,
            font,
        );
        layer.use_text(
            format!("Generado el {stamp}"),
            FOOTER_SIZE,
            Mm(RIGHT.0 - 50.0),
            BOTTOM,
            font,
        );
    }
}
