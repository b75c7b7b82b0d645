//! Report payload types.
//!
//! Wire names keep the product's Spanish vocabulary (`totalIngresos`,
//! `ingresosPorCategoria`, ...) via camelCase renaming. Grouped
//! collections are insertion-ordered maps so key order is first-occurrence
//! order regardless of the native map implementation.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ranking length for the ventas/compras Top-N lists.
pub const TOP_ITEMS: usize = 10;
/// List length for the inventario immobilized-products list.
pub const IMMOBILIZED_ITEMS: usize = 20;

/// Inclusive report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Periodo {
    /// Inclusive start date.
    pub fecha_inicio: NaiveDate,
    /// Inclusive end date.
    pub fecha_fin: NaiveDate,
}

/// One entry of a Top-N ranking: grouped totals under a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    /// Display label (product, client, or supplier name).
    pub nombre: String,
    /// Grouped count: units for products, row count for counterparts.
    pub cantidad: u64,
    /// Grouped monetary total; the ranking sort key.
    pub total: Decimal,
    /// Distinct secondary attributes, in first-seen order (e.g. which
    /// suppliers carried a product).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detalles: Vec<String>,
}

/// Sales report thresholds, injected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesTargets {
    /// A sale at or above this amount counts as a high-value sale.
    pub venta_alta: Decimal,
    /// Monthly sales goal for the goal-progress percentage.
    pub meta_mensual: Decimal,
}

impl Default for SalesTargets {
    fn default() -> Self {
        Self {
            venta_alta: Decimal::from(50_000),
            meta_mensual: Decimal::from(500_000),
        }
    }
}

/// Sales report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    /// Sum of sale totals in the period.
    pub total_ventas: Decimal,
    /// Number of sales.
    pub cantidad_ventas: u64,
    /// `total_ventas / cantidad_ventas`, 0 for an empty period.
    pub promedio_venta: Decimal,
    /// Sales at or above the configured high-value threshold.
    pub ventas_altas: u64,
    /// Percentage of the configured monthly goal, 0 when the goal is 0.
    pub avance_meta: Decimal,
}

/// Sales report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// Report period.
    pub periodo: Periodo,
    /// Summary block.
    pub resumen: SalesSummary,
    /// Top products by revenue.
    pub top_productos: Vec<RankedItem>,
    /// Top clients by amount.
    pub top_clientes: Vec<RankedItem>,
    /// Totals per sale-type tag, first-occurrence order.
    pub ventas_por_tipo: IndexMap<String, Decimal>,
}

/// Purchases report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesSummary {
    /// Sum of purchase totals in the period.
    pub total_compras: Decimal,
    /// Number of purchases.
    pub cantidad_compras: u64,
    /// `total_compras / cantidad_compras`, 0 for an empty period.
    pub promedio_compra: Decimal,
}

/// Purchases report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesReport {
    /// Report period.
    pub periodo: Periodo,
    /// Summary block.
    pub resumen: PurchasesSummary,
    /// Top purchased products; `detalles` lists the distinct suppliers
    /// that carried each product.
    pub top_productos: Vec<RankedItem>,
    /// Top suppliers by amount.
    pub top_proveedores: Vec<RankedItem>,
    /// Totals per supplier, first-occurrence order.
    pub compras_por_proveedor: IndexMap<String, Decimal>,
}

/// Income-vs-expense report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeExpenseSummary {
    /// Sum of income amounts.
    pub total_ingresos: Decimal,
    /// Sum of expense amounts.
    pub total_egresos: Decimal,
    /// `total_ingresos - total_egresos`.
    pub balance: Decimal,
    /// Number of income rows.
    pub cantidad_ingresos: u64,
    /// Number of expense rows.
    pub cantidad_egresos: u64,
}

/// One day of the income-vs-expense detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlow {
    /// Calendar day.
    pub fecha: NaiveDate,
    /// Income total for the day.
    pub ingresos: Decimal,
    /// Expense total for the day.
    pub egresos: Decimal,
    /// `ingresos - egresos` for the day.
    pub neto: Decimal,
}

/// Income-vs-expense report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeExpenseReport {
    /// Report period.
    pub periodo: Periodo,
    /// Summary block.
    pub resumen: IncomeExpenseSummary,
    /// Income totals per category label, first-occurrence order.
    pub ingresos_por_categoria: IndexMap<String, Decimal>,
    /// Expense totals per category label, first-occurrence order.
    pub egresos_por_categoria: IndexMap<String, Decimal>,
    /// Per-day flows, date ascending.
    pub detalle_por_dia: Vec<DailyFlow>,
}

/// Mutually exclusive stock classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    /// Quantity is exactly 0.
    #[serde(rename = "Sin Stock")]
    SinStock,
    /// 0 < quantity <= 10.
    #[serde(rename = "Stock Bajo")]
    StockBajo,
    /// Quantity > 100.
    #[serde(rename = "Stock Alto")]
    StockAlto,
    /// Everything else.
    Normal,
}

impl StockStatus {
    const LOW_THRESHOLD: i64 = 10;
    const HIGH_THRESHOLD: i64 = 100;

    /// Classifies a stock quantity into exactly one state.
    #[must_use]
    pub const fn classify(cantidad: i64) -> Self {
        if cantidad == 0 {
            Self::SinStock
        } else if cantidad <= Self::LOW_THRESHOLD {
            Self::StockBajo
        } else if cantidad > Self::HIGH_THRESHOLD {
            Self::StockAlto
        } else {
            Self::Normal
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SinStock => "Sin Stock",
            Self::StockBajo => "Stock Bajo",
            Self::StockAlto => "Stock Alto",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One product of the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    /// Product name.
    pub nombre: String,
    /// Current stock on hand.
    pub cantidad: i64,
    /// Unit price.
    pub precio: Decimal,
    /// Immobilized value: `cantidad * precio`.
    pub valor: Decimal,
    /// Stock classification.
    pub estado: StockStatus,
    /// Units sold inside the period.
    pub vendidos: i64,
    /// Rotation ratio: `vendidos / cantidad`, 0 when `cantidad` is 0.
    pub rotacion: Decimal,
}

/// Inventory report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Number of products.
    pub total_productos: u64,
    /// Sum of stock quantities.
    pub unidades_totales: i64,
    /// Sum of immobilized values.
    pub valor_inventario: Decimal,
    /// Products with no stock.
    pub sin_stock: u64,
    /// Products with low stock.
    pub stock_bajo: u64,
    /// Products with high stock.
    pub stock_alto: u64,
}

/// Inventory report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    /// Report period.
    pub periodo: Periodo,
    /// Summary block.
    pub resumen: InventorySummary,
    /// Every product with its classification and rotation, input order.
    pub productos: Vec<ProductStock>,
    /// Products with zero movement in the period, by immobilized value
    /// descending, capped at [`IMMOBILIZED_ITEMS`].
    pub sin_movimiento: Vec<ProductStock>,
}
