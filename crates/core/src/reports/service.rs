//! Report builders.
//!
//! Every monetary aggregate is the sum of its constituent line items, every
//! average guards a zero denominator, and every ranking is stably sorted so
//! ties keep first-seen order.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::movements::types::{
    CLIENTE_NO_ESPECIFICADO, PROVEEDOR_NO_ESPECIFICADO, SIN_CATEGORIA,
};
use crate::records::{ExpenseRecord, IncomeRecord, ProductActivity, PurchaseRecord, SaleRecord};

use super::types::{
    DailyFlow, IMMOBILIZED_ITEMS, IncomeExpenseReport, IncomeExpenseSummary, InventoryReport,
    InventorySummary, Periodo, ProductStock, PurchasesReport, PurchasesSummary, RankedItem,
    SalesReport, SalesSummary, SalesTargets, StockStatus, TOP_ITEMS,
};

/// Fallback label for sales without a type tag.
pub const SIN_TIPO: &str = "Sin tipo";

/// Grouped totals accumulated under a display label.
#[derive(Debug, Default)]
struct GroupAcc {
    cantidad: u64,
    total: Decimal,
    detalles: Vec<String>,
}

impl GroupAcc {
    fn add(&mut self, cantidad: u64, total: Decimal) {
        self.cantidad += cantidad;
        self.total += total;
    }

    fn note_detail(&mut self, detail: &str) {
        if !self.detalles.iter().any(|d| d == detail) {
            self.detalles.push(detail.to_string());
        }
    }
}

/// Turns grouped totals into a descending Top-N ranking.
///
/// `Vec::sort_by` is stable, so entries with equal totals keep the
/// first-occurrence order of the underlying `IndexMap`.
fn top_n(groups: IndexMap<String, GroupAcc>, n: usize) -> Vec<RankedItem> {
    let mut items: Vec<RankedItem> = groups
        .into_iter()
        .map(|(nombre, acc)| RankedItem {
            nombre,
            cantidad: acc.cantidad,
            total: acc.total,
            detalles: acc.detalles,
        })
        .collect();

    items.sort_by(|a, b| b.total.cmp(&a.total));
    items.truncate(n);
    items
}

/// `total / count`, 0 when `count` is 0.
fn promedio(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

#[allow(clippy::cast_sign_loss)]
fn units(cantidad: i64) -> u64 {
    cantidad.max(0) as u64
}

/// Builds the sales report payload.
#[must_use]
pub fn build_sales_report(
    periodo: Periodo,
    ventas: &[SaleRecord],
    targets: &SalesTargets,
) -> SalesReport {
    let total_ventas: Decimal = ventas.iter().map(|v| v.total).sum();
    let cantidad_ventas = ventas.len() as u64;
    let ventas_altas = ventas
        .iter()
        .filter(|v| v.total >= targets.venta_alta)
        .count() as u64;
    let avance_meta = if targets.meta_mensual.is_zero() {
        Decimal::ZERO
    } else {
        (total_ventas / targets.meta_mensual) * Decimal::ONE_HUNDRED
    };

    let mut productos: IndexMap<String, GroupAcc> = IndexMap::new();
    let mut clientes: IndexMap<String, GroupAcc> = IndexMap::new();
    let mut ventas_por_tipo: IndexMap<String, Decimal> = IndexMap::new();

    for venta in ventas {
        for item in &venta.items {
            productos
                .entry(item.producto.clone())
                .or_default()
                .add(units(item.cantidad), item.subtotal);
        }

        let cliente = venta.cliente.as_deref().unwrap_or(CLIENTE_NO_ESPECIFICADO);
        clientes
            .entry(cliente.to_string())
            .or_default()
            .add(1, venta.total);

        let tipo = venta.tipo.as_deref().unwrap_or(SIN_TIPO);
        *ventas_por_tipo
            .entry(tipo.to_string())
            .or_insert(Decimal::ZERO) += venta.total;
    }

    SalesReport {
        periodo,
        resumen: SalesSummary {
            total_ventas,
            cantidad_ventas,
            promedio_venta: promedio(total_ventas, cantidad_ventas),
            ventas_altas,
            avance_meta,
        },
        top_productos: top_n(productos, TOP_ITEMS),
        top_clientes: top_n(clientes, TOP_ITEMS),
        ventas_por_tipo,
    }
}

/// Builds the purchases report payload.
#[must_use]
pub fn build_purchases_report(periodo: Periodo, compras: &[PurchaseRecord]) -> PurchasesReport {
    let total_compras: Decimal = compras.iter().map(|c| c.total).sum();
    let cantidad_compras = compras.len() as u64;

    let mut productos: IndexMap<String, GroupAcc> = IndexMap::new();
    let mut proveedores: IndexMap<String, GroupAcc> = IndexMap::new();
    let mut compras_por_proveedor: IndexMap<String, Decimal> = IndexMap::new();

    for compra in compras {
        let proveedor = compra
            .proveedor
            .as_deref()
            .unwrap_or(PROVEEDOR_NO_ESPECIFICADO);

        for item in &compra.items {
            let acc = productos.entry(item.producto.clone()).or_default();
            acc.add(units(item.cantidad), item.subtotal);
            acc.note_detail(proveedor);
        }

        proveedores
            .entry(proveedor.to_string())
            .or_default()
            .add(1, compra.total);
        *compras_por_proveedor
            .entry(proveedor.to_string())
            .or_insert(Decimal::ZERO) += compra.total;
    }

    PurchasesReport {
        periodo,
        resumen: PurchasesSummary {
            total_compras,
            cantidad_compras,
            promedio_compra: promedio(total_compras, cantidad_compras),
        },
        top_productos: top_n(productos, TOP_ITEMS),
        top_proveedores: top_n(proveedores, TOP_ITEMS),
        compras_por_proveedor,
    }
}

/// Builds the income-vs-expense report payload.
#[must_use]
pub fn build_income_expense_report(
    periodo: Periodo,
    ingresos: &[IncomeRecord],
    egresos: &[ExpenseRecord],
) -> IncomeExpenseReport {
    let total_ingresos: Decimal = ingresos.iter().map(|i| i.monto).sum();
    let total_egresos: Decimal = egresos.iter().map(|e| e.monto).sum();

    let mut ingresos_por_categoria: IndexMap<String, Decimal> = IndexMap::new();
    for ingreso in ingresos {
        let categoria = ingreso.categoria.as_deref().unwrap_or(SIN_CATEGORIA);
        *ingresos_por_categoria
            .entry(categoria.to_string())
            .or_insert(Decimal::ZERO) += ingreso.monto;
    }

    let mut egresos_por_categoria: IndexMap<String, Decimal> = IndexMap::new();
    for egreso in egresos {
        let categoria = egreso
            .categoria
            .as_deref()
            .or(egreso.categoria_general.as_deref())
            .unwrap_or(SIN_CATEGORIA);
        *egresos_por_categoria
            .entry(categoria.to_string())
            .or_insert(Decimal::ZERO) += egreso.monto;
    }

    // BTreeMap keeps the per-day detail in ascending date order.
    let mut dias: BTreeMap<chrono::NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for ingreso in ingresos {
        dias.entry(ingreso.fecha).or_default().0 += ingreso.monto;
    }
    for egreso in egresos {
        dias.entry(egreso.fecha).or_default().1 += egreso.monto;
    }

    let detalle_por_dia = dias
        .into_iter()
        .map(|(fecha, (dia_ingresos, dia_egresos))| DailyFlow {
            fecha,
            ingresos: dia_ingresos,
            egresos: dia_egresos,
            neto: dia_ingresos - dia_egresos,
        })
        .collect();

    IncomeExpenseReport {
        periodo,
        resumen: IncomeExpenseSummary {
            total_ingresos,
            total_egresos,
            balance: total_ingresos - total_egresos,
            cantidad_ingresos: ingresos.len() as u64,
            cantidad_egresos: egresos.len() as u64,
        },
        ingresos_por_categoria,
        egresos_por_categoria,
        detalle_por_dia,
    }
}

/// Builds the inventory report payload.
#[must_use]
pub fn build_inventory_report(periodo: Periodo, productos: &[ProductActivity]) -> InventoryReport {
    let clasificados: Vec<ProductStock> = productos
        .iter()
        .map(|p| {
            let valor = Decimal::from(p.cantidad) * p.precio;
            let rotacion = if p.cantidad == 0 {
                Decimal::ZERO
            } else {
                Decimal::from(p.vendidos) / Decimal::from(p.cantidad)
            };
            ProductStock {
                nombre: p.nombre.clone(),
                cantidad: p.cantidad,
                precio: p.precio,
                valor,
                estado: StockStatus::classify(p.cantidad),
                vendidos: p.vendidos,
                rotacion,
            }
        })
        .collect();

    let resumen = InventorySummary {
        total_productos: clasificados.len() as u64,
        unidades_totales: clasificados.iter().map(|p| p.cantidad).sum(),
        valor_inventario: clasificados.iter().map(|p| p.valor).sum(),
        sin_stock: count_status(&clasificados, StockStatus::SinStock),
        stock_bajo: count_status(&clasificados, StockStatus::StockBajo),
        stock_alto: count_status(&clasificados, StockStatus::StockAlto),
    };

    let mut sin_movimiento: Vec<ProductStock> = clasificados
        .iter()
        .filter(|p| p.vendidos == 0)
        .cloned()
        .collect();
    sin_movimiento.sort_by(|a, b| b.valor.cmp(&a.valor));
    sin_movimiento.truncate(IMMOBILIZED_ITEMS);

    InventoryReport {
        periodo,
        resumen,
        productos: clasificados,
        sin_movimiento,
    }
}

fn count_status(productos: &[ProductStock], estado: StockStatus) -> u64 {
    productos.iter().filter(|p| p.estado == estado).count() as u64
}
