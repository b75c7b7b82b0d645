//! Movement normalization.

use crate::records::{ExpenseRecord, IncomeRecord, PurchaseRecord, SaleRecord};

use super::types::Movement;

/// The four independently fetched source collections, each already scoped
/// to one owner (and optionally a date range) by the store.
#[derive(Debug, Clone, Default)]
pub struct MovementSources {
    /// Income rows.
    pub ingresos: Vec<IncomeRecord>,
    /// Expense rows.
    pub egresos: Vec<ExpenseRecord>,
    /// Sale rows.
    pub ventas: Vec<SaleRecord>,
    /// Purchase rows.
    pub compras: Vec<PurchaseRecord>,
}

/// Projects the four source collections into one movement list.
///
/// Pure transform: no side effects, deterministic for a fixed input.
/// Output is ordered by date ascending; ties keep source-collection order
/// (incomes, expenses, sales, purchases).
#[must_use]
pub fn normalize(sources: MovementSources) -> Vec<Movement> {
    let mut movements = Vec::with_capacity(
        sources.ingresos.len()
            + sources.egresos.len()
            + sources.ventas.len()
            + sources.compras.len(),
    );

    movements.extend(sources.ingresos.into_iter().map(Movement::from_ingreso));
    movements.extend(sources.egresos.into_iter().map(Movement::from_egreso));
    movements.extend(sources.ventas.into_iter().map(Movement::from_venta));
    movements.extend(sources.compras.into_iter().map(Movement::from_compra));

    // Stable sort: equal dates keep insertion order.
    movements.sort_by_key(|m| m.fecha);
    movements
}
