//! Row shapes produced by the store read contract.
//!
//! Repositories return these instead of raw entities: rows scoped to one
//! owner and an inclusive date window, ordered by date ascending, with the
//! relation names (category, client, supplier, line items) already
//! resolved. Any persistence engine that can produce them is
//! substitutable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

/// An income row with its category name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRecord {
    /// Row ID.
    pub id: Uuid,
    /// Transaction date.
    pub fecha: NaiveDate,
    /// Non-negative amount.
    pub monto: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Category name, when the income is categorized.
    pub categoria: Option<String>,
}

/// An expense row with its category names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Row ID.
    pub id: Uuid,
    /// Transaction date.
    pub fecha: NaiveDate,
    /// Non-negative amount.
    pub monto: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Specific category name, when the expense is categorized.
    pub categoria: Option<String>,
    /// Free-text general category, used when no specific category is set.
    pub categoria_general: Option<String>,
}

/// A sale row with client name and line items resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    /// Row ID.
    pub id: Uuid,
    /// Sale date.
    pub fecha: NaiveDate,
    /// Sale total (sum of line-item subtotals).
    pub total: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Client name, when a client is attached.
    pub cliente: Option<String>,
    /// Sale type tag (e.g. "producto" / "servicio").
    pub tipo: Option<String>,
    /// Line items.
    pub items: Vec<SaleItemRecord>,
}

/// A sale line item with its product name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItemRecord {
    /// Product name at sale time.
    pub producto: String,
    /// Units sold.
    pub cantidad: i64,
    /// Unit price.
    pub precio_unitario: Decimal,
    /// Line subtotal.
    pub subtotal: Decimal,
}

/// A purchase row with supplier name and line items resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    /// Row ID.
    pub id: Uuid,
    /// Purchase date.
    pub fecha: NaiveDate,
    /// Purchase total (sum of line-item subtotals).
    pub total: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Supplier name, when a supplier is attached.
    pub proveedor: Option<String>,
    /// Line items.
    pub items: Vec<PurchaseItemRecord>,
}

/// A purchase line item with its product name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItemRecord {
    /// Product name at purchase time.
    pub producto: String,
    /// Units bought.
    pub cantidad: i64,
    /// Unit price.
    pub precio_unitario: Decimal,
    /// Line subtotal.
    pub subtotal: Decimal,
}

/// A product row with its in-period sales activity resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductActivity {
    /// Row ID.
    pub id: Uuid,
    /// Product name.
    pub nombre: String,
    /// Current stock on hand.
    pub cantidad: i64,
    /// Unit price.
    pub precio: Decimal,
    /// Units sold inside the report period.
    pub vendidos: i64,
}
