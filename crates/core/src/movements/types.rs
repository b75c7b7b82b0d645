//! Movement types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{ExpenseRecord, IncomeRecord, PurchaseRecord, SaleRecord};

/// Fallback origin label for uncategorized incomes and expenses.
pub const SIN_CATEGORIA: &str = "Sin categoría";
/// Fallback origin label for sales without a client.
pub const CLIENTE_NO_ESPECIFICADO: &str = "Cliente no especificado";
/// Fallback origin label for purchases without a supplier.
pub const PROVEEDOR_NO_ESPECIFICADO: &str = "Proveedor no especificado";

/// Movement discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Income row.
    Ingreso,
    /// Expense row.
    Egreso,
    /// Sale row.
    Venta,
    /// Purchase row.
    Compra,
}

impl MovementKind {
    /// Display label, as shown in the ledger and matched by the text filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ingreso => "Ingreso",
            Self::Egreso => "Egreso",
            Self::Venta => "Venta",
            Self::Compra => "Compra",
        }
    }

    /// Whether the kind contributes positively to the net balance.
    ///
    /// Incomes and sales are inflows; expenses and purchases are outflows.
    #[must_use]
    pub const fn is_inflow(self) -> bool {
        matches!(self, Self::Ingreso | Self::Venta)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ingreso" => Ok(Self::Ingreso),
            "Egreso" => Ok(Self::Egreso),
            "Venta" => Ok(Self::Venta),
            "Compra" => Ok(Self::Compra),
            _ => Err(format!("Unknown movement kind: {s}")),
        }
    }
}

/// The source record behind a movement.
///
/// One variant per kind: a movement carries exactly one source reference
/// and its discriminant is derived from it, so the two can never disagree.
/// Adding a fifth kind fails to compile until every consumer handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementSource {
    /// Income source record.
    Ingreso(IncomeRecord),
    /// Expense source record.
    Egreso(ExpenseRecord),
    /// Sale source record.
    Venta(SaleRecord),
    /// Purchase source record.
    Compra(PurchaseRecord),
}

/// Normalized, read-only projection of a transactional record.
///
/// Identity is `(tipo, id)`; the id is the underlying source record's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    /// Identifier of the underlying source record.
    pub id: Uuid,
    /// Transaction date.
    pub fecha: NaiveDate,
    /// Non-negative amount; sign is inferred from the kind at display time.
    pub monto: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// The original source record.
    pub origen: MovementSource,
}

impl Movement {
    /// Builds a movement from an income row.
    #[must_use]
    pub fn from_ingreso(record: IncomeRecord) -> Self {
        Self {
            id: record.id,
            fecha: record.fecha,
            monto: record.monto,
            descripcion: record.descripcion.clone(),
            origen: MovementSource::Ingreso(record),
        }
    }

    /// Builds a movement from an expense row.
    #[must_use]
    pub fn from_egreso(record: ExpenseRecord) -> Self {
        Self {
            id: record.id,
            fecha: record.fecha,
            monto: record.monto,
            descripcion: record.descripcion.clone(),
            origen: MovementSource::Egreso(record),
        }
    }

    /// Builds a movement from a sale row.
    #[must_use]
    pub fn from_venta(record: SaleRecord) -> Self {
        Self {
            id: record.id,
            fecha: record.fecha,
            monto: record.total,
            descripcion: record.descripcion.clone(),
            origen: MovementSource::Venta(record),
        }
    }

    /// Builds a movement from a purchase row.
    #[must_use]
    pub fn from_compra(record: PurchaseRecord) -> Self {
        Self {
            id: record.id,
            fecha: record.fecha,
            monto: record.total,
            descripcion: record.descripcion.clone(),
            origen: MovementSource::Compra(record),
        }
    }

    /// The movement discriminant, derived from the source record.
    #[must_use]
    pub const fn tipo(&self) -> MovementKind {
        match &self.origen {
            MovementSource::Ingreso(_) => MovementKind::Ingreso,
            MovementSource::Egreso(_) => MovementKind::Egreso,
            MovementSource::Venta(_) => MovementKind::Venta,
            MovementSource::Compra(_) => MovementKind::Compra,
        }
    }

    /// Human-readable counterpart/category label, varying by kind.
    #[must_use]
    pub fn origen_label(&self) -> &str {
        match &self.origen {
            MovementSource::Ingreso(r) => r.categoria.as_deref().unwrap_or(SIN_CATEGORIA),
            MovementSource::Egreso(r) => r
                .categoria
                .as_deref()
                .or(r.categoria_general.as_deref())
                .unwrap_or(SIN_CATEGORIA),
            MovementSource::Venta(r) => r.cliente.as_deref().unwrap_or(CLIENTE_NO_ESPECIFICADO),
            MovementSource::Compra(r) => {
                r.proveedor.as_deref().unwrap_or(PROVEEDOR_NO_ESPECIFICADO)
            }
        }
    }

    /// Type-specific secondary string: the sale-type tag for sales, the
    /// row's own description otherwise.
    #[must_use]
    pub fn detalle(&self) -> Option<&str> {
        match &self.origen {
            MovementSource::Venta(r) => r.tipo.as_deref(),
            MovementSource::Ingreso(_) | MovementSource::Egreso(_) | MovementSource::Compra(_) => {
                self.descripcion.as_deref()
            }
        }
    }
}
