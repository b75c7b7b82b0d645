//! Movement filtering and summary aggregation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{Movement, MovementKind};

/// Filter specification for the movement ledger.
///
/// All fields are optional; an absent field does not constrain the result.
/// The combined filter is the logical AND of the individual predicates.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Exact kind match; `None` means all kinds.
    pub tipo: Option<MovementKind>,
    /// Inclusive lower date bound.
    pub fecha_desde: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub fecha_hasta: Option<NaiveDate>,
    /// Case-insensitive substring, matched against the description, the
    /// kind label, the stringified amount, and the origin label.
    pub texto: Option<String>,
}

impl MovementFilter {
    /// Whether a movement passes every predicate of this filter.
    #[must_use]
    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(tipo) = self.tipo
            && movement.tipo() != tipo
        {
            return false;
        }
        if let Some(desde) = self.fecha_desde
            && movement.fecha < desde
        {
            return false;
        }
        if let Some(hasta) = self.fecha_hasta
            && movement.fecha > hasta
        {
            return false;
        }
        if let Some(texto) = &self.texto
            && !matches_text(movement, texto)
        {
            return false;
        }
        true
    }
}

/// Case-insensitive OR match across the searchable fields of a movement.
fn matches_text(movement: &Movement, texto: &str) -> bool {
    let needle = texto.to_lowercase();

    movement
        .descripcion
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(&needle))
        || movement.tipo().label().to_lowercase().contains(&needle)
        || movement.monto.to_string().contains(&needle)
        || movement.origen_label().to_lowercase().contains(&needle)
}

/// Summary aggregates over a filtered movement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovementSummary {
    /// Sum of inflow amounts (incomes and sales).
    pub ingresos: Decimal,
    /// Sum of outflow amounts (expenses and purchases).
    pub egresos: Decimal,
    /// `ingresos - egresos`.
    pub neto: Decimal,
    /// Count of filtered movements.
    pub total: u64,
}

impl MovementSummary {
    /// The all-zero summary of an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ingresos: Decimal::ZERO,
            egresos: Decimal::ZERO,
            neto: Decimal::ZERO,
            total: 0,
        }
    }
}

/// A filtered movement list together with its summary.
#[derive(Debug, Clone)]
pub struct MovementLedger {
    /// Movements passing the filter, input order preserved.
    pub filtered: Vec<Movement>,
    /// Aggregates over the filtered set only.
    pub summary: MovementSummary,
}

/// Applies a filter and computes summary aggregates over the survivors.
///
/// Deterministic: fixed input and filter always produce the same output.
/// An empty filtered set yields the all-zero summary.
#[must_use]
pub fn filter_and_summarize(movements: Vec<Movement>, filter: &MovementFilter) -> MovementLedger {
    let filtered: Vec<Movement> = movements.into_iter().filter(|m| filter.matches(m)).collect();

    let mut summary = MovementSummary::empty();
    for movement in &filtered {
        if movement.tipo().is_inflow() {
            summary.ingresos += movement.monto;
        } else {
            summary.egresos += movement.monto;
        }
    }
    summary.neto = summary.ingresos - summary.egresos;
    summary.total = filtered.len() as u64;

    MovementLedger { filtered, summary }
}
