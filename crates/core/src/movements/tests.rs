//! Tests for the movement normalizer and aggregator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::records::{ExpenseRecord, IncomeRecord, PurchaseRecord, SaleRecord};

use super::filter::{MovementFilter, filter_and_summarize};
use super::normalize::{MovementSources, normalize};
use super::types::{Movement, MovementKind, MovementSource};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ingreso(monto: Decimal, fecha: NaiveDate, categoria: Option<&str>) -> IncomeRecord {
    IncomeRecord {
        id: Uuid::new_v4(),
        fecha,
        monto,
        descripcion: None,
        categoria: categoria.map(String::from),
    }
}

fn egreso(monto: Decimal, fecha: NaiveDate, categoria: Option<&str>) -> ExpenseRecord {
    ExpenseRecord {
        id: Uuid::new_v4(),
        fecha,
        monto,
        descripcion: None,
        categoria: categoria.map(String::from),
        categoria_general: None,
    }
}

fn venta(total: Decimal, fecha: NaiveDate, cliente: Option<&str>) -> SaleRecord {
    SaleRecord {
        id: Uuid::new_v4(),
        fecha,
        total,
        descripcion: None,
        cliente: cliente.map(String::from),
        tipo: Some("producto".to_string()),
        items: vec![],
    }
}

fn compra(total: Decimal, fecha: NaiveDate, proveedor: Option<&str>) -> PurchaseRecord {
    PurchaseRecord {
        id: Uuid::new_v4(),
        fecha,
        total,
        descripcion: None,
        proveedor: proveedor.map(String::from),
        items: vec![],
    }
}

fn sample_movements() -> Vec<Movement> {
    normalize(MovementSources {
        ingresos: vec![ingreso(dec!(1000), date(2024, 1, 5), Some("Ventas"))],
        egresos: vec![egreso(dec!(400), date(2024, 1, 10), Some("Alquiler"))],
        ventas: vec![venta(dec!(2500), date(2024, 1, 7), Some("ACME SRL"))],
        compras: vec![compra(dec!(800), date(2024, 1, 20), Some("Distribuidora Sur"))],
    })
}

#[test]
fn test_normalize_orders_by_date_ascending() {
    let movements = sample_movements();
    let fechas: Vec<NaiveDate> = movements.iter().map(|m| m.fecha).collect();
    assert_eq!(
        fechas,
        vec![
            date(2024, 1, 5),
            date(2024, 1, 7),
            date(2024, 1, 10),
            date(2024, 1, 20)
        ]
    );
}

#[test]
fn test_normalize_keeps_source_order_on_equal_dates() {
    let day = date(2024, 3, 1);
    let movements = normalize(MovementSources {
        ingresos: vec![ingreso(dec!(1), day, None)],
        egresos: vec![egreso(dec!(2), day, None)],
        ventas: vec![venta(dec!(3), day, None)],
        compras: vec![compra(dec!(4), day, None)],
    });

    let kinds: Vec<MovementKind> = movements.iter().map(Movement::tipo).collect();
    assert_eq!(
        kinds,
        vec![
            MovementKind::Ingreso,
            MovementKind::Egreso,
            MovementKind::Venta,
            MovementKind::Compra
        ]
    );
}

#[test]
fn test_movement_identity_follows_source_record() {
    let record = ingreso(dec!(10), date(2024, 1, 1), None);
    let id = record.id;
    let movement = Movement::from_ingreso(record);
    assert_eq!(movement.id, id);
    assert_eq!(movement.tipo(), MovementKind::Ingreso);
    assert!(matches!(movement.origen, MovementSource::Ingreso(_)));
}

#[test]
fn test_origin_label_fallbacks() {
    let m = Movement::from_ingreso(ingreso(dec!(1), date(2024, 1, 1), None));
    assert_eq!(m.origen_label(), "Sin categoría");

    let m = Movement::from_venta(venta(dec!(1), date(2024, 1, 1), None));
    assert_eq!(m.origen_label(), "Cliente no especificado");

    let m = Movement::from_compra(compra(dec!(1), date(2024, 1, 1), None));
    assert_eq!(m.origen_label(), "Proveedor no especificado");
}

#[test]
fn test_expense_origin_label_falls_back_to_general_category() {
    let mut record = egreso(dec!(1), date(2024, 1, 1), None);
    record.categoria_general = Some("Varios".to_string());
    let m = Movement::from_egreso(record.clone());
    assert_eq!(m.origen_label(), "Varios");

    record.categoria = Some("Servicios".to_string());
    let m = Movement::from_egreso(record);
    assert_eq!(m.origen_label(), "Servicios");
}

#[test]
fn test_sale_detail_is_the_sale_type_tag() {
    let m = Movement::from_venta(venta(dec!(1), date(2024, 1, 1), None));
    assert_eq!(m.detalle(), Some("producto"));
}

#[test]
fn test_summary_over_mixed_kinds() {
    let ledger = filter_and_summarize(sample_movements(), &MovementFilter::default());

    assert_eq!(ledger.summary.ingresos, dec!(3500));
    assert_eq!(ledger.summary.egresos, dec!(1200));
    assert_eq!(ledger.summary.neto, dec!(2300));
    assert_eq!(ledger.summary.total, 4);
}

#[test]
fn test_empty_set_summary_is_all_zeros() {
    let ledger = filter_and_summarize(vec![], &MovementFilter::default());
    assert!(ledger.filtered.is_empty());
    assert_eq!(ledger.summary.ingresos, Decimal::ZERO);
    assert_eq!(ledger.summary.egresos, Decimal::ZERO);
    assert_eq!(ledger.summary.neto, Decimal::ZERO);
    assert_eq!(ledger.summary.total, 0);
}

#[test]
fn test_kind_filter_only_returns_that_kind() {
    let filter = MovementFilter {
        tipo: Some(MovementKind::Ingreso),
        ..MovementFilter::default()
    };
    let ledger = filter_and_summarize(sample_movements(), &filter);

    assert_eq!(ledger.summary.total, 1);
    assert!(
        ledger
            .filtered
            .iter()
            .all(|m| m.tipo() == MovementKind::Ingreso)
    );
}

#[test]
fn test_date_bounds_are_inclusive() {
    let filter = MovementFilter {
        fecha_desde: Some(date(2024, 1, 7)),
        fecha_hasta: Some(date(2024, 1, 10)),
        ..MovementFilter::default()
    };
    let ledger = filter_and_summarize(sample_movements(), &filter);

    let fechas: Vec<NaiveDate> = ledger.filtered.iter().map(|m| m.fecha).collect();
    assert_eq!(fechas, vec![date(2024, 1, 7), date(2024, 1, 10)]);
}

#[test]
fn test_text_filter_matches_origin_label_case_insensitively() {
    let filter = MovementFilter {
        texto: Some("acme".to_string()),
        ..MovementFilter::default()
    };
    let ledger = filter_and_summarize(sample_movements(), &filter);

    assert_eq!(ledger.summary.total, 1);
    assert_eq!(ledger.filtered[0].tipo(), MovementKind::Venta);
}

#[test]
fn test_text_filter_matches_kind_label_and_amount() {
    let by_label = MovementFilter {
        texto: Some("egreso".to_string()),
        ..MovementFilter::default()
    };
    assert_eq!(
        filter_and_summarize(sample_movements(), &by_label).summary.total,
        1
    );

    let by_amount = MovementFilter {
        texto: Some("2500".to_string()),
        ..MovementFilter::default()
    };
    assert_eq!(
        filter_and_summarize(sample_movements(), &by_amount).summary.total,
        1
    );
}

#[test]
fn test_combined_filter_is_logical_and() {
    // Kind alone matches the sale; the date window excludes it.
    let filter = MovementFilter {
        tipo: Some(MovementKind::Venta),
        fecha_desde: Some(date(2024, 1, 8)),
        fecha_hasta: None,
        texto: None,
    };
    let ledger = filter_and_summarize(sample_movements(), &filter);
    assert_eq!(ledger.summary.total, 0);
}

proptest! {
    /// For any movement set and filter, `neto == ingresos - egresos` and
    /// both totals equal the signed sum over exactly the filtered set.
    #[test]
    fn test_summary_consistency(
        montos in prop::collection::vec(1u64..1_000_000, 0..40),
        kind_seed in prop::collection::vec(0u8..4, 0..40),
    ) {
        let fecha = date(2024, 6, 1);
        let movements: Vec<Movement> = montos
            .iter()
            .zip(kind_seed.iter().chain(std::iter::repeat(&0)))
            .map(|(&monto, &k)| {
                let monto = Decimal::from(monto);
                match k {
                    0 => Movement::from_ingreso(ingreso(monto, fecha, None)),
                    1 => Movement::from_egreso(egreso(monto, fecha, None)),
                    2 => Movement::from_venta(venta(monto, fecha, None)),
                    _ => Movement::from_compra(compra(monto, fecha, None)),
                }
            })
            .collect();

        let ledger = filter_and_summarize(movements, &MovementFilter::default());

        let expected_ingresos: Decimal = ledger
            .filtered
            .iter()
            .filter(|m| m.tipo().is_inflow())
            .map(|m| m.monto)
            .sum();
        let expected_egresos: Decimal = ledger
            .filtered
            .iter()
            .filter(|m| !m.tipo().is_inflow())
            .map(|m| m.monto)
            .sum();

        prop_assert_eq!(ledger.summary.ingresos, expected_ingresos);
        prop_assert_eq!(ledger.summary.egresos, expected_egresos);
        prop_assert_eq!(ledger.summary.neto, expected_ingresos - expected_egresos);
        prop_assert_eq!(ledger.summary.total, ledger.filtered.len() as u64);
    }

    /// A kind filter never lets another kind through, and filtering twice
    /// with the same filter is idempotent.
    #[test]
    fn test_kind_filter_exactness(
        montos in prop::collection::vec(1u64..100_000, 1..30),
        kind_seed in prop::collection::vec(0u8..4, 1..30),
    ) {
        let fecha = date(2024, 6, 1);
        let movements: Vec<Movement> = montos
            .iter()
            .zip(kind_seed.iter().chain(std::iter::repeat(&0)))
            .map(|(&monto, &k)| {
                let monto = Decimal::from(monto);
                match k {
                    0 => Movement::from_ingreso(ingreso(monto, fecha, None)),
                    1 => Movement::from_egreso(egreso(monto, fecha, None)),
                    2 => Movement::from_venta(venta(monto, fecha, None)),
                    _ => Movement::from_compra(compra(monto, fecha, None)),
                }
            })
            .collect();

        let filter = MovementFilter {
            tipo: Some(MovementKind::Venta),
            ..MovementFilter::default()
        };

        let once = filter_and_summarize(movements, &filter);
        prop_assert!(once.filtered.iter().all(|m| m.tipo() == MovementKind::Venta));

        let twice = filter_and_summarize(once.filtered.clone(), &filter);
        prop_assert_eq!(twice.filtered.len(), once.filtered.len());
        prop_assert_eq!(twice.summary, once.summary);
    }
}
