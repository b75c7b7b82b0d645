//! Tests for the report builders.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::records::{
    ExpenseRecord, IncomeRecord, ProductActivity, PurchaseItemRecord, PurchaseRecord,
    SaleItemRecord, SaleRecord,
};

use super::service::{
    build_income_expense_report, build_inventory_report, build_purchases_report,
    build_sales_report,
};
use super::types::{IMMOBILIZED_ITEMS, Periodo, SalesTargets, StockStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn periodo() -> Periodo {
    Periodo {
        fecha_inicio: date(2024, 1, 1),
        fecha_fin: date(2024, 1, 31),
    }
}

fn venta(total: Decimal, cliente: Option<&str>, items: Vec<SaleItemRecord>) -> SaleRecord {
    SaleRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 10),
        total,
        descripcion: None,
        cliente: cliente.map(String::from),
        tipo: Some("producto".to_string()),
        items,
    }
}

fn item(producto: &str, cantidad: i64, subtotal: Decimal) -> SaleItemRecord {
    SaleItemRecord {
        producto: producto.to_string(),
        cantidad,
        precio_unitario: subtotal / Decimal::from(cantidad.max(1)),
        subtotal,
    }
}

fn producto(nombre: &str, cantidad: i64, precio: Decimal, vendidos: i64) -> ProductActivity {
    ProductActivity {
        id: Uuid::new_v4(),
        nombre: nombre.to_string(),
        cantidad,
        precio,
        vendidos,
    }
}

// ============================================================================
// Income vs expense
// ============================================================================

#[test]
fn test_income_expense_round_trip_scenario() {
    let ingresos = vec![IncomeRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 5),
        monto: dec!(1000),
        descripcion: None,
        categoria: Some("Ventas".to_string()),
    }];
    let egresos = vec![ExpenseRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 10),
        monto: dec!(400),
        descripcion: None,
        categoria: Some("Alquiler".to_string()),
        categoria_general: None,
    }];

    let report = build_income_expense_report(periodo(), &ingresos, &egresos);

    assert_eq!(report.resumen.total_ingresos, dec!(1000));
    assert_eq!(report.resumen.total_egresos, dec!(400));
    assert_eq!(report.resumen.balance, dec!(600));
    assert_eq!(report.ingresos_por_categoria.get("Ventas"), Some(&dec!(1000)));
    assert_eq!(report.egresos_por_categoria.get("Alquiler"), Some(&dec!(400)));
    assert_eq!(report.ingresos_por_categoria.len(), 1);
    assert_eq!(report.egresos_por_categoria.len(), 1);
}

#[test]
fn test_income_expense_empty_period() {
    let report = build_income_expense_report(periodo(), &[], &[]);

    assert_eq!(report.resumen.total_ingresos, Decimal::ZERO);
    assert_eq!(report.resumen.total_egresos, Decimal::ZERO);
    assert_eq!(report.resumen.balance, Decimal::ZERO);
    assert_eq!(report.resumen.cantidad_ingresos, 0);
    assert!(report.ingresos_por_categoria.is_empty());
    assert!(report.egresos_por_categoria.is_empty());
    assert!(report.detalle_por_dia.is_empty());
}

#[test]
fn test_income_expense_uncategorized_fallback_and_key_order() {
    let mk = |monto: Decimal, categoria: Option<&str>| IncomeRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 3),
        monto,
        descripcion: None,
        categoria: categoria.map(String::from),
    };
    let ingresos = vec![
        mk(dec!(10), Some("B")),
        mk(dec!(20), None),
        mk(dec!(30), Some("A")),
        mk(dec!(40), Some("B")),
    ];

    let report = build_income_expense_report(periodo(), &ingresos, &[]);

    let keys: Vec<&String> = report.ingresos_por_categoria.keys().collect();
    assert_eq!(keys, vec!["B", "Sin categoría", "A"]);
    assert_eq!(report.ingresos_por_categoria.get("B"), Some(&dec!(50)));
}

#[test]
fn test_income_expense_daily_detail_is_date_ascending() {
    let mk_ing = |fecha: NaiveDate, monto: Decimal| IncomeRecord {
        id: Uuid::new_v4(),
        fecha,
        monto,
        descripcion: None,
        categoria: None,
    };
    let mk_egr = |fecha: NaiveDate, monto: Decimal| ExpenseRecord {
        id: Uuid::new_v4(),
        fecha,
        monto,
        descripcion: None,
        categoria: None,
        categoria_general: None,
    };

    let ingresos = vec![mk_ing(date(2024, 1, 20), dec!(100)), mk_ing(date(2024, 1, 5), dec!(50))];
    let egresos = vec![mk_egr(date(2024, 1, 5), dec!(30))];

    let report = build_income_expense_report(periodo(), &ingresos, &egresos);

    assert_eq!(report.detalle_por_dia.len(), 2);
    assert_eq!(report.detalle_por_dia[0].fecha, date(2024, 1, 5));
    assert_eq!(report.detalle_por_dia[0].ingresos, dec!(50));
    assert_eq!(report.detalle_por_dia[0].egresos, dec!(30));
    assert_eq!(report.detalle_por_dia[0].neto, dec!(20));
    assert_eq!(report.detalle_por_dia[1].fecha, date(2024, 1, 20));
}

// ============================================================================
// Sales
// ============================================================================

#[test]
fn test_sales_ranking_is_stable_on_ties() {
    let ventas = vec![
        venta(dec!(100), Some("A"), vec![]),
        venta(dec!(100), Some("B"), vec![]),
        venta(dec!(50), Some("C"), vec![]),
    ];

    let report = build_sales_report(periodo(), &ventas, &SalesTargets::default());

    let nombres: Vec<&str> = report
        .top_clientes
        .iter()
        .map(|c| c.nombre.as_str())
        .collect();
    assert_eq!(nombres, vec!["A", "B", "C"]);
}

#[test]
fn test_sales_top_products_aggregate_line_items() {
    let ventas = vec![
        venta(
            dec!(700),
            None,
            vec![item("Teclado", 2, dec!(400)), item("Mouse", 3, dec!(300))],
        ),
        venta(dec!(200), None, vec![item("Mouse", 2, dec!(200))]),
    ];

    let report = build_sales_report(periodo(), &ventas, &SalesTargets::default());

    assert_eq!(report.top_productos.len(), 2);
    assert_eq!(report.top_productos[0].nombre, "Mouse");
    assert_eq!(report.top_productos[0].cantidad, 5);
    assert_eq!(report.top_productos[0].total, dec!(500));
    assert_eq!(report.top_productos[1].nombre, "Teclado");
}

#[test]
fn test_sales_summary_thresholds() {
    let targets = SalesTargets {
        venta_alta: dec!(1000),
        meta_mensual: dec!(10000),
    };
    let ventas = vec![
        venta(dec!(1500), None, vec![]),
        venta(dec!(1000), None, vec![]),
        venta(dec!(500), None, vec![]),
    ];

    let report = build_sales_report(periodo(), &ventas, &targets);

    assert_eq!(report.resumen.total_ventas, dec!(3000));
    assert_eq!(report.resumen.cantidad_ventas, 3);
    assert_eq!(report.resumen.promedio_venta, dec!(1000));
    // Threshold is inclusive.
    assert_eq!(report.resumen.ventas_altas, 2);
    assert_eq!(report.resumen.avance_meta, dec!(30));
}

#[test]
fn test_sales_zero_goal_yields_zero_progress() {
    let targets = SalesTargets {
        venta_alta: dec!(1000),
        meta_mensual: Decimal::ZERO,
    };
    let report = build_sales_report(periodo(), &[venta(dec!(100), None, vec![])], &targets);
    assert_eq!(report.resumen.avance_meta, Decimal::ZERO);
}

#[test]
fn test_sales_empty_period_has_zero_average() {
    let report = build_sales_report(periodo(), &[], &SalesTargets::default());
    assert_eq!(report.resumen.promedio_venta, Decimal::ZERO);
    assert_eq!(report.resumen.cantidad_ventas, 0);
    assert!(report.top_productos.is_empty());
    assert!(report.ventas_por_tipo.is_empty());
}

// ============================================================================
// Purchases
// ============================================================================

#[test]
fn test_purchases_collect_distinct_suppliers_per_product() {
    let mk = |proveedor: &str, items: Vec<PurchaseItemRecord>| PurchaseRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 8),
        total: items.iter().map(|i| i.subtotal).sum(),
        descripcion: None,
        proveedor: Some(proveedor.to_string()),
        items,
    };
    let pitem = |producto: &str, cantidad: i64, subtotal: Decimal| PurchaseItemRecord {
        producto: producto.to_string(),
        cantidad,
        precio_unitario: subtotal / Decimal::from(cantidad.max(1)),
        subtotal,
    };

    let compras = vec![
        mk("Norte SA", vec![pitem("Harina", 10, dec!(1000))]),
        mk("Sur SRL", vec![pitem("Harina", 5, dec!(600))]),
        mk("Norte SA", vec![pitem("Harina", 2, dec!(250))]),
    ];

    let report = build_purchases_report(periodo(), &compras);

    assert_eq!(report.top_productos.len(), 1);
    let harina = &report.top_productos[0];
    assert_eq!(harina.cantidad, 17);
    assert_eq!(harina.total, dec!(1850));
    assert_eq!(harina.detalles, vec!["Norte SA", "Sur SRL"]);

    assert_eq!(report.resumen.total_compras, dec!(1850));
    assert_eq!(
        report.compras_por_proveedor.get("Norte SA"),
        Some(&dec!(1250))
    );
}

#[test]
fn test_purchases_without_supplier_use_fallback_label() {
    let compras = vec![PurchaseRecord {
        id: Uuid::new_v4(),
        fecha: date(2024, 1, 8),
        total: dec!(300),
        descripcion: None,
        proveedor: None,
        items: vec![],
    }];

    let report = build_purchases_report(periodo(), &compras);
    assert_eq!(report.top_proveedores[0].nombre, "Proveedor no especificado");
    assert_eq!(
        report.compras_por_proveedor.get("Proveedor no especificado"),
        Some(&dec!(300))
    );
}

// ============================================================================
// Inventory
// ============================================================================

#[test]
fn test_stock_classes_are_mutually_exclusive() {
    for cantidad in [0i64, 1, 5, 10, 11, 50, 100, 101, 500] {
        let estado = StockStatus::classify(cantidad);
        let expected = match cantidad {
            0 => StockStatus::SinStock,
            1..=10 => StockStatus::StockBajo,
            101.. => StockStatus::StockAlto,
            _ => StockStatus::Normal,
        };
        assert_eq!(estado, expected, "cantidad {cantidad}");
    }
}

#[test]
fn test_inventory_rotation_guards_zero_stock() {
    let productos = vec![
        producto("Agotado", 0, dec!(100), 4),
        producto("Activo", 10, dec!(100), 5),
    ];

    let report = build_inventory_report(periodo(), &productos);

    assert_eq!(report.productos[0].rotacion, Decimal::ZERO);
    assert_eq!(report.productos[0].estado, StockStatus::SinStock);
    assert_eq!(report.productos[1].rotacion, dec!(0.5));
}

#[test]
fn test_inventory_summary_counts_and_value() {
    let productos = vec![
        producto("A", 0, dec!(10), 0),
        producto("B", 5, dec!(20), 3),
        producto("C", 200, dec!(1), 0),
        producto("D", 50, dec!(2), 1),
    ];

    let report = build_inventory_report(periodo(), &productos);

    assert_eq!(report.resumen.total_productos, 4);
    assert_eq!(report.resumen.unidades_totales, 255);
    assert_eq!(report.resumen.valor_inventario, dec!(400));
    assert_eq!(report.resumen.sin_stock, 1);
    assert_eq!(report.resumen.stock_bajo, 1);
    assert_eq!(report.resumen.stock_alto, 1);
}

#[test]
fn test_inventory_immobilized_sorted_by_value_descending() {
    let productos = vec![
        producto("Barato", 10, dec!(1), 0),
        producto("Caro", 10, dec!(100), 0),
        producto("Vendido", 10, dec!(1000), 7),
        producto("Medio", 10, dec!(10), 0),
    ];

    let report = build_inventory_report(periodo(), &productos);

    let nombres: Vec<&str> = report
        .sin_movimiento
        .iter()
        .map(|p| p.nombre.as_str())
        .collect();
    assert_eq!(nombres, vec!["Caro", "Medio", "Barato"]);
}

#[test]
fn test_inventory_immobilized_list_is_capped() {
    let productos: Vec<ProductActivity> = (0..30)
        .map(|i| producto(&format!("P{i}"), 1, Decimal::from(i), 0))
        .collect();

    let report = build_inventory_report(periodo(), &productos);
    assert_eq!(report.sin_movimiento.len(), IMMOBILIZED_ITEMS);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The balance always equals income minus expense, and both equal the
    /// sum of their constituent rows.
    #[test]
    fn test_income_expense_aggregate_consistency(
        ingresos_montos in prop::collection::vec(1u64..1_000_000, 0..30),
        egresos_montos in prop::collection::vec(1u64..1_000_000, 0..30),
    ) {
        let ingresos: Vec<IncomeRecord> = ingresos_montos
            .iter()
            .map(|&m| IncomeRecord {
                id: Uuid::new_v4(),
                fecha: date(2024, 2, 1),
                monto: Decimal::from(m),
                descripcion: None,
                categoria: None,
            })
            .collect();
        let egresos: Vec<ExpenseRecord> = egresos_montos
            .iter()
            .map(|&m| ExpenseRecord {
                id: Uuid::new_v4(),
                fecha: date(2024, 2, 2),
                monto: Decimal::from(m),
                descripcion: None,
                categoria: None,
                categoria_general: None,
            })
            .collect();

        let report = build_income_expense_report(periodo(), &ingresos, &egresos);

        let sum_ingresos: Decimal = ingresos.iter().map(|i| i.monto).sum();
        let sum_egresos: Decimal = egresos.iter().map(|e| e.monto).sum();

        prop_assert_eq!(report.resumen.total_ingresos, sum_ingresos);
        prop_assert_eq!(report.resumen.total_egresos, sum_egresos);
        prop_assert_eq!(report.resumen.balance, sum_ingresos - sum_egresos);

        // Category totals decompose the overall totals.
        let categoria_sum: Decimal = report.ingresos_por_categoria.values().copied().sum();
        prop_assert_eq!(categoria_sum, sum_ingresos);

        // Daily detail decomposes them too.
        let daily_ingresos: Decimal = report.detalle_por_dia.iter().map(|d| d.ingresos).sum();
        prop_assert_eq!(daily_ingresos, sum_ingresos);
    }

    /// Every product lands in exactly one stock class and rotation never
    /// divides by zero.
    #[test]
    fn test_inventory_classification_total(
        cantidades in prop::collection::vec(0i64..1_000, 1..50),
    ) {
        let productos: Vec<ProductActivity> = cantidades
            .iter()
            .enumerate()
            .map(|(i, &cantidad)| producto(&format!("P{i}"), cantidad, dec!(10), 1))
            .collect();

        let report = build_inventory_report(periodo(), &productos);

        let normal = report
            .productos
            .iter()
            .filter(|p| p.estado == StockStatus::Normal)
            .count() as u64;
        prop_assert_eq!(
            report.resumen.sin_stock + report.resumen.stock_bajo
                + report.resumen.stock_alto + normal,
            report.resumen.total_productos
        );
    }
}
