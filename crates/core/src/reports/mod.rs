//! Report payload assembly.
//!
//! One builder per report kind (ventas, compras, ingresos-egresos,
//! inventario). Builders are pure: they consume rows already fetched by
//! the store and produce a format-agnostic payload; rendering lives in
//! [`crate::render`].

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{
    build_income_expense_report, build_inventory_report, build_purchases_report,
    build_sales_report,
};
pub use types::*;
