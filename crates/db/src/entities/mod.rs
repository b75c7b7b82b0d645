//! `SeaORM` entity definitions.

pub mod categories;
pub mod clients;
pub mod expenses;
pub mod incomes;
pub mod products;
pub mod purchase_items;
pub mod purchases;
pub mod sale_items;
pub mod sales;
pub mod suppliers;
pub mod users;
