//! Movement repository: the four entity fetches behind the movement
//! ledger and the ventas / compras / ingresos-egresos reports.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use gestia_core::movements::MovementSources;
use gestia_core::records::{
    ExpenseRecord, IncomeRecord, PurchaseItemRecord, PurchaseRecord, SaleItemRecord, SaleRecord,
};

use crate::entities::{
    categories, clients, expenses, incomes, purchase_items, purchases, sale_items, sales,
    suppliers,
};

/// Inclusive date window; an absent bound leaves that side open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    /// Inclusive lower bound.
    pub desde: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub hasta: Option<NaiveDate>,
}

impl DateWindow {
    /// A closed window covering `desde..=hasta`.
    #[must_use]
    pub const fn closed(desde: NaiveDate, hasta: NaiveDate) -> Self {
        Self {
            desde: Some(desde),
            hasta: Some(hasta),
        }
    }
}

fn window<E: EntityTrait>(
    query: Select<E>,
    column: impl ColumnTrait,
    range: DateWindow,
) -> Select<E> {
    let query = match range.desde {
        Some(desde) => query.filter(column.gte(desde)),
        None => query,
    };
    match range.hasta {
        Some(hasta) => query.filter(column.lte(hasta)),
        None => query,
    }
}

/// Repository for owner-scoped transactional rows.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Incomes in the window, category names resolved, date ascending.
    pub async fn incomes_in_range(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<Vec<IncomeRecord>, DbErr> {
        let query = window(
            incomes::Entity::find().filter(incomes::Column::UserId.eq(user_id)),
            incomes::Column::Date,
            range,
        );
        let rows = query
            .find_also_related(categories::Entity)
            .order_by_asc(incomes::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(income, category)| IncomeRecord {
                id: income.id,
                fecha: income.date,
                monto: income.amount,
                descripcion: income.description,
                categoria: category.map(|c| c.name),
            })
            .collect())
    }

    /// Expenses in the window, category names resolved, date ascending.
    pub async fn expenses_in_range(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<Vec<ExpenseRecord>, DbErr> {
        let query = window(
            expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id)),
            expenses::Column::Date,
            range,
        );
        let rows = query
            .find_also_related(categories::Entity)
            .order_by_asc(expenses::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(expense, category)| ExpenseRecord {
                id: expense.id,
                fecha: expense.date,
                monto: expense.amount,
                descripcion: expense.description,
                categoria: category.map(|c| c.name),
                categoria_general: expense.category_label,
            })
            .collect())
    }

    /// Sales in the window, client names and line items resolved, date
    /// ascending.
    pub async fn sales_in_range(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<Vec<SaleRecord>, DbErr> {
        let query = window(
            sales::Entity::find().filter(sales::Column::UserId.eq(user_id)),
            sales::Column::Date,
            range,
        );
        let rows = query
            .find_also_related(clients::Entity)
            .order_by_asc(sales::Column::Date)
            .all(&self.db)
            .await?;

        let sale_ids: Vec<Uuid> = rows.iter().map(|(sale, _)| sale.id).collect();
        let mut items_by_sale = self.sale_items_for(&sale_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(sale, client)| SaleRecord {
                id: sale.id,
                fecha: sale.date,
                total: sale.total,
                descripcion: sale.description,
                cliente: client.map(|c| c.name),
                tipo: sale.sale_type,
                items: items_by_sale.remove(&sale.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Purchases in the window, supplier names and line items resolved,
    /// date ascending.
    pub async fn purchases_in_range(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<Vec<PurchaseRecord>, DbErr> {
        let query = window(
            purchases::Entity::find().filter(purchases::Column::UserId.eq(user_id)),
            purchases::Column::Date,
            range,
        );
        let rows = query
            .find_also_related(suppliers::Entity)
            .order_by_asc(purchases::Column::Date)
            .all(&self.db)
            .await?;

        let purchase_ids: Vec<Uuid> = rows.iter().map(|(purchase, _)| purchase.id).collect();
        let mut items_by_purchase = self.purchase_items_for(&purchase_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(purchase, supplier)| PurchaseRecord {
                id: purchase.id,
                fecha: purchase.date,
                total: purchase.total,
                descripcion: purchase.description,
                proveedor: supplier.map(|s| s.name),
                items: items_by_purchase.remove(&purchase.id).unwrap_or_default(),
            })
            .collect())
    }

    /// All four source collections for the movement ledger.
    pub async fn movement_sources(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<MovementSources, DbErr> {
        Ok(MovementSources {
            ingresos: self.incomes_in_range(user_id, range).await?,
            egresos: self.expenses_in_range(user_id, range).await?,
            ventas: self.sales_in_range(user_id, range).await?,
            compras: self.purchases_in_range(user_id, range).await?,
        })
    }

    async fn sale_items_for(
        &self,
        sale_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<SaleItemRecord>>, DbErr> {
        if sale_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.is_in(sale_ids.iter().copied()))
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<SaleItemRecord>> = HashMap::new();
        for item in items {
            grouped.entry(item.sale_id).or_default().push(SaleItemRecord {
                producto: item.product_name,
                cantidad: i64::from(item.quantity),
                precio_unitario: item.unit_price,
                subtotal: item.subtotal,
            });
        }
        Ok(grouped)
    }

    async fn purchase_items_for(
        &self,
        purchase_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<PurchaseItemRecord>>, DbErr> {
        if purchase_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = purchase_items::Entity::find()
            .filter(purchase_items::Column::PurchaseId.is_in(purchase_ids.iter().copied()))
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<PurchaseItemRecord>> = HashMap::new();
        for item in items {
            grouped
                .entry(item.purchase_id)
                .or_default()
                .push(PurchaseItemRecord {
                    producto: item.product_name,
                    cantidad: i64::from(item.quantity),
                    precio_unitario: item.unit_price,
                    subtotal: item.subtotal,
                });
        }
        Ok(grouped)
    }
}
