//! Inventory repository: products plus their in-period sales activity.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use gestia_core::records::ProductActivity;

use crate::entities::{products, sale_items, sales};

use super::movements::DateWindow;

/// Repository for product stock and movement queries.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every product of the owner together with the units it sold inside
    /// the window, ordered by product name.
    pub async fn product_activity(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<Vec<ProductActivity>, DbErr> {
        let product_rows = products::Entity::find()
            .filter(products::Column::UserId.eq(user_id))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        let sold = self.units_sold_in_range(user_id, range).await?;

        Ok(product_rows
            .into_iter()
            .map(|p| ProductActivity {
                id: p.id,
                nombre: p.name,
                cantidad: i64::from(p.quantity),
                precio: p.price,
                vendidos: sold.get(&p.id).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Units sold per product inside the window.
    async fn units_sold_in_range(
        &self,
        user_id: Uuid,
        range: DateWindow,
    ) -> Result<HashMap<Uuid, i64>, DbErr> {
        let mut sales_query = sales::Entity::find()
            .select_only()
            .column(sales::Column::Id)
            .filter(sales::Column::UserId.eq(user_id));
        if let Some(desde) = range.desde {
            sales_query = sales_query.filter(sales::Column::Date.gte(desde));
        }
        if let Some(hasta) = range.hasta {
            sales_query = sales_query.filter(sales::Column::Date.lte(hasta));
        }
        let sale_ids: Vec<Uuid> = sales_query.into_tuple().all(&self.db).await?;

        if sale_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.is_in(sale_ids))
            .all(&self.db)
            .await?;

        let mut sold: HashMap<Uuid, i64> = HashMap::new();
        for item in items {
            *sold.entry(item.product_id).or_insert(0) += i64::from(item.quantity);
        }
        Ok(sold)
    }
}
