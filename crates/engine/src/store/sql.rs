use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, Order, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use uuid::Uuid;

use crate::{ExpensePayload, ExpenseRow, ResultEngine, expenses};

use super::{ExpenseStore, SearchPattern, SortColumn, SortOrder, StorePage, StoreQuery};

/// Record store backed by a sea-orm connection.
///
/// Always reports an exact total.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

fn column(sort_by: SortColumn) -> expenses::Column {
    match sort_by {
        SortColumn::Title => expenses::Column::Title,
        SortColumn::Amount => expenses::Column::Amount,
        SortColumn::Category => expenses::Column::Category,
        SortColumn::ExpenseDate => expenses::Column::ExpenseDate,
        SortColumn::Description => expenses::Column::Description,
    }
}

fn order(sort_order: SortOrder) -> Order {
    match sort_order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// `title_folded LIKE p ESCAPE '\' OR description_folded LIKE p ESCAPE '\'`
///
/// SQLite's `LOWER` only folds ASCII, so the folded copies are written by the
/// engine with the same folding as the pattern.
fn search_condition(pattern: &SearchPattern) -> Condition {
    let pattern = pattern.like_pattern();
    let like = |col: expenses::Column| {
        Expr::col(col).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };
    Condition::any()
        .add(like(expenses::Column::TitleFolded))
        .add(like(expenses::Column::DescriptionFolded))
}

#[async_trait]
impl ExpenseStore for SqlStore {
    async fn select(&self, query: &StoreQuery) -> ResultEngine<StorePage> {
        let mut select = expenses::Entity::find();
        if let Some(pattern) = &query.search {
            select = select.filter(search_condition(pattern));
        }

        let total = select.clone().count(&self.database).await?;

        // Id breaks ties so pages do not overlap.
        let mut select = select
            .order_by(column(query.sort_by), order(query.sort_order))
            .order_by(expenses::Column::Id, order(query.sort_order));
        if let Some(range) = query.range {
            select = select.offset(range.offset).limit(range.limit);
        }

        let rows = select
            .all(&self.database)
            .await?
            .into_iter()
            .map(ExpenseRow::from)
            .collect();

        Ok(StorePage {
            rows,
            total: Some(total),
        })
    }

    async fn find(&self, id: &str) -> ResultEngine<Option<ExpenseRow>> {
        Ok(expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(ExpenseRow::from))
    }

    async fn insert(&self, payload: ExpensePayload) -> ResultEngine<ExpenseRow> {
        let id = Uuid::new_v4().to_string();
        let model = expenses::ActiveModel::for_insert(id, payload)
            .insert(&self.database)
            .await?;
        Ok(model.into())
    }

    async fn update(
        &self,
        id: &str,
        payload: ExpensePayload,
    ) -> ResultEngine<Option<ExpenseRow>> {
        let Some(existing) = expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if payload == ExpensePayload::default() {
            return Ok(Some(existing.into()));
        }

        let model = expenses::ActiveModel::for_update(id.to_string(), payload)
            .update(&self.database)
            .await?;
        Ok(Some(model.into()))
    }

    async fn delete(&self, id: &str) -> ResultEngine<u64> {
        let res = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(res.rows_affected)
    }
}
