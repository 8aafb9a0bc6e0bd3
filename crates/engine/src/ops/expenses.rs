use crate::{
    Category, EngineError, Expense, ExpensePayload, NewExpenseCmd, ResultEngine,
    UpdateExpenseCmd,
    list::{ExpensePage, ListQuery, estimate_total},
    store::{SortColumn, SortOrder, StoreQuery, StoreRange},
    util::{normalize_description, normalize_expense_date, normalize_title, validate_amount},
};

use super::Engine;

fn not_found() -> EngineError {
    EngineError::NotFound("Expense not found".to_string())
}

impl Engine {
    /// One page of expenses matching `query`, plus the filtered total.
    pub async fn list_expenses(&self, query: &ListQuery) -> ResultEngine<ExpensePage> {
        let page = self.store.select(&query.to_store_query()).await?;
        let items: Vec<Expense> = page.rows.into_iter().map(Expense::from).collect();
        let total = estimate_total(page.total, query, items.len() as u64);
        tracing::debug!(
            page = query.page,
            page_size = query.page_size,
            returned = items.len(),
            total,
            "listed expenses"
        );
        Ok(ExpensePage { items, total })
    }

    /// Every expense, newest first.
    pub async fn all_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let query = StoreQuery {
            search: None,
            sort_by: SortColumn::ExpenseDate,
            sort_order: SortOrder::Desc,
            range: None,
        };
        let page = self.store.select(&query).await?;
        Ok(page.rows.into_iter().map(Expense::from).collect())
    }

    pub async fn expense(&self, id: &str) -> ResultEngine<Expense> {
        self.store
            .find(id)
            .await?
            .map(Expense::from)
            .ok_or_else(not_found)
    }

    pub async fn create_expense(&self, cmd: NewExpenseCmd) -> ResultEngine<Expense> {
        let payload = ExpensePayload {
            title: Some(normalize_title(&cmd.title)?),
            amount: Some(validate_amount(cmd.amount)?),
            category: Some(
                cmd.category
                    .as_deref()
                    .map(Category::coerce)
                    .unwrap_or_default(),
            ),
            expense_date: Some(normalize_expense_date(&cmd.expense_date)?),
            description: Some(normalize_description(cmd.description.as_deref())),
        };

        let row = self.store.insert(payload).await?;
        tracing::info!(id = %row.id, "expense created");
        Ok(row.into())
    }

    pub async fn update_expense(&self, id: &str, cmd: UpdateExpenseCmd) -> ResultEngine<Expense> {
        let payload = ExpensePayload {
            title: cmd.title.as_deref().map(normalize_title).transpose()?,
            amount: cmd.amount.map(validate_amount).transpose()?,
            category: cmd.category.as_deref().map(Category::coerce),
            expense_date: cmd
                .expense_date
                .as_deref()
                .map(normalize_expense_date)
                .transpose()?,
            description: cmd
                .description
                .map(|description| normalize_description(description.as_deref())),
        };

        let row = self.store.update(id, payload).await?.ok_or_else(not_found)?;
        tracing::info!(id = %row.id, "expense updated");
        Ok(row.into())
    }

    /// Hard delete.
    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        let deleted = self.store.delete(id).await?;
        if deleted == 0 {
            return Err(not_found());
        }
        tracing::info!(id, "expense deleted");
        Ok(())
    }

    /// Cheapest possible round trip to the store.
    pub async fn ping(&self) -> ResultEngine<()> {
        let query = StoreQuery {
            range: Some(StoreRange {
                offset: 0,
                limit: 1,
            }),
            ..Default::default()
        };
        self.store.select(&query).await?;
        Ok(())
    }
}
