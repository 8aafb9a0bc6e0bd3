//! Expense primitives.
//!
//! An [`Expense`] is the canonical, normalized shape handed out by the
//! engine. Stores speak in [`ExpenseRow`]s (possibly sparse) and accept
//! [`ExpensePayload`]s (only the fields being written).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Category, store::fold_case};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    /// `YYYY-MM-DD` as found in the store. Not guaranteed to parse for rows
    /// written by other clients.
    pub expense_date: String,
    pub description: String,
}

/// Raw row as returned by a record store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub expense_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Store ids may be integers or strings depending on the backend.
fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// Fields to write. `None` means "leave as is" on update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExpensePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        let expense_date = row
            .expense_date
            .map(|date| date.chars().take(10).collect())
            .unwrap_or_default();
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            amount: row.amount.unwrap_or(0.0),
            category: row
                .category
                .as_deref()
                .map(Category::coerce)
                .unwrap_or_default(),
            expense_date,
            description: row.description.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: String,
    pub description: String,
    /// Case-folded `title`, only used for searching.
    pub title_folded: String,
    pub description_folded: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExpenseRow {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: Some(model.title),
            amount: Some(model.amount),
            category: Some(model.category),
            expense_date: Some(model.expense_date),
            description: Some(model.description),
        }
    }
}

impl ActiveModel {
    /// Active model for an insert: absent fields get their defaults.
    pub(crate) fn for_insert(id: String, payload: ExpensePayload) -> Self {
        let title = payload.title.unwrap_or_default();
        let description = payload.description.unwrap_or_default();
        Self {
            id: ActiveValue::Set(id),
            title_folded: ActiveValue::Set(fold_case(&title)),
            title: ActiveValue::Set(title),
            amount: ActiveValue::Set(payload.amount.unwrap_or(0.0)),
            category: ActiveValue::Set(
                payload.category.unwrap_or_default().as_str().to_string(),
            ),
            expense_date: ActiveValue::Set(payload.expense_date.unwrap_or_default()),
            description_folded: ActiveValue::Set(fold_case(&description)),
            description: ActiveValue::Set(description),
        }
    }

    /// Active model for a partial update: absent fields stay `NotSet`.
    pub(crate) fn for_update(id: String, payload: ExpensePayload) -> Self {
        fn set_or_skip<T: Into<sea_orm::Value>>(value: Option<T>) -> ActiveValue<T> {
            value.map_or(ActiveValue::NotSet, ActiveValue::Set)
        }

        Self {
            id: ActiveValue::Unchanged(id),
            title_folded: set_or_skip(payload.title.as_deref().map(fold_case)),
            title: set_or_skip(payload.title),
            amount: set_or_skip(payload.amount),
            category: set_or_skip(payload.category.map(|c| c.as_str().to_string())),
            expense_date: set_or_skip(payload.expense_date),
            description_folded: set_or_skip(payload.description.as_deref().map(fold_case)),
            description: set_or_skip(payload.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_row_normalizes_to_defaults() {
        let row = ExpenseRow {
            id: "7".to_string(),
            title: Some("Coffee".to_string()),
            ..Default::default()
        };
        let expense = Expense::from(row);
        assert_eq!(expense.amount, 0.0);
        assert_eq!(expense.category, Category::Other);
        assert_eq!(expense.description, "");
        assert_eq!(expense.expense_date, "");
    }

    #[test]
    fn row_category_is_coerced_and_date_truncated() {
        let row = ExpenseRow {
            id: "a".to_string(),
            title: Some("Rent".to_string()),
            amount: Some(900.0),
            category: Some("rent".to_string()),
            expense_date: Some("2025-03-01T00:00:00".to_string()),
            description: None,
        };
        let expense = Expense::from(row);
        assert_eq!(expense.category, Category::Rent);
        assert_eq!(expense.expense_date, "2025-03-01");
    }

    #[test]
    fn row_accepts_numeric_ids() {
        let row: ExpenseRow =
            serde_json::from_str(r#"{"id": 42, "title": "Bus", "amount": 2.5}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.amount, Some(2.5));
    }

    #[test]
    fn payload_skips_absent_fields() {
        let payload = ExpensePayload {
            amount: Some(10.0),
            category: Some(Category::Food),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"amount": 10.0, "category": "FOOD"})
        );
    }
}
