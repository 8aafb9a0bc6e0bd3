//! Expenses API endpoints

use api_types::{
    envelope::ApiResponse,
    expense::{Expense, ExpenseList, ExpenseListResponse, ExpenseNew, ExpenseUpdate},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{ListQuery, NewExpenseCmd, UpdateExpenseCmd};

use crate::{ServerError, server::ServerState};

fn map_expense(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        title: expense.title,
        amount: expense.amount,
        category: expense.category.as_str().to_string(),
        expense_date: expense.expense_date,
        description: expense.description,
    }
}

fn required<T>(value: Option<T>, key: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| ServerError::Generic(format!("Missing field: {key}")))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ExpenseList>,
) -> Result<Json<ApiResponse<ExpenseListResponse>>, ServerError> {
    let query = ListQuery::from_params(
        params.search.as_deref(),
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
        params.page.as_deref(),
        params.page_size.as_deref(),
    );
    let page = state.engine.list_expenses(&query).await?;

    Ok(Json(ApiResponse::success(ExpenseListResponse {
        items: page.items.into_iter().map(map_expense).collect(),
        total: page.total,
    })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Expense>>, ServerError> {
    let expense = state.engine.expense(&id).await?;
    Ok(Json(ApiResponse::success(map_expense(expense))))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Expense>>), ServerError> {
    let Json(payload) = payload?;
    if payload.is_empty() {
        return Err(ServerError::Generic("JSON body required".to_string()));
    }

    let title = required(payload.title, "title")?;
    let amount = required(payload.amount, "amount")?;
    let expense_date = required(payload.expense_date, "expense_date")?;

    let mut cmd = NewExpenseCmd::new(title, amount, expense_date);
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(map_expense(expense))),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Expense>>, ServerError> {
    let Json(payload) = payload?;
    if payload.is_empty() {
        return Err(ServerError::Generic("JSON body required".to_string()));
    }

    let cmd = UpdateExpenseCmd {
        title: payload.title,
        amount: payload.amount,
        expense_date: payload.expense_date,
        category: payload.category,
        description: payload.description,
    };
    let expense = state.engine.update_expense(&id, cmd).await?;
    Ok(Json(ApiResponse::success(map_expense(expense))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
