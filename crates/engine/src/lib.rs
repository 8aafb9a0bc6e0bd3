//! Expense tracking engine.
//!
//! The [`Engine`] is a thin repository over an [`ExpenseStore`]: it validates
//! and normalizes input, bounds listing queries and computes the analytics
//! [`Dashboard`] in memory.

pub use categories::Category;
pub use commands::{NewExpenseCmd, UpdateExpenseCmd};
pub use dashboard::{
    CategorySpending, DailyTrend, Dashboard, Kpi, Kpis, MonthlyByType, MonthlySpending,
    build_dashboard,
};
pub use error::EngineError;
pub use expenses::{Expense, ExpensePayload, ExpenseRow};
pub use list::{ExpensePage, ListQuery};
pub use ops::{Engine, EngineBuilder};
pub use store::{ExpenseStore, RestStore, SqlStore};

mod categories;
mod commands;
pub mod dashboard;
mod error;
pub mod expenses;
pub mod list;
mod ops;
pub mod store;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
