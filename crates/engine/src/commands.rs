//! Command structs for engine write operations.
//!
//! These types group the parameters of create/update calls, keeping call
//! sites readable. Values are raw client input: the engine validates and
//! normalizes them before anything reaches the store.

/// Create an expense.
#[derive(Clone, Debug)]
pub struct NewExpenseCmd {
    pub title: String,
    pub amount: f64,
    /// `YYYY-MM-DD`; anything after the first 10 characters is dropped.
    pub expense_date: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl NewExpenseCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, amount: f64, expense_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount,
            expense_date: expense_date.into(),
            category: None,
            description: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update some fields of an expense. `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateExpenseCmd {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub expense_date: Option<String>,
    pub category: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn expense_date(mut self, expense_date: impl Into<String>) -> Self {
        self.expense_date = Some(expense_date.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }
}
