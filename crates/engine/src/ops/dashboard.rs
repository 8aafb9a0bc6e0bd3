use chrono::{Local, NaiveDate};

use crate::{
    ResultEngine,
    dashboard::{Dashboard, build_dashboard},
};

use super::Engine;

impl Engine {
    /// Dashboard over every stored expense, as seen on `today`.
    pub async fn dashboard(&self, today: NaiveDate) -> ResultEngine<Dashboard> {
        let expenses = self.all_expenses().await?;
        Ok(build_dashboard(&expenses, today))
    }

    /// Dashboard relative to the local wall-clock date.
    pub async fn dashboard_today(&self) -> ResultEngine<Dashboard> {
        self.dashboard(Local::now().date_naive()).await
    }
}
