use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Category, Engine, EngineError, ExpensePayload, ExpenseRow, ExpenseStore, ListQuery,
    NewExpenseCmd, ResultEngine, SqlStore, UpdateExpenseCmd,
    store::{StorePage, StoreQuery},
};
use migration::MigratorTrait;

async fn database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn engine_with_db() -> Engine {
    Engine::builder().database(database().await).build().unwrap()
}

/// Counts writes reaching the store.
#[derive(Debug)]
struct CountingStore {
    inner: SqlStore,
    writes: Arc<AtomicUsize>,
}

#[async_trait]
impl ExpenseStore for CountingStore {
    async fn select(&self, query: &StoreQuery) -> ResultEngine<StorePage> {
        self.inner.select(query).await
    }

    async fn find(&self, id: &str) -> ResultEngine<Option<ExpenseRow>> {
        self.inner.find(id).await
    }

    async fn insert(&self, payload: ExpensePayload) -> ResultEngine<ExpenseRow> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(payload).await
    }

    async fn update(
        &self,
        id: &str,
        payload: ExpensePayload,
    ) -> ResultEngine<Option<ExpenseRow>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, payload).await
    }

    async fn delete(&self, id: &str) -> ResultEngine<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}

async fn seed(engine: &Engine, title: &str, amount: f64, date: &str) -> engine::Expense {
    engine
        .create_expense(NewExpenseCmd::new(title, amount, date))
        .await
        .unwrap()
}

fn list(search: Option<&str>, sort_by: &str, sort_order: &str, page: &str, size: &str) -> ListQuery {
    ListQuery::from_params(search, Some(sort_by), Some(sort_order), Some(page), Some(size))
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let engine = engine_with_db().await;

    let created = engine
        .create_expense(
            NewExpenseCmd::new("  Groceries ", 42.5, "2025-03-04")
                .category("food")
                .description("weekly shop"),
        )
        .await
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Groceries");
    assert_eq!(created.amount, 42.5);
    assert_eq!(created.category, Category::Food);
    assert_eq!(created.expense_date, "2025-03-04");
    assert_eq!(created.description, "weekly shop");

    let fetched = engine.expense(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    let again = engine.expense(&created.id).await.unwrap();
    assert_eq!(again.id, created.id);
}

#[tokio::test]
async fn create_defaults_category_and_description() {
    let engine = engine_with_db().await;

    let created = engine
        .create_expense(NewExpenseCmd::new("Gift", 20.0, "2025-03-04").category("presents"))
        .await
        .unwrap();
    assert_eq!(created.category, Category::Other);
    assert_eq!(created.description, "");

    let created = seed(&engine, "Bus", 2.0, "2025-03-04T08:30:00").await;
    assert_eq!(created.category, Category::Other);
    assert_eq!(created.expense_date, "2025-03-04");
}

#[tokio::test]
async fn negative_amount_is_rejected_before_any_write() {
    let writes = Arc::new(AtomicUsize::new(0));
    let engine = Engine::builder()
        .store(CountingStore {
            inner: SqlStore::new(database().await),
            writes: writes.clone(),
        })
        .build()
        .unwrap();

    let err = engine
        .create_expense(NewExpenseCmd::new("Refund", -1.0, "2025-03-04"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("amount must be >= 0".to_string()));

    let err = engine
        .update_expense("any", UpdateExpenseCmd::default().amount(-5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(writes.load(Ordering::SeqCst), 0);
    assert!(engine.all_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_date_and_blank_title_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine
        .create_expense(NewExpenseCmd::new("Rent", 900.0, "03/04/2025"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_expense(NewExpenseCmd::new("   ", 900.0, "2025-03-04"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("title must not be empty".to_string()));
}

#[tokio::test]
async fn update_changes_only_present_fields() {
    let engine = engine_with_db().await;
    let created = engine
        .create_expense(
            NewExpenseCmd::new("Dinner", 30.0, "2025-03-04")
                .category("FOOD")
                .description("with friends"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_expense(&created.id, UpdateExpenseCmd::default().amount(35.25))
        .await
        .unwrap();
    assert_eq!(updated.amount, 35.25);
    assert_eq!(updated.title, "Dinner");
    assert_eq!(updated.category, Category::Food);
    assert_eq!(updated.description, "with friends");
    assert_eq!(updated.id, created.id);

    let updated = engine
        .update_expense(
            &created.id,
            UpdateExpenseCmd::default()
                .category("health")
                .description(None),
        )
        .await
        .unwrap();
    assert_eq!(updated.category, Category::Health);
    assert_eq!(updated.description, "");
    assert_eq!(updated.amount, 35.25);

    assert_eq!(engine.expense(&created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let engine = engine_with_db().await;
    let err = engine
        .update_expense("missing", UpdateExpenseCmd::default().title("x"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("Expense not found".to_string()));
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let db = database().await;
    let store = SqlStore::new(db.clone());
    assert_eq!(store.delete("missing").await.unwrap(), 0);

    let engine = Engine::builder().database(db).build().unwrap();
    let err = engine.delete_expense("missing").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_is_hard() {
    let engine = engine_with_db().await;
    let created = seed(&engine, "Taxi", 18.0, "2025-03-04").await;

    engine.delete_expense(&created.id).await.unwrap();

    assert!(matches!(
        engine.expense(&created.id).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_expense(&created.id).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn list_pages_with_exact_total() {
    let engine = engine_with_db().await;
    for day in 1..=25 {
        seed(&engine, &format!("Item {day}"), day as f64, &format!("2025-01-{day:02}")).await;
    }

    let page = engine
        .list_expenses(&list(None, "expense_date", "desc", "3", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].expense_date, "2025-01-05");
    assert_eq!(page.items[4].expense_date, "2025-01-01");

    let page = engine
        .list_expenses(&list(None, "expense_date", "desc", "9", "10"))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 25);
}

#[tokio::test]
async fn list_sorts_by_requested_column() {
    let engine = engine_with_db().await;
    seed(&engine, "b", 30.0, "2025-01-01").await;
    seed(&engine, "a", 10.0, "2025-01-03").await;
    seed(&engine, "c", 20.0, "2025-01-02").await;

    let page = engine
        .list_expenses(&list(None, "amount", "asc", "1", "10"))
        .await
        .unwrap();
    let amounts: Vec<_> = page.items.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, [10.0, 20.0, 30.0]);

    let page = engine
        .list_expenses(&list(None, "title", "desc", "1", "10"))
        .await
        .unwrap();
    let titles: Vec<_> = page.items.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["c", "b", "a"]);
}

#[tokio::test]
async fn invalid_sort_by_lists_like_expense_date() {
    let engine = engine_with_db().await;
    seed(&engine, "b", 30.0, "2025-01-01").await;
    seed(&engine, "a", 10.0, "2025-01-03").await;
    seed(&engine, "c", 20.0, "2025-01-02").await;

    let invalid = engine
        .list_expenses(&list(None, "foo", "bogus", "1", "10"))
        .await
        .unwrap();
    let explicit = engine
        .list_expenses(&list(None, "expense_date", "desc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(invalid, explicit);
    assert_eq!(invalid.items[0].title, "a");
}

#[tokio::test]
async fn oversized_page_is_clamped() {
    let engine = engine_with_db().await;
    for i in 0..105 {
        seed(&engine, &format!("Item {i}"), 1.0, "2025-01-01").await;
    }

    let page = engine
        .list_expenses(&list(None, "amount", "asc", "0", "1000"))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total, 105);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let engine = engine_with_db().await;
    seed(&engine, "50% off shoes", 40.0, "2025-01-01").await;
    seed(&engine, "500 items off", 10.0, "2025-01-02").await;
    seed(&engine, "a_b", 1.0, "2025-01-03").await;
    seed(&engine, "axb", 1.0, "2025-01-04").await;

    let page = engine
        .list_expenses(&list(Some("50% off"), "expense_date", "desc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "50% off shoes");

    let page = engine
        .list_expenses(&list(Some("a_b"), "expense_date", "desc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "a_b");
}

#[tokio::test]
async fn search_matches_title_or_description_ignoring_case() {
    let engine = engine_with_db().await;
    engine
        .create_expense(NewExpenseCmd::new("Monthly rent", 900.0, "2025-01-01"))
        .await
        .unwrap();
    engine
        .create_expense(NewExpenseCmd::new("Transfer", 900.0, "2025-01-02").description("RENT share"))
        .await
        .unwrap();
    seed(&engine, "Coffee", 3.0, "2025-01-03").await;

    let page = engine
        .list_expenses(&list(Some("  rent "), "expense_date", "asc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let titles: Vec<_> = page.items.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Monthly rent", "Transfer"]);

    let page = engine
        .list_expenses(&list(Some("   "), "expense_date", "asc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let engine = engine_with_db().await;
    seed(&engine, "CAFÉ NOIR", 4.5, "2025-01-01").await;
    engine
        .create_expense(
            NewExpenseCmd::new("Dessert", 7.0, "2025-01-02").description("Crème BRÛLÉE"),
        )
        .await
        .unwrap();
    let renamed = seed(&engine, "Tea", 2.0, "2025-01-03").await;

    let page = engine
        .list_expenses(&list(Some("café"), "expense_date", "asc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "CAFÉ NOIR");

    let page = engine
        .list_expenses(&list(Some("brûlée"), "expense_date", "asc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Dessert");

    engine
        .update_expense(&renamed.id, UpdateExpenseCmd::default().title("ÉCLAIR"))
        .await
        .unwrap();
    let page = engine
        .list_expenses(&list(Some("éclair"), "expense_date", "asc", "1", "10"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, renamed.id);
}

#[tokio::test]
async fn all_expenses_are_newest_first() {
    let engine = engine_with_db().await;
    seed(&engine, "old", 1.0, "2024-01-01").await;
    seed(&engine, "new", 1.0, "2025-01-01").await;
    seed(&engine, "mid", 1.0, "2024-06-01").await;

    let titles: Vec<_> = engine
        .all_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["new", "mid", "old"]);
}

#[tokio::test]
async fn dashboard_reads_every_expense() {
    let engine = engine_with_db().await;
    engine
        .create_expense(NewExpenseCmd::new("Rent", 100.0, "2025-06-02").category("RENT"))
        .await
        .unwrap();
    engine
        .create_expense(NewExpenseCmd::new("Food", 50.0, "2025-05-20").category("FOOD"))
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let dashboard = engine.dashboard(today).await.unwrap();

    assert_eq!(dashboard.kpis.this_month.value, 100.0);
    assert_eq!(dashboard.kpis.this_month.prev_value, 50.0);
    assert_eq!(dashboard.kpis.this_month.trend_percent, 100.0);
    assert_eq!(dashboard.kpis.this_month.trend_label, "Up from last month");
    assert_eq!(dashboard.kpis.total_expenses.value, 150.0);
    assert_eq!(dashboard.by_category[0].category, Category::Rent);
    assert_eq!(dashboard.by_category[1].category, Category::Food);
}

#[tokio::test]
async fn ping_reaches_the_store() {
    let engine = engine_with_db().await;
    engine.ping().await.unwrap();
}

#[tokio::test]
async fn builder_without_store_fails() {
    assert!(matches!(
        Engine::builder().build(),
        Err(EngineError::Store(_))
    ));
}
