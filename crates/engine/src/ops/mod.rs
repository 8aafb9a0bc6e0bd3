use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine,
    store::{ExpenseStore, SqlStore},
};

mod dashboard;
mod expenses;

/// Entry point of the engine.
///
/// Holds no request state: every call goes to the record store, so a single
/// `Engine` can be shared by all requests.
#[derive(Clone, Debug)]
pub struct Engine {
    store: Arc<dyn ExpenseStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn ExpenseStore>>,
}

impl EngineBuilder {
    /// Use any record store.
    pub fn store(mut self, store: impl ExpenseStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use a sea-orm database as record store.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.store(SqlStore::new(db))
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Store("no record store configured".to_string()))?;
        Ok(Engine { store })
    }
}
