//! Runtime: actor на стол и пул столов.
//!
//! Пул только маршрутизирует: tableId -> хэндл actor'а. Всё состояние
//! игры живёт внутри соответствующей TableSession.

pub mod table_actor;

use std::collections::HashMap;

use crate::domain::table::TableConfig;
use crate::domain::TableId;
use crate::engine::errors::EngineError;
use crate::engine::session::TableSession;
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;
use crate::infra::ledger::Ledger;
use crate::infra::persistence::HandRecordStore;

pub use table_actor::{spawn_table, TableCommand, TableHandle};

/// Пул столов сервера.
pub struct TablesPool {
    tables: HashMap<TableId, TableHandle>,
    table_ids: IdGenerator,
}

impl Default for TablesPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TablesPool {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            table_ids: IdGenerator::new(),
        }
    }

    /// Создать стол и запустить его actor.
    pub fn create_table<R>(
        &mut self,
        name: String,
        config: TableConfig,
        rng: R,
        ledger: Box<dyn Ledger>,
        store: Box<dyn HandRecordStore>,
    ) -> TableHandle
    where
        R: RandomSource + Send + 'static,
    {
        let table_id = self.table_ids.next_id();
        let session = TableSession::new(table_id, name, config, rng, ledger, store);
        let handle = spawn_table(session);
        self.tables.insert(table_id, handle.clone());
        handle
    }

    /// Хэндл стола по id.
    pub fn handle(&self, table_id: TableId) -> Result<TableHandle, EngineError> {
        self.tables
            .get(&table_id)
            .cloned()
            .ok_or(EngineError::TableNotFound(table_id))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Убрать стол из маршрутизации. Actor остановится, когда будет
    /// сброшен последний хэндл.
    pub fn remove(&mut self, table_id: TableId) -> Option<TableHandle> {
        self.tables.remove(&table_id)
    }
}
