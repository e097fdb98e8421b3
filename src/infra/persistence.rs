use log::warn;

use crate::engine::hand_history::HandRecord;

/// Интерфейс хранилища записей завершённых раздач.
///
/// Запись пишется один раз при расчёте и дальше только читается;
/// долговременное хранение и запросы истории — внешняя забота.
pub trait HandRecordStore: Send {
    fn append(&mut self, record: HandRecord);
    fn list(&self, table_id: u64) -> Vec<HandRecord>;
}

/// Хранилище в памяти: записи держим сериализованными в JSON, как их
/// получил бы внешний стор.
#[derive(Debug, Default)]
pub struct InMemoryHandStore {
    rows: Vec<(u64, String)>,
}

impl InMemoryHandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl HandRecordStore for InMemoryHandStore {
    fn append(&mut self, record: HandRecord) {
        match serde_json::to_string(&record) {
            Ok(json) => self.rows.push((record.table_id, json)),
            Err(e) => warn!("hand record serialization failed: {e}"),
        }
    }

    fn list(&self, table_id: u64) -> Vec<HandRecord> {
        self.rows
            .iter()
            .filter(|(tid, _)| *tid == table_id)
            .filter_map(|(_, json)| serde_json::from_str(json).ok())
            .collect()
    }
}
