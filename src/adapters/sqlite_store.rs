use crate::domain::model::Record;
use crate::domain::ports::RecordStore;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// 冪等建表 DDL
const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_records_collection ON records (collection);

CREATE TABLE IF NOT EXISTS counters (
    key TEXT PRIMARY KEY,
    value INTEGER NOT NULL DEFAULT 0
);
";

/// SQLite 持久化儲存：記錄集合與具名計數器
///
/// 以 `SqliteStore::open` 建立檔案型儲存，或以 `SqliteStore::in_memory`
/// 供測試使用。連線在啟動時建立一次，之後以共享所有權傳給所有需要
/// 儲存的元件；`Mutex<Connection>` 保證並發呼叫下的互斥。
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 開啟（或建立）指定路徑的資料庫檔案
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 建立記憶體資料庫（測試用）
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| EtlError::ProcessingError {
            message: "Storage connection lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<usize> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO records (collection, data) VALUES (?1, ?2)")?;
            for record in records {
                let data = serde_json::to_string(&record.data)?;
                stmt.execute(rusqlite::params![collection, data])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Record>> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT data FROM records WHERE collection = ?1 ORDER BY id")?;
        let rows = stmt.query_map([collection], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            let data = serde_json::from_str(&row?)?;
            records.push(Record { data });
        }
        Ok(records)
    }

    async fn delete_all(&self, collection: &str) -> Result<usize> {
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM records WHERE collection = ?1", [collection])?;
        Ok(removed)
    }

    async fn counter_next(&self, key: &str) -> Result<i64> {
        // 單一語句完成 upsert 與遞增，並發呼叫不可能取得相同的值
        let conn = self.lock_conn()?;
        let value = conn.query_row(
            "INSERT INTO counters (key, value) VALUES (?1, 1) \
             ON CONFLICT(key) DO UPDATE SET value = value + 1 \
             RETURNING value",
            [key],
            |row| row.get(0),
        )?;
        Ok(value)
    }

    async fn counter_set(&self, key: &str, value: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO counters (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    async fn counter_current(&self, key: &str) -> Result<i64> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row("SELECT value FROM counters WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.unwrap_or(0))
    }
}
