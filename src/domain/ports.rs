use crate::domain::model::Record;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 試算表讀取端：首列為表頭，一列一筆記錄
#[async_trait]
pub trait SheetReader: Send + Sync {
    async fn read_rows(&self, path: &str) -> Result<Vec<Record>>;
}

/// 試算表寫入端：扁平記錄序列化為單一工作表
#[async_trait]
pub trait SheetWriter: Send + Sync {
    async fn write_rows(&self, path: &str, records: &[Record]) -> Result<()>;
}

/// 持久化儲存端：批次寫入、查詢、刪除與具名計數器
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<usize>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Record>>;

    async fn delete_all(&self, collection: &str) -> Result<usize>;

    /// 原子遞增計數器並回傳遞增後的值；計數器不存在時隱含從 0 開始
    async fn counter_next(&self, key: &str) -> Result<i64>;

    async fn counter_set(&self, key: &str, value: i64) -> Result<()>;

    async fn counter_current(&self, key: &str) -> Result<i64>;
}
