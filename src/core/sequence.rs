use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// 將序號格式化為 `{prefix}-{n}`，最小寬度 4 位數零填補，超出寬度不截斷
pub fn format_id(prefix: &str, value: i64) -> String {
    format!("{}-{:04}", prefix, value)
}

/// 序號產生器：對單一具名計數器做原子遞增，發出帶前綴的流水識別碼
///
/// 整個目標資料集共用一個計數器（不依前綴或集合分鍵）。每次呼叫
/// 都是對持久化儲存的單一原子 find-and-increment，絕不在客戶端
/// 快取計數值，儲存失敗時原樣向外傳播。
pub struct SequenceGenerator<S: RecordStore> {
    store: Arc<S>,
    counter_key: String,
}

impl<S: RecordStore> SequenceGenerator<S> {
    pub fn new(store: Arc<S>, counter_key: String) -> Self {
        Self { store, counter_key }
    }

    /// 遞增計數器並回傳格式化後的識別碼；新計數器的第一次呼叫回傳 `{prefix}-0001`
    pub async fn next_id(&self, prefix: &str) -> Result<String> {
        let value = self.store.counter_next(&self.counter_key).await?;
        Ok(format_id(prefix, value))
    }

    /// 將計數器歸零；下一次 next_id 重新從 `{prefix}-0001` 開始
    pub async fn reset(&self) -> Result<()> {
        self.store.counter_set(&self.counter_key, 0).await?;
        tracing::debug!("🔁 Sequence counter '{}' reset to 0", self.counter_key);
        Ok(())
    }

    /// 讀取目前計數值（不遞增），計數器不存在時為 0
    pub async fn current(&self) -> Result<i64> {
        self.store.counter_current(&self.counter_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MemoryStore {
        records: Mutex<HashMap<String, Vec<Record>>>,
        counters: Mutex<HashMap<String, i64>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                counters: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<usize> {
            let mut store = self.records.lock().await;
            store
                .entry(collection.to_string())
                .or_default()
                .extend(records.iter().cloned());
            Ok(records.len())
        }

        async fn find_all(&self, collection: &str) -> Result<Vec<Record>> {
            let store = self.records.lock().await;
            Ok(store.get(collection).cloned().unwrap_or_default())
        }

        async fn delete_all(&self, collection: &str) -> Result<usize> {
            let mut store = self.records.lock().await;
            Ok(store.remove(collection).map(|r| r.len()).unwrap_or(0))
        }

        async fn counter_next(&self, key: &str) -> Result<i64> {
            // 單一鎖內完成讀改寫，模擬儲存端的原子 upsert
            let mut counters = self.counters.lock().await;
            let value = counters.entry(key.to_string()).or_insert(0);
            *value += 1;
            Ok(*value)
        }

        async fn counter_set(&self, key: &str, value: i64) -> Result<()> {
            let mut counters = self.counters.lock().await;
            counters.insert(key.to_string(), value);
            Ok(())
        }

        async fn counter_current(&self, key: &str) -> Result<i64> {
            let counters = self.counters.lock().await;
            Ok(counters.get(key).copied().unwrap_or(0))
        }
    }

    fn generator(store: &Arc<MemoryStore>) -> SequenceGenerator<MemoryStore> {
        SequenceGenerator::new(Arc::clone(store), "record_seq".to_string())
    }

    #[test]
    fn test_format_id_pads_to_four_digits() {
        assert_eq!(format_id("spb", 7), "spb-0007");
        assert_eq!(format_id("spb", 42), "spb-0042");
        assert_eq!(format_id("spb", 9999), "spb-9999");
    }

    #[test]
    fn test_format_id_does_not_truncate_above_width() {
        assert_eq!(format_id("spb", 10000), "spb-10000");
        assert_eq!(format_id("spb", 12345), "spb-12345");
    }

    #[tokio::test]
    async fn test_first_call_on_fresh_counter() {
        let store = Arc::new(MemoryStore::new());
        let sequence = generator(&store);

        assert_eq!(sequence.next_id("spb").await.unwrap(), "spb-0001");
        assert_eq!(sequence.next_id("spb").await.unwrap(), "spb-0002");
    }

    #[tokio::test]
    async fn test_counter_at_six_yields_0007() {
        let store = Arc::new(MemoryStore::new());
        let sequence = generator(&store);

        store.counter_set("record_seq", 6).await.unwrap();

        assert_eq!(sequence.next_id("spb").await.unwrap(), "spb-0007");
    }

    #[tokio::test]
    async fn test_counter_at_9999_yields_10000() {
        let store = Arc::new(MemoryStore::new());
        let sequence = generator(&store);

        store.counter_set("record_seq", 9999).await.unwrap();

        assert_eq!(sequence.next_id("spb").await.unwrap(), "spb-10000");
    }

    #[tokio::test]
    async fn test_reset_restarts_from_0001() {
        let store = Arc::new(MemoryStore::new());
        let sequence = generator(&store);

        sequence.next_id("spb").await.unwrap();
        sequence.next_id("spb").await.unwrap();
        sequence.reset().await.unwrap();

        assert_eq!(sequence.next_id("spb").await.unwrap(), "spb-0001");
    }

    #[tokio::test]
    async fn test_concurrent_calls_yield_distinct_ids() {
        let store = Arc::new(MemoryStore::new());
        let count = 20;

        let mut handles = Vec::new();
        for _ in 0..count {
            let sequence = generator(&store);
            handles.push(tokio::spawn(
                async move { sequence.next_id("spb").await },
            ));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count, "concurrent calls must never share an id");

        let expected: Vec<String> = (1..=count as i64).map(|n| format_id("spb", n)).collect();
        let mut sorted_expected = expected.clone();
        sorted_expected.sort();
        assert_eq!(ids, sorted_expected);
    }

    #[tokio::test]
    async fn test_current_reads_without_increment() {
        let store = Arc::new(MemoryStore::new());
        let sequence = generator(&store);

        assert_eq!(sequence.current().await.unwrap(), 0);
        sequence.next_id("spb").await.unwrap();
        assert_eq!(sequence.current().await.unwrap(), 1);
        assert_eq!(sequence.current().await.unwrap(), 1);
    }
}
