use crate::domain::model::{ExportReport, Record};
use crate::domain::ports::{RecordStore, SheetWriter};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// 將單層巢狀物件攤平回 `parent.child` 欄位（映射引擎巢狀化的逆操作），
/// 寫入端只需處理扁平記錄
fn flatten_record(record: &Record) -> Record {
    let mut data = HashMap::new();

    for (key, value) in &record.data {
        match value {
            serde_json::Value::Object(object) => {
                for (child, child_value) in object {
                    data.insert(format!("{}.{}", key, child), child_value.clone());
                }
            }
            other => {
                data.insert(key.clone(), other.clone());
            }
        }
    }

    Record { data }
}

/// 匯出協調器：讀出整個集合、攤平後交給試算表寫入端
pub struct Exporter<S: RecordStore, W: SheetWriter> {
    store: Arc<S>,
    writer: W,
    collection: String,
}

impl<S: RecordStore, W: SheetWriter> Exporter<S, W> {
    pub fn new(store: Arc<S>, writer: W, collection: impl Into<String>) -> Self {
        Self {
            store,
            writer,
            collection: collection.into(),
        }
    }

    pub async fn export(&self, output_path: &str) -> Result<ExportReport> {
        let records = self.store.find_all(&self.collection).await?;
        let flat: Vec<Record> = records.iter().map(flatten_record).collect();

        self.writer.write_rows(output_path, &flat).await?;
        tracing::info!(
            "📤 Exported {} records from '{}' to {}",
            flat.len(),
            self.collection,
            output_path
        );

        Ok(ExportReport {
            exported: flat.len(),
            output_path: output_path.to_string(),
        })
    }
}
