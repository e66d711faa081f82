use crate::core::mapping::{map_row_data, MappingSpec};
use crate::core::sequence::SequenceGenerator;
use crate::domain::model::{ImportReport, Record};
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;

/// 匯入選項
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// 寫入前先清空目標集合（啟用識別碼時同時歸零計數器）
    pub clear_existing: bool,
    /// 是否為每筆記錄產生流水識別碼
    pub generate_id: bool,
    /// 傳給序號產生器的前綴
    pub id_prefix: String,
}

impl ImportOptions {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            clear_existing: false,
            generate_id: true,
            id_prefix: id_prefix.into(),
        }
    }
}

/// 匯入協調器：逐列套用映射引擎、按需附加識別碼與時間戳，
/// 最後以單一批次交給儲存端
///
/// 列嚴格依輸入順序處理，識別碼也依同一順序發出。任何一列的
/// 識別碼產生失敗或批次寫入失敗，整批視為失敗，不做部分回復，
/// 已寫入的資料也不回滾。
pub struct Importer<S: RecordStore> {
    store: Arc<S>,
    sequence: SequenceGenerator<S>,
    collection: String,
}

impl<S: RecordStore> Importer<S> {
    pub fn new(store: Arc<S>, collection: impl Into<String>, counter_key: impl Into<String>) -> Self {
        let sequence = SequenceGenerator::new(Arc::clone(&store), counter_key.into());
        Self {
            store,
            sequence,
            collection: collection.into(),
        }
    }

    pub async fn ingest(
        &self,
        rows: Vec<Record>,
        mapping: &MappingSpec,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        if options.clear_existing {
            let removed = self.store.delete_all(&self.collection).await?;
            tracing::info!(
                "🧹 Cleared {} existing records from '{}'",
                removed,
                self.collection
            );
            if options.generate_id {
                self.sequence.reset().await?;
            }
        }

        let mut batch = Vec::with_capacity(rows.len());
        let mut generated_ids = Vec::new();

        for row in rows {
            let mut record = map_row_data(&row, mapping);

            if options.generate_id {
                let id = self.sequence.next_id(&options.id_prefix).await?;
                record
                    .data
                    .insert("id".to_string(), serde_json::Value::String(id.clone()));
                generated_ids.push(id);
            }

            let now = Utc::now().to_rfc3339();
            record.data.insert(
                "created_at".to_string(),
                serde_json::Value::String(now.clone()),
            );
            record
                .data
                .insert("updated_at".to_string(), serde_json::Value::String(now));

            batch.push(record);
        }

        let imported = self.store.insert_many(&self.collection, &batch).await?;
        tracing::info!("💾 Inserted {} records into '{}'", imported, self.collection);

        Ok(ImportReport {
            imported,
            generated_ids,
            records: batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SqliteStore;
    use serde_json::json;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Record {
        let mut data = HashMap::new();
        for (key, value) in pairs {
            data.insert((*key).to_string(), value.clone());
        }
        Record { data }
    }

    fn mapping(pairs: &[(&str, &str)]) -> MappingSpec {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(path, header)| ((*path).to_string(), (*header).to_string()))
            .collect();
        MappingSpec::from_pairs(&map).unwrap()
    }

    fn importer() -> Importer<SqliteStore> {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        Importer::new(store, "products", "record_seq")
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_input_order() {
        let importer = importer();
        let rows = vec![
            row(&[("Name", json!("A"))]),
            row(&[("Name", json!("B"))]),
            row(&[("Name", json!("C"))]),
        ];

        let report = importer
            .ingest(rows, &MappingSpec::empty(), &ImportOptions::new("spb"))
            .await
            .unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(
            report.generated_ids,
            vec!["spb-0001", "spb-0002", "spb-0003"]
        );
        assert_eq!(
            report.records[0].data.get("Name").unwrap(),
            &json!("A")
        );
        assert_eq!(
            report.records[0].data.get("id").unwrap(),
            &json!("spb-0001")
        );
    }

    #[tokio::test]
    async fn test_mapping_is_applied_per_row() {
        let importer = importer();
        let rows = vec![row(&[
            ("Name EN", json!("Brownie")),
            ("Name FR", json!("Petit Gateau")),
            ("Price Tag", json!(4.5)),
        ])];
        let spec = mapping(&[
            ("name.en", "Name EN"),
            ("name.fr", "Name FR"),
            ("price", "Price Tag"),
        ]);

        let report = importer
            .ingest(rows, &spec, &ImportOptions::new("spb"))
            .await
            .unwrap();

        let record = &report.records[0];
        assert_eq!(
            record.data.get("name").unwrap(),
            &json!({"en": "Brownie", "fr": "Petit Gateau"})
        );
        assert_eq!(record.data.get("price").unwrap(), &json!(4.5));
        assert!(!record.data.contains_key("Name EN"));
    }

    #[tokio::test]
    async fn test_timestamps_attached_to_every_record() {
        let importer = importer();
        let rows = vec![row(&[("Name", json!("A"))])];

        let mut options = ImportOptions::new("spb");
        options.generate_id = false;

        let report = importer
            .ingest(rows, &MappingSpec::empty(), &options)
            .await
            .unwrap();

        let record = &report.records[0];
        assert!(record.data.contains_key("created_at"));
        assert!(record.data.contains_key("updated_at"));
        assert!(!record.data.contains_key("id"));
        assert!(report.generated_ids.is_empty());
    }

    #[tokio::test]
    async fn test_reimport_without_clear_continues_sequence() {
        let importer = importer();
        let rows = vec![row(&[("Name", json!("A"))]), row(&[("Name", json!("B"))])];

        let options = ImportOptions::new("spb");
        importer
            .ingest(rows.clone(), &MappingSpec::empty(), &options)
            .await
            .unwrap();
        let second = importer
            .ingest(rows, &MappingSpec::empty(), &options)
            .await
            .unwrap();

        // 不去重：同樣的列再次匯入取得新的、更高的識別碼
        assert_eq!(second.generated_ids, vec!["spb-0003", "spb-0004"]);
    }

    #[tokio::test]
    async fn test_clear_existing_empties_collection_and_resets_counter() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let importer = Importer::new(Arc::clone(&store), "products", "record_seq");
        let rows = vec![row(&[("Name", json!("A"))]), row(&[("Name", json!("B"))])];

        let options = ImportOptions::new("spb");
        importer
            .ingest(rows.clone(), &MappingSpec::empty(), &options)
            .await
            .unwrap();

        let mut clearing = ImportOptions::new("spb");
        clearing.clear_existing = true;
        let report = importer
            .ingest(rows, &MappingSpec::empty(), &clearing)
            .await
            .unwrap();

        assert_eq!(report.generated_ids, vec!["spb-0001", "spb-0002"]);
        assert_eq!(store.find_all("products").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_without_generate_id_keeps_counter() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let importer = Importer::new(Arc::clone(&store), "products", "record_seq");
        let rows = vec![row(&[("Name", json!("A"))])];

        importer
            .ingest(rows.clone(), &MappingSpec::empty(), &ImportOptions::new("spb"))
            .await
            .unwrap();

        let mut options = ImportOptions::new("spb");
        options.clear_existing = true;
        options.generate_id = false;
        importer
            .ingest(rows.clone(), &MappingSpec::empty(), &options)
            .await
            .unwrap();

        // 未啟用識別碼的清空不動計數器
        let report = importer
            .ingest(rows, &MappingSpec::empty(), &ImportOptions::new("spb"))
            .await
            .unwrap();
        assert_eq!(report.generated_ids, vec!["spb-0002"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop_import() {
        let importer = importer();

        let report = importer
            .ingest(Vec::new(), &MappingSpec::empty(), &ImportOptions::new("spb"))
            .await
            .unwrap();

        assert_eq!(report.imported, 0);
        assert!(report.generated_ids.is_empty());
    }
}
