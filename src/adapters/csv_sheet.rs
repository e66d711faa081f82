use crate::domain::model::Record;
use crate::domain::ports::{SheetReader, SheetWriter};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// 儲存格純量推斷：整數、浮點數，其餘保留為字串
fn infer_scalar(raw: &str) -> serde_json::Value {
    if let Ok(int) = raw.parse::<i64>() {
        return serde_json::Value::Number(int.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return serde_json::Value::Number(number);
        }
    }
    serde_json::Value::String(raw.to_string())
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// CSV 試算表讀取端：首列為表頭，空儲存格視為缺席
#[derive(Debug, Clone, Default)]
pub struct CsvSheetReader;

impl CsvSheetReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SheetReader for CsvSheetReader {
    async fn read_rows(&self, path: &str) -> Result<Vec<Record>> {
        if !Path::new(path).exists() {
            return Err(EtlError::InputError {
                message: format!("Source file not found: {}", path),
            });
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut data = HashMap::new();
            for (index, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                if let Some(header) = headers.get(index) {
                    data.insert(header.to_string(), infer_scalar(cell));
                }
            }
            records.push(Record { data });
        }

        tracing::debug!("📥 Read {} rows from {}", records.len(), path);
        Ok(records)
    }
}

/// CSV 試算表寫入端：欄位取所有記錄鍵的排序聯集，一筆記錄一列
#[derive(Debug, Clone, Default)]
pub struct CsvSheetWriter;

impl CsvSheetWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SheetWriter for CsvSheetWriter {
    async fn write_rows(&self, path: &str, records: &[Record]) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let columns: BTreeSet<String> = records
            .iter()
            .flat_map(|record| record.data.keys().cloned())
            .collect();

        let mut writer = csv::Writer::from_path(path)?;
        if !columns.is_empty() {
            writer.write_record(&columns)?;

            for record in records {
                let row: Vec<String> = columns
                    .iter()
                    .map(|column| record.data.get(column).map(cell_text).unwrap_or_default())
                    .collect();
                writer.write_record(&row)?;
            }
        }

        writer.flush()?;
        tracing::debug!("💾 Wrote {} rows to {}", records.len(), path);
        Ok(())
    }
}
