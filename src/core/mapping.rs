use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// 輸出欄位路徑：頂層欄位或單層巢狀（parent.child）
///
/// 以標記型別取代臨時字串切割，超過一層的路徑在解析時即被拒絕，
/// 不會進入映射引擎。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Top(String),
    Nested { parent: String, child: String },
}

impl FieldPath {
    /// 解析原始路徑字串；空白段或超過一個 `.` 分隔符視為格式錯誤
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('.').collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(EtlError::InputError {
                message: format!("Malformed mapping path '{}': empty path segment", raw),
            });
        }

        match segments.as_slice() {
            [top] => Ok(FieldPath::Top((*top).to_string())),
            [parent, child] => Ok(FieldPath::Nested {
                parent: (*parent).to_string(),
                child: (*child).to_string(),
            }),
            _ => Err(EtlError::InputError {
                message: format!(
                    "Malformed mapping path '{}': at most one nesting level is supported",
                    raw
                ),
            }),
        }
    }
}

/// 欄位映射規格：輸出路徑 → 來源表頭
///
/// 空規格是合法輸入，代表原樣通過（identity pass-through）。
#[derive(Debug, Clone, Default)]
pub struct MappingSpec {
    entries: Vec<(FieldPath, String)>,
}

impl MappingSpec {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 從（輸出路徑 → 來源表頭）配對建立規格，路徑逐一驗證
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Result<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (output_path, source_header) in pairs {
            entries.push((FieldPath::parse(output_path)?, source_header.clone()));
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(FieldPath, String)] {
        &self.entries
    }
}

/// 映射引擎：將一筆原始列投影為輸出記錄
///
/// 純函數，無 I/O、無共享狀態，對任何輸入都不會失敗：
/// - 空規格回傳原始列的複本（含既有的非純量結構）
/// - 非空規格只保留規格中出現的欄位，其餘來源欄位一律捨棄
/// - 來源表頭不存在時，對應輸出欄位缺席，不補預設值
/// - 共享同一 parent 的巢狀路徑合併進同一個物件
pub fn map_row_data(row: &Record, mapping: &MappingSpec) -> Record {
    if mapping.is_empty() {
        return row.clone();
    }

    let mut data = HashMap::new();

    for (path, source_header) in mapping.entries() {
        let Some(value) = row.data.get(source_header) else {
            continue;
        };

        match path {
            FieldPath::Top(name) => {
                data.insert(name.clone(), value.clone());
            }
            FieldPath::Nested { parent, child } => {
                let slot = data
                    .entry(parent.clone())
                    .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
                if let serde_json::Value::Object(object) = slot {
                    object.insert(child.clone(), value.clone());
                }
            }
        }
    }

    Record { data }
}
