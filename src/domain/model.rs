use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單筆記錄：原始列（表頭 → 儲存格值）與映射後記錄共用同一結構
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub imported: usize,
    pub generated_ids: Vec<String>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub exported: usize,
    pub output_path: String,
}

#[derive(Debug, Clone)]
pub struct StatsReport {
    pub total: usize,
    pub price_min: f64,
    pub price_max: f64,
    pub price_avg: f64,
    pub last_id: Option<String>,
    pub next_id: String,
}
