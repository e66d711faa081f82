use crate::core::mapping::MappingSpec;
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 映射規格檔：TOML `[fields]` 表，鍵為輸出路徑、值為來源表頭
///
/// ```toml
/// [fields]
/// id = "Product ID"
/// "name.en" = "Name EN"
/// "name.fr" = "Name FR"
/// price = "Price Tag"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingFile {
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl MappingFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Err(EtlError::InputError {
                message: format!("Mapping file not found: {}", path.as_ref().display()),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| EtlError::ConfigError {
            message: format!("Mapping TOML parsing error: {}", e),
        })
    }

    /// 轉為已驗證的映射規格；格式錯誤的路徑在這裡被攔下
    pub fn to_spec(&self) -> Result<MappingSpec> {
        MappingSpec::from_pairs(&self.fields)
    }
}
