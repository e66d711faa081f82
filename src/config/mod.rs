#[cfg(feature = "cli")]
pub mod cli;
pub mod mapping_file;

use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_database_path() -> String {
    "./data/sheetload.db".to_string()
}

fn default_collection() -> String {
    "products".to_string()
}

fn default_id_prefix() -> String {
    "spb".to_string()
}

fn default_counter_key() -> String {
    "record_seq".to_string()
}

/// 應用層配置：資料庫路徑、目標集合、識別碼前綴與計數器鍵
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default = "default_counter_key")]
    pub counter_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            collection: default_collection(),
            id_prefix: default_id_prefix(),
            counter_key: default_counter_key(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!(
                "Cannot read configuration file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 `${VAR}` 形式的環境變數
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 載入預設位置的配置檔（./sheetload.toml），不存在時使用內建預設值
    pub fn load_default() -> Result<Self> {
        let default_path = "./sheetload.toml";
        if Path::new(default_path).exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("database_path", &self.database_path)?;
        validation::validate_non_empty_string("collection", &self.collection)?;
        validation::validate_non_empty_string("id_prefix", &self.id_prefix)?;
        validation::validate_non_empty_string("counter_key", &self.counter_key)?;
        Ok(())
    }
}
