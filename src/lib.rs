pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{Cli, Command};

pub use crate::adapters::{CsvSheetReader, CsvSheetWriter, SqliteStore};
pub use crate::config::AppConfig;
pub use crate::core::importer::{ImportOptions, Importer};
pub use crate::core::mapping::{map_row_data, FieldPath, MappingSpec};
pub use crate::core::sequence::SequenceGenerator;
pub use crate::utils::error::{EtlError, Result};
