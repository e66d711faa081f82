pub mod exporter;
pub mod importer;
pub mod mapping;
pub mod sequence;
pub mod stats;

pub use crate::domain::model::Record;
pub use crate::domain::ports::{RecordStore, SheetReader, SheetWriter};
pub use crate::utils::error::Result;
