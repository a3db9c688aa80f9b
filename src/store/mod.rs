pub mod disk;
pub mod memory;

use crate::core::RateTable;
use crate::core::config::AppConfig;
use anyhow::Result;
use disk::DiskTable;
use std::sync::Arc;

/// Opens the configured persistent table. Every invocation opens its own.
pub fn open_table(config: &AppConfig) -> Result<Arc<dyn RateTable>> {
    let path = config.data_path()?.join("store");
    let table = DiskTable::open(&path, &config.store.table, &config.store.index)?;
    Ok(Arc::new(table))
}
