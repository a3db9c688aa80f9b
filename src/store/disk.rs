use crate::core::table::{KeyCondition, RateTable};
use crate::core::ExchangeRateRecord;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// Persistent table on a fjall keyspace.
///
/// Records live in a partition named after the table, keyed by `currency#date`.
/// The timestamp index is a second partition keyed by `date#currency` whose values
/// are the primary keys, so an equality lookup on the date is a prefix scan.
pub struct DiskTable {
    keyspace: Keyspace,
    items: PartitionHandle,
    index: PartitionHandle,
    index_name: String,
}

fn primary_key(currency: &str, date: NaiveDate) -> String {
    format!("{currency}#{date}")
}

fn index_key(date: NaiveDate, currency: &str) -> String {
    format!("{date}#{currency}")
}

impl DiskTable {
    pub fn open(path: &Path, table: &str, index: &str) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create store directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let items = keyspace
            .open_partition(table, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open table {table}"))?;
        let index_partition = keyspace
            .open_partition(index, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open index {index}"))?;
        debug!("Opened table {} at {}", table, path.display());

        Ok(Self {
            keyspace,
            items,
            index: index_partition,
            index_name: index.to_string(),
        })
    }

    fn write(&self, items: &[ExchangeRateRecord]) -> Result<()> {
        let mut batch = self.keyspace.batch();
        for item in items {
            let key = primary_key(&item.currency, item.timestamp);
            batch.insert(&self.items, key.as_bytes(), serde_json::to_vec(item)?);
            batch.insert(
                &self.index,
                index_key(item.timestamp, &item.currency).as_bytes(),
                key.as_bytes(),
            );
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl RateTable for DiskTable {
    async fn put_item(&self, item: ExchangeRateRecord) -> Result<()> {
        debug!("Table PUT {} @ {}", item.currency, item.timestamp);
        self.write(std::slice::from_ref(&item))
            .with_context(|| format!("Failed to store rate for {}", item.currency))
    }

    async fn batch_write(&self, items: Vec<ExchangeRateRecord>) -> Result<()> {
        debug!("Table BATCH PUT of {} items", items.len());
        self.write(&items).context("Failed to store batch of rates")
    }

    async fn query(
        &self,
        index: &str,
        condition: KeyCondition,
    ) -> Result<Vec<ExchangeRateRecord>> {
        if index != self.index_name {
            bail!("Table has no index named {}", index);
        }
        let KeyCondition::TimestampEq(date) = condition;

        let prefix = format!("{date}#");
        let mut records = Vec::new();
        for entry in self.index.prefix(prefix.as_bytes()) {
            let (_, key) = entry?;
            let Some(value) = self.items.get(&key)? else {
                continue;
            };
            let record: ExchangeRateRecord = serde_json::from_slice(&value)
                .with_context(|| format!("Corrupt record {}", String::from_utf8_lossy(&key)))?;
            records.push(record);
        }
        debug!("Table QUERY {} returned {} items", condition, records.len());
        Ok(records)
    }
}
