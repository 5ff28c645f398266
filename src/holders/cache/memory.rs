/// In-process tier: fastest, lost on restart
use async_trait::async_trait;
use parking_lot::RwLock;

use super::CacheTier;
use crate::holders::errors::CacheError;
use crate::holders::types::HolderCountRecord;

#[derive(Debug, Default)]
pub struct MemoryTier {
    record: RwLock<Option<HolderCountRecord>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<HolderCountRecord> {
        self.record.read().clone()
    }

    pub fn clear(&self) {
        *self.record.write() = None;
    }
}

#[async_trait]
impl CacheTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> Result<Option<HolderCountRecord>, CacheError> {
        Ok(self.get())
    }

    async fn write(&self, record: &HolderCountRecord) -> Result<(), CacheError> {
        *self.record.write() = Some(record.clone());
        Ok(())
    }
}
