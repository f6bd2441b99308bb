// 🧠 Memory Catalog - Snapshot of the catalog held in process
//
// Readers take a read lock per lookup; ingestion swaps the whole snapshot, so a
// query observes either the old catalog or the new one, never a mix.

use std::sync::{Arc, RwLock};

use crate::catalog::predicate::{check_predicates, Catalog, Predicate};
use crate::catalog::records::{CatalogRecord, Family};
use crate::error::CatalogError;

#[derive(Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<RwLock<Vec<CatalogRecord>>>,
}

impl MemoryCatalog {
    /// Create new empty catalog
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        MemoryCatalog {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn insert(&self, record: CatalogRecord) -> Result<(), CatalogError> {
        self.records.write().map_err(poisoned)?.push(record);
        Ok(())
    }

    pub fn extend(&self, records: impl IntoIterator<Item = CatalogRecord>) -> Result<(), CatalogError> {
        self.records.write().map_err(poisoned)?.extend(records);
        Ok(())
    }

    /// Swap in a freshly ingested catalog
    pub fn replace_all(&self, records: Vec<CatalogRecord>) -> Result<(), CatalogError> {
        *self.records.write().map_err(poisoned)? = records;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, CatalogError> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }

    /// Count records of one family
    pub fn count(&self, family: Family) -> Result<usize, CatalogError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().filter(|rec| rec.family() == family).count())
    }
}

impl Catalog for MemoryCatalog {
    fn find(
        &self,
        family: Family,
        predicates: &[Predicate],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        check_predicates(family, predicates)?;

        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|record| record.family() == family)
            .filter(|record| predicates.iter().all(|p| p.matches(record)))
            .cloned()
            .collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CatalogError {
    CatalogError::Unavailable("catalog lock poisoned".to_string())
}
