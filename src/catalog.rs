// Offer catalog: the single owner of the indexed store, shared by the transport layer

use crate::config::CatalogConfig;
use crate::entities::{OfferRecord, OfferUpdate};
use crate::error::{BatchError, CatalogError};
use crate::search::{self, SearchResult};
use crate::store::IndexedStore;
use crate::upsert::{apply_updates, UpsertOutcome};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub struct CatalogStats {
    pub searches: AtomicUsize,
    pub empty_searches: AtomicUsize,
    pub city_misses: AtomicUsize,
    pub batches: AtomicUsize,
    pub updates_applied: AtomicUsize,
    pub updates_replaced: AtomicUsize,
    pub updates_rejected: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStatsReport {
    pub searches: usize,
    pub empty_searches: usize,
    pub city_misses: usize,
    pub batches: usize,
    pub updates_applied: usize,
    pub updates_replaced: usize,
    pub updates_rejected: usize,
    pub hotels_with_offers: usize,
    pub offers: usize,
}

// Search and update surface consumed by the transport layer
#[async_trait]
pub trait OfferCatalog: Send + Sync + 'static {
    // Hotels in `city_name` with offers available for the whole window
    async fn search(
        &self,
        city_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SearchResult, CatalogError>;

    // Upsert a batch of offers; reports the first rejected item
    async fn update(&self, updates: Vec<OfferUpdate>) -> Result<UpsertOutcome, BatchError>;

    fn stats(&self) -> CatalogStatsReport;
}

/// Lock-guarded catalog.
///
/// Searches run under the read lock for the whole filter and compose pass, a
/// batch of updates holds the write lock until the batch finishes. Callers
/// only ever get owned copies out of the store.
#[derive(Debug, Clone)]
pub struct HotelCatalog {
    store: Arc<RwLock<IndexedStore>>,
    config: CatalogConfig,
    stats: Arc<CatalogStats>,
}

impl HotelCatalog {
    pub fn new(store: IndexedStore, config: CatalogConfig) -> Self {
        info!(
            cities = store.cities().len(),
            hotels = store.hotels().len(),
            advertisers = store.advertisers().len(),
            offers = store.offer_count(),
            batch_mode = ?config.batch_mode,
            "catalog ready"
        );
        Self {
            store: Arc::new(RwLock::new(store)),
            config,
            stats: Arc::new(CatalogStats::default()),
        }
    }

    // Owned copy of a hotel's stored offers, in storage order
    pub fn offers_for(&self, hotel_id: i32) -> Vec<OfferRecord> {
        self.store
            .read()
            .offers_for(hotel_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OfferCatalog for HotelCatalog {
    async fn search(
        &self,
        city_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SearchResult, CatalogError> {
        self.stats.searches.fetch_add(1, Ordering::SeqCst);

        let result = {
            let store = self.store.read();
            search::search(&store, city_name, start, end)
        };

        match &result {
            Ok(found) if found.is_empty() => {
                self.stats.empty_searches.fetch_add(1, Ordering::SeqCst);
                debug!(city = city_name, %start, %end, "no offers found");
            }
            Ok(_) => {}
            Err(CatalogError::CityNotFound(_)) => {
                self.stats.city_misses.fetch_add(1, Ordering::SeqCst);
                debug!(city = city_name, "city not found");
            }
            Err(err) => error!(%err, "search failed"),
        }
        result
    }

    async fn update(&self, updates: Vec<OfferUpdate>) -> Result<UpsertOutcome, BatchError> {
        self.stats.batches.fetch_add(1, Ordering::SeqCst);

        let result = {
            let mut store = self.store.write();
            apply_updates(&mut store, &updates, self.config.batch_mode)
        };

        let (applied, replaced) = match &result {
            Ok(outcome) => (outcome.applied, outcome.replaced),
            Err(err) => {
                self.stats.updates_rejected.fetch_add(1, Ordering::SeqCst);
                (err.applied, err.replaced)
            }
        };
        self.stats.updates_applied.fetch_add(applied, Ordering::SeqCst);
        self.stats
            .updates_replaced
            .fetch_add(replaced, Ordering::SeqCst);

        result
    }

    fn stats(&self) -> CatalogStatsReport {
        let store = self.store.read();
        CatalogStatsReport {
            searches: self.stats.searches.load(Ordering::SeqCst),
            empty_searches: self.stats.empty_searches.load(Ordering::SeqCst),
            city_misses: self.stats.city_misses.load(Ordering::SeqCst),
            batches: self.stats.batches.load(Ordering::SeqCst),
            updates_applied: self.stats.updates_applied.load(Ordering::SeqCst),
            updates_replaced: self.stats.updates_replaced.load(Ordering::SeqCst),
            updates_rejected: self.stats.updates_rejected.load(Ordering::SeqCst),
            hotels_with_offers: store.offers().values().filter(|s| !s.is_empty()).count(),
            offers: store.offer_count(),
        }
    }
}
