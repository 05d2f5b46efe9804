// Upsert engine: validates offer updates and applies them to the store

use crate::config::BatchMode;
use crate::entities::{OfferRecord, OfferUpdate};
use crate::error::{BatchError, CatalogError};
use crate::store::IndexedStore;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertOutcome {
    pub applied: usize,
    pub replaced: usize,
}

// Parse both dates and check the business rules. Nothing is mutated here.
pub fn validate_update(
    store: &IndexedStore,
    update: &OfferUpdate,
) -> Result<OfferRecord, CatalogError> {
    let record = OfferRecord::try_from(update)?;

    if record.price < 0 {
        return Err(CatalogError::Validation {
            field: "price",
            reason: format!("must be non-negative, got {}", record.price),
        });
    }
    if record.cpc < 0 {
        return Err(CatalogError::Validation {
            field: "cpc",
            reason: format!("must be non-negative, got {}", record.cpc),
        });
    }
    if record.availability_end_date < record.availability_start_date {
        return Err(CatalogError::Validation {
            field: "availability_end_date",
            reason: format!(
                "{} is before availability_start_date {}",
                update.availability_end_date, update.availability_start_date
            ),
        });
    }

    // Offers for entities the store does not hold would break later searches
    if store.hotel(record.hotel_id).is_none() {
        return Err(CatalogError::UnknownReference {
            kind: "hotel",
            id: record.hotel_id,
        });
    }
    if store.advertiser(record.advertiser_id).is_none() {
        return Err(CatalogError::UnknownReference {
            kind: "advertiser",
            id: record.advertiser_id,
        });
    }

    Ok(record)
}

/// Applies `updates` in input order.
///
/// Each successful item leaves exactly one record for its (hotel, advertiser)
/// pair. In [`BatchMode::Sequential`] the first rejected item stops the batch
/// and everything before it stays applied; in [`BatchMode::Atomic`] all items
/// are validated first and a rejection leaves the store untouched.
pub fn apply_updates(
    store: &mut IndexedStore,
    updates: &[OfferUpdate],
    mode: BatchMode,
) -> Result<UpsertOutcome, BatchError> {
    match mode {
        BatchMode::Sequential => apply_sequential(store, updates),
        BatchMode::Atomic => apply_atomic(store, updates),
    }
}

fn apply_sequential(
    store: &mut IndexedStore,
    updates: &[OfferUpdate],
) -> Result<UpsertOutcome, BatchError> {
    let mut outcome = UpsertOutcome::default();

    for (index, update) in updates.iter().enumerate() {
        let record = validate_update(store, update).map_err(|cause| {
            warn!(index, applied = outcome.applied, %cause, "update rejected");
            BatchError {
                index,
                applied: outcome.applied,
                replaced: outcome.replaced,
                cause,
            }
        })?;
        apply_one(store, record, &mut outcome);
    }

    Ok(outcome)
}

fn apply_atomic(
    store: &mut IndexedStore,
    updates: &[OfferUpdate],
) -> Result<UpsertOutcome, BatchError> {
    let records = updates
        .iter()
        .enumerate()
        .map(|(index, update)| {
            validate_update(store, update).map_err(|cause| {
                warn!(index, %cause, "update rejected, batch discarded");
                BatchError {
                    index,
                    applied: 0,
                    replaced: 0,
                    cause,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut outcome = UpsertOutcome::default();
    for record in records {
        apply_one(store, record, &mut outcome);
    }
    Ok(outcome)
}

fn apply_one(store: &mut IndexedStore, record: OfferRecord, outcome: &mut UpsertOutcome) {
    let (hotel_id, advertiser_id) = (record.hotel_id, record.advertiser_id);
    let (price, cpc) = (record.price, record.cpc);

    let replaced = !store.upsert(record).is_empty();
    outcome.applied += 1;
    if replaced {
        outcome.replaced += 1;
    }

    info!(hotel_id, advertiser_id, price, cpc, replaced, "offer upserted");
}
