// Search composer: filters the offer index, projects offers and groups them by hotel

use crate::entities::{Hotel, Offer, OfferRecord};
use crate::error::CatalogError;
use crate::filters::filter_by_query;
use crate::ordering::{hotel_order, SortedSet};
use crate::store::IndexedStore;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error};

// One hotel of a search result with its offers in presentation order
#[derive(Debug, Clone, Serialize)]
pub struct HotelOffers {
    pub hotel: Hotel,
    pub offers: SortedSet<Offer>,
}

// Hotels in hotel order. Empty when nothing matched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SearchResult {
    hotels: Vec<HotelOffers>,
}

impl SearchResult {
    pub fn hotels(&self) -> &[HotelOffers] {
        &self.hotels
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    pub fn offer_count(&self) -> usize {
        self.hotels.iter().map(|h| h.offers.len()).sum()
    }
}

/// Answers "which offers are available in `city_name` for the whole of
/// `[start, end]`".
///
/// An unknown city fails with [`CatalogError::CityNotFound`]; a known city
/// with nothing available yields an empty result.
pub fn search(
    store: &IndexedStore,
    city_name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SearchResult, CatalogError> {
    let city = store
        .city(city_name)
        .ok_or_else(|| CatalogError::CityNotFound(city_name.to_string()))?;

    let filtered = filter_by_query(store, city, start, end)?;

    let mut hotels = Vec::new();
    for (hotel_id, records) in &filtered {
        let mut offers = SortedSet::in_presentation_order();
        for record in records {
            offers.insert(project_offer(store, record)?);
        }

        if offers.is_empty() {
            continue;
        }

        let hotel = store.hotel(*hotel_id).ok_or_else(|| {
            CatalogError::Inconsistency(format!("offers reference unknown hotel {}", hotel_id))
        })?;
        hotels.push(HotelOffers {
            hotel: hotel.clone(),
            offers,
        });
    }

    hotels.sort_by(|a, b| hotel_order(&a.hotel, &b.hotel));

    let result = SearchResult { hotels };
    debug!(
        city = city_name,
        hotels = result.len(),
        offers = result.offer_count(),
        "search composed"
    );
    Ok(result)
}

fn project_offer(store: &IndexedStore, record: &OfferRecord) -> Result<Offer, CatalogError> {
    let advertiser = store.advertiser(record.advertiser_id).ok_or_else(|| {
        error!(
            advertiser_id = record.advertiser_id,
            hotel_id = record.hotel_id,
            "offer references unknown advertiser"
        );
        CatalogError::Inconsistency(format!(
            "offer for hotel {} references unknown advertiser {}",
            record.hotel_id, record.advertiser_id
        ))
    })?;
    Ok(Offer::project(record, advertiser))
}
