// Filter pipeline: availability window first, then city membership

use crate::entities::City;
use crate::error::CatalogError;
use crate::store::{IndexedStore, OfferIndex};
use chrono::NaiveDate;
use tracing::{debug, error};

// Run both stages against the store's offer index
pub fn filter_by_query(
    store: &IndexedStore,
    city: &City,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<OfferIndex, CatalogError> {
    let by_date = filter_by_date(store.offers(), start, end);
    filter_by_city(store, city, by_date)
}

// Keep offers whose availability contains [start, end]. Every hotel id survives, possibly with an empty set.
pub fn filter_by_date(offers: &OfferIndex, start: NaiveDate, end: NaiveDate) -> OfferIndex {
    let filtered: OfferIndex = offers
        .iter()
        .map(|(hotel_id, set)| (*hotel_id, set.filtered(|record| record.covers(start, end))))
        .collect();

    debug!(
        hotels = filtered.len(),
        offers = filtered.values().map(|s| s.len()).sum::<usize>(),
        %start,
        %end,
        "date filter applied"
    );
    filtered
}

// Keep hotels located in the given city. A hotel id unknown to the store is an inconsistency.
pub fn filter_by_city(
    store: &IndexedStore,
    city: &City,
    offers: OfferIndex,
) -> Result<OfferIndex, CatalogError> {
    let mut filtered = OfferIndex::new();

    for (hotel_id, set) in offers {
        let hotel = store.hotel(hotel_id).ok_or_else(|| {
            error!(hotel_id, "offer index references unknown hotel");
            CatalogError::Inconsistency(format!("offers reference unknown hotel {}", hotel_id))
        })?;

        if hotel.city_id == city.id {
            filtered.insert(hotel_id, set);
        }
    }

    debug!(city = %city.name, hotels = filtered.len(), "city filter applied");
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Hotel, OfferRecord};
    use crate::ordering::SortedSet;
    use std::collections::HashMap;

    fn date(text: &str) -> NaiveDate {
        crate::entities::parse_date("date", text).unwrap()
    }

    fn record(hotel_id: i32, advertiser_id: i32, start: &str, end: &str) -> OfferRecord {
        OfferRecord {
            advertiser_id,
            hotel_id,
            cpc: 1,
            price: 100 + advertiser_id,
            currency: "EUR".to_string(),
            availability_start_date: date(start),
            availability_end_date: date(end),
        }
    }

    fn hotel(id: i32, city_id: i32) -> Hotel {
        Hotel {
            id,
            city_id,
            clicks: 0,
            impressions: 0,
            name: format!("hotel{}", id),
            rating: 3,
            stars: 3,
        }
    }

    fn paris() -> City {
        City {
            id: 1,
            name: "Paris".to_string(),
        }
    }

    fn store(records: Vec<OfferRecord>, hotels: Vec<Hotel>) -> IndexedStore {
        let mut offers = OfferIndex::new();
        for r in records {
            offers
                .entry(r.hotel_id)
                .or_insert_with(SortedSet::in_storage_order)
                .insert(r);
        }
        let hotels: HashMap<i32, Hotel> = hotels.into_iter().map(|h| (h.id, h)).collect();
        IndexedStore::new(HashMap::new(), HashMap::new(), hotels, offers)
    }

    #[test]
    fn test_date_filter_keeps_every_hotel_and_order() {
        let store = store(
            vec![
                record(10, 1, "20240101", "20241231"),
                record(10, 2, "20240701", "20241231"),
                record(10, 3, "20240101", "20240610"),
                record(20, 4, "20250101", "20251231"),
            ],
            vec![],
        );

        let filtered = filter_by_date(store.offers(), date("20240601"), date("20240610"));

        assert_eq!(filtered.keys().copied().collect::<Vec<_>>(), vec![10, 20]);
        let kept: Vec<i32> = filtered[&10].iter().map(|r| r.advertiser_id).collect();
        assert_eq!(kept, vec![1, 3]);
        assert!(filtered[&20].is_empty());
        // the source index is untouched
        assert_eq!(store.offers()[&10].len(), 3);
    }

    #[test]
    fn test_city_filter_drops_other_cities() {
        let store = store(
            vec![
                record(10, 1, "20240101", "20241231"),
                record(20, 1, "20240101", "20241231"),
            ],
            vec![hotel(10, 1), hotel(20, 2)],
        );

        let filtered = filter_by_city(&store, &paris(), store.offers().clone()).unwrap();
        assert_eq!(filtered.keys().copied().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_city_filter_fails_on_unknown_hotel() {
        let store = store(vec![record(99, 1, "20240101", "20241231")], vec![hotel(10, 1)]);

        let err = filter_by_city(&store, &paris(), store.offers().clone()).unwrap_err();
        assert!(matches!(err, CatalogError::Inconsistency(_)));
    }

    #[test]
    fn test_query_composes_both_stages() {
        let store = store(
            vec![
                record(10, 1, "20240101", "20241231"),
                record(20, 2, "20240101", "20241231"),
                record(30, 3, "20250101", "20251231"),
            ],
            vec![hotel(10, 1), hotel(20, 2), hotel(30, 1)],
        );

        let filtered =
            filter_by_query(&store, &paris(), date("20240601"), date("20240610")).unwrap();

        assert_eq!(filtered.keys().copied().collect::<Vec<_>>(), vec![10, 30]);
        assert_eq!(filtered[&10].len(), 1);
        assert!(filtered[&30].is_empty());
    }
}
