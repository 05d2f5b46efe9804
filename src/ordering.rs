// Ordering policies and the sorted container they are injected into

use crate::entities::{Hotel, Offer, OfferRecord};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub type Comparator<T> = fn(&T, &T) -> Ordering;

// Hotels grouped in results: rating descending, then id ascending so equal ratings never collapse
pub fn hotel_order(a: &Hotel, b: &Hotel) -> Ordering {
    b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id))
}

// Storage order: price ascending, cpc ascending, advertiser id ascending
pub fn storage_order(a: &OfferRecord, b: &OfferRecord) -> Ordering {
    a.price
        .cmp(&b.price)
        .then_with(|| a.cpc.cmp(&b.cpc))
        .then_with(|| a.advertiser_id.cmp(&b.advertiser_id))
}

// Presentation order: price ascending, cpc descending, advertiser id ascending
pub fn presentation_order(a: &Offer, b: &Offer) -> Ordering {
    a.price
        .cmp(&b.price)
        .then_with(|| b.cpc.cmp(&a.cpc))
        .then_with(|| a.advertiser_id.cmp(&b.advertiser_id))
}

/// Set kept sorted by an injected comparator.
///
/// Elements comparing equal under the comparator are treated as the same
/// element: inserting one when an equal element is present is a no-op.
#[derive(Clone)]
pub struct SortedSet<T> {
    items: Vec<T>,
    order: Comparator<T>,
}

impl<T> SortedSet<T> {
    pub fn new(order: Comparator<T>) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    // Returns false when an equal element is already present
    pub fn insert(&mut self, item: T) -> bool {
        let order = self.order;
        match self.items.binary_search_by(|probe| order(probe, &item)) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, item);
                true
            }
        }
    }

    // Removes every element matching the predicate, returned in set order
    pub fn remove_all_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| predicate(item));
        self.items = kept;
        removed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> SortedSet<T> {
    // New set with the same ordering holding the elements that satisfy the predicate
    pub fn filtered<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self {
            items: self.items.iter().filter(|item| predicate(item)).cloned().collect(),
            order: self.order,
        }
    }
}

impl SortedSet<OfferRecord> {
    pub fn in_storage_order() -> Self {
        Self::new(storage_order)
    }
}

impl SortedSet<Offer> {
    pub fn in_presentation_order() -> Self {
        Self::new(presentation_order)
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<'a, T> IntoIterator for &'a SortedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for SortedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(advertiser_id: i32, price: i32, cpc: i32) -> OfferRecord {
        OfferRecord {
            advertiser_id,
            hotel_id: 1,
            cpc,
            price,
            currency: "EUR".to_string(),
            availability_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            availability_end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    fn offer(advertiser_id: i32, price: i32, cpc: i32) -> Offer {
        Offer {
            advertiser_id,
            cpc,
            price,
            advertiser_name: format!("adv{}", advertiser_id),
            currency: "EUR".to_string(),
        }
    }

    fn hotel(id: i32, rating: i32) -> Hotel {
        Hotel {
            id,
            city_id: 1,
            clicks: 0,
            impressions: 0,
            name: format!("hotel{}", id),
            rating,
            stars: 3,
        }
    }

    #[test]
    fn test_storage_order_breaks_price_ties_by_cheapest_cpc() {
        let mut set = SortedSet::in_storage_order();
        set.insert(record(1, 100, 5));
        set.insert(record(2, 100, 2));
        set.insert(record(3, 80, 9));
        set.insert(record(4, 100, 2));

        let ids: Vec<i32> = set.iter().map(|r| r.advertiser_id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_presentation_order_breaks_price_ties_by_highest_cpc() {
        let mut set = SortedSet::in_presentation_order();
        set.insert(offer(1, 100, 5));
        set.insert(offer(2, 100, 2));
        set.insert(offer(3, 80, 9));
        set.insert(offer(4, 100, 5));

        let ids: Vec<i32> = set.iter().map(|o| o.advertiser_id).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_distinct_records_never_compare_equal() {
        let a = record(1, 100, 3);
        let b = record(2, 100, 3);
        assert_ne!(storage_order(&a, &b), Ordering::Equal);
        assert_eq!(storage_order(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_insert_ignores_equal_element() {
        let mut set = SortedSet::in_storage_order();
        assert!(set.insert(record(1, 100, 3)));
        assert!(!set.insert(record(1, 100, 3)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_hotel_order_keeps_same_rated_hotels_apart() {
        let mut hotels = vec![hotel(3, 4), hotel(1, 5), hotel(2, 4)];
        hotels.sort_by(hotel_order);
        let ids: Vec<i32> = hotels.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_ne!(hotel_order(&hotel(2, 4), &hotel(3, 4)), Ordering::Equal);
    }

    #[test]
    fn test_remove_and_filter_keep_ordering() {
        let mut set = SortedSet::in_storage_order();
        for (id, price) in [(1, 30), (2, 10), (3, 20)] {
            set.insert(record(id, price, 1));
        }

        let removed = set.remove_all_where(|r| r.advertiser_id == 2);
        assert_eq!(removed.iter().map(|r| r.price).collect::<Vec<_>>(), vec![10]);
        assert!(set.remove_all_where(|r| r.advertiser_id == 2).is_empty());

        let cheap = set.filtered(|r| r.price < 30);
        assert_eq!(cheap.len(), 1);
        // the filtered copy keeps the storage comparator
        let mut cheap = cheap;
        cheap.insert(record(9, 5, 1));
        assert_eq!(cheap.iter().next().map(|r| r.advertiser_id), Some(9));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_all_where_takes_every_match() {
        let mut set = SortedSet::in_storage_order();
        set.insert(record(5, 120, 2));
        set.insert(record(6, 100, 1));
        set.insert(record(5, 90, 4));

        let removed = set.remove_all_where(|r| r.advertiser_id == 5);

        assert_eq!(removed.iter().map(|r| r.price).collect::<Vec<_>>(), vec![90, 120]);
        assert_eq!(set.iter().map(|r| r.advertiser_id).collect::<Vec<_>>(), vec![6]);
        // remaining elements still insert in order
        assert!(set.insert(record(7, 50, 1)));
        assert_eq!(set.iter().next().map(|r| r.advertiser_id), Some(7));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let mut set = SortedSet::in_presentation_order();
        set.insert(offer(1, 20, 1));
        set.insert(offer(2, 10, 1));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["advertiser_id"], 2);
        assert_eq!(json.as_array().map(|a| a.len()), Some(2));
    }
}
