// In-memory indexed dataset: cities by name, advertisers and hotels by id, offers per hotel

use crate::entities::{Advertiser, City, Hotel, OfferRecord};
use crate::ordering::SortedSet;
use std::collections::{BTreeMap, HashMap};

// Hotel id -> offers in storage order, hotel ids ascending
pub type OfferIndex = BTreeMap<i32, SortedSet<OfferRecord>>;

#[derive(Debug, Clone, Default)]
pub struct IndexedStore {
    cities: HashMap<String, City>,
    advertisers: HashMap<i32, Advertiser>,
    hotels: HashMap<i32, Hotel>,
    offers: OfferIndex,
}

impl IndexedStore {
    pub fn new(
        cities: HashMap<String, City>,
        advertisers: HashMap<i32, Advertiser>,
        hotels: HashMap<i32, Hotel>,
        offers: OfferIndex,
    ) -> Self {
        Self {
            cities,
            advertisers,
            hotels,
            offers,
        }
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    pub fn advertiser(&self, id: i32) -> Option<&Advertiser> {
        self.advertisers.get(&id)
    }

    pub fn hotel(&self, id: i32) -> Option<&Hotel> {
        self.hotels.get(&id)
    }

    pub fn cities(&self) -> &HashMap<String, City> {
        &self.cities
    }

    pub fn advertisers(&self) -> &HashMap<i32, Advertiser> {
        &self.advertisers
    }

    pub fn hotels(&self) -> &HashMap<i32, Hotel> {
        &self.hotels
    }

    pub fn offers(&self) -> &OfferIndex {
        &self.offers
    }

    pub fn offers_for(&self, hotel_id: i32) -> Option<&SortedSet<OfferRecord>> {
        self.offers.get(&hotel_id)
    }

    pub fn offer_count(&self) -> usize {
        self.offers.values().map(SortedSet::len).sum()
    }

    /// Replaces the hotel's offers from the same advertiser with `record`, or adds it.
    ///
    /// Every existing record for the (hotel, advertiser) pair is removed, so
    /// exactly one remains afterwards. Returns the removed records.
    pub fn upsert(&mut self, record: OfferRecord) -> Vec<OfferRecord> {
        let offers = self
            .offers
            .entry(record.hotel_id)
            .or_insert_with(SortedSet::in_storage_order);

        let replaced =
            offers.remove_all_where(|existing| existing.advertiser_id == record.advertiser_id);
        offers.insert(record);
        replaced
    }
}
