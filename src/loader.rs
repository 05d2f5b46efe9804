// Dataset loader: builds the indexed store from CSV files in a data directory

use crate::entities::{Advertiser, City, Hotel, OfferRecord, OfferUpdate};
use crate::error::LoadError;
use crate::ordering::SortedSet;
use crate::store::{IndexedStore, OfferIndex};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

pub const CITIES_FILE: &str = "cities.csv";
pub const ADVERTISERS_FILE: &str = "advertisers.csv";
pub const HOTELS_FILE: &str = "hotels.csv";
pub const OFFERS_FILE: &str = "hotel_advertiser.csv";

pub struct DatasetLoader {
    data_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    // Read all four files and index them
    pub fn load(&self) -> Result<IndexedStore, LoadError> {
        let cities = parse_cities(&self.read(CITIES_FILE)?)?;
        let advertisers = parse_advertisers(&self.read(ADVERTISERS_FILE)?)?;
        let hotels = parse_hotels(&self.read(HOTELS_FILE)?)?;
        let offers = parse_offers(&self.read(OFFERS_FILE)?)?;

        let store = IndexedStore::new(cities, advertisers, hotels, offers);
        info!(
            data_dir = %self.data_dir.display(),
            cities = store.cities().len(),
            advertisers = store.advertisers().len(),
            hotels = store.hotels().len(),
            offers = store.offer_count(),
            "dataset loaded"
        );
        Ok(store)
    }

    fn read(&self, file: &str) -> Result<String, LoadError> {
        let path = self.data_dir.join(file);
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }
}

// Rows are matched to fields by header name; surrounding whitespace is ignored
fn parse_rows<T: DeserializeOwned>(file: &str, text: &str) -> Result<Vec<T>, LoadError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Parse {
            file: file.to_string(),
            source,
        })
}

// Keyed by name; a repeated name keeps the last row
pub fn parse_cities(text: &str) -> Result<HashMap<String, City>, LoadError> {
    let mut cities = HashMap::new();
    for city in parse_rows::<City>(CITIES_FILE, text)? {
        if let Some(previous) = cities.insert(city.name.clone(), city) {
            warn!(city = %previous.name, id = previous.id, "duplicate city name, keeping last row");
        }
    }
    Ok(cities)
}

pub fn parse_advertisers(text: &str) -> Result<HashMap<i32, Advertiser>, LoadError> {
    Ok(parse_rows::<Advertiser>(ADVERTISERS_FILE, text)?
        .into_iter()
        .map(|advertiser| (advertiser.id, advertiser))
        .collect())
}

pub fn parse_hotels(text: &str) -> Result<HashMap<i32, Hotel>, LoadError> {
    Ok(parse_rows::<Hotel>(HOTELS_FILE, text)?
        .into_iter()
        .map(|hotel| (hotel.id, hotel))
        .collect())
}

/// Groups offer rows per hotel in storage order.
///
/// Loaded offers are trusted: dates must parse, business rules are not
/// checked. A repeated (hotel, advertiser) pair keeps the last row, the same
/// way an update would replace it.
pub fn parse_offers(text: &str) -> Result<OfferIndex, LoadError> {
    let mut offers = OfferIndex::new();

    for (index, row) in parse_rows::<OfferUpdate>(OFFERS_FILE, text)?
        .iter()
        .enumerate()
    {
        let record = OfferRecord::try_from(row).map_err(|source| LoadError::InvalidRecord {
            file: OFFERS_FILE.to_string(),
            index,
            source,
        })?;
        let set = offers
            .entry(record.hotel_id)
            .or_insert_with(SortedSet::in_storage_order);
        let dropped =
            set.remove_all_where(|existing| existing.advertiser_id == record.advertiser_id);
        if !dropped.is_empty() {
            warn!(
                hotel_id = record.hotel_id,
                advertiser_id = record.advertiser_id,
                index,
                "duplicate hotel advertiser row, keeping last row"
            );
        }
        set.insert(record);
    }

    Ok(offers)
}
