// Entities read by the offer engine and the date codec shared by loader, updates and transport

use crate::error::CatalogError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Dates travel as 8-digit text on every external interface
pub const DATE_FORMAT: &str = "%Y%m%d";

// Parse a `YYYYMMDD` date, naming the field in the error
pub fn parse_date(field: &'static str, text: &str) -> Result<NaiveDate, CatalogError> {
    let invalid = || CatalogError::InvalidDate {
        field,
        value: text.to_string(),
    };

    // chrono accepts signed or short years for %Y, so pin the shape first
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i32,
    #[serde(rename = "city_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertiser {
    pub id: i32,
    #[serde(rename = "advertiser_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i32,
    pub city_id: i32,
    pub clicks: i32,
    pub impressions: i32,
    pub name: String,
    pub rating: i32,
    pub stars: i32,
}

// Stored offer: one per (hotel, advertiser) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRecord {
    pub advertiser_id: i32,
    pub hotel_id: i32,
    pub cpc: i32,
    pub price: i32,
    pub currency: String,
    pub availability_start_date: NaiveDate,
    pub availability_end_date: NaiveDate,
}

impl OfferRecord {
    // Whether the queried window lies inside this record's availability, bounds inclusive
    pub fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.availability_start_date <= start && self.availability_end_date >= end
    }
}

// Incoming offer with text dates, as posted by clients and as stored in dataset files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferUpdate {
    pub advertiser_id: i32,
    pub hotel_id: i32,
    pub cpc: i32,
    pub price: i32,
    pub currency: String,
    pub availability_start_date: String,
    pub availability_end_date: String,
}

// Parses dates only; business rules are checked by the upsert path
impl TryFrom<&OfferUpdate> for OfferRecord {
    type Error = CatalogError;

    fn try_from(item: &OfferUpdate) -> Result<Self, Self::Error> {
        Ok(OfferRecord {
            advertiser_id: item.advertiser_id,
            hotel_id: item.hotel_id,
            cpc: item.cpc,
            price: item.price,
            currency: item.currency.clone(),
            availability_start_date: parse_date(
                "availability_start_date",
                &item.availability_start_date,
            )?,
            availability_end_date: parse_date(
                "availability_end_date",
                &item.availability_end_date,
            )?,
        })
    }
}

impl From<&OfferRecord> for OfferUpdate {
    fn from(record: &OfferRecord) -> Self {
        OfferUpdate {
            advertiser_id: record.advertiser_id,
            hotel_id: record.hotel_id,
            cpc: record.cpc,
            price: record.price,
            currency: record.currency.clone(),
            availability_start_date: format_date(record.availability_start_date),
            availability_end_date: format_date(record.availability_end_date),
        }
    }
}

// Read-only projection of an offer record for search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub advertiser_id: i32,
    pub cpc: i32,
    pub price: i32,
    pub advertiser_name: String,
    pub currency: String,
}

impl Offer {
    pub fn project(record: &OfferRecord, advertiser: &Advertiser) -> Self {
        Offer {
            advertiser_id: record.advertiser_id,
            cpc: record.cpc,
            price: record.price,
            advertiser_name: advertiser.name.clone(),
            currency: record.currency.clone(),
        }
    }
}
