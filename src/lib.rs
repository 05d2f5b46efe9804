// Hotel offer search: indexed in-memory offers, date/city filtering and offer upserts

pub mod api;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod filters;
pub mod loader;
pub mod ordering;
pub mod search;
pub mod store;
pub mod upsert;

// Re-export key types for convenience
pub use catalog::{CatalogStatsReport, HotelCatalog, OfferCatalog};
pub use config::{BatchMode, CatalogConfig, ServerConfig};
pub use entities::{Advertiser, City, Hotel, Offer, OfferRecord, OfferUpdate};
pub use error::{BatchError, CatalogError, LoadError};
pub use loader::DatasetLoader;
pub use ordering::SortedSet;
pub use search::{HotelOffers, SearchResult};
pub use store::{IndexedStore, OfferIndex};
pub use upsert::UpsertOutcome;
