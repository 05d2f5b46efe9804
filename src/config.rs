// Configuration for the catalog and the HTTP server

use std::net::SocketAddr;
use std::path::PathBuf;

// How an update batch behaves when one of its items is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    // Items applied in order; the first rejection stops the batch and earlier items stay applied
    #[default]
    Sequential,
    // Every item is checked before any is applied; a rejection leaves the store unchanged
    Atomic,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub batch_mode: BatchMode,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub catalog: CatalogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("samples"),
            catalog: CatalogConfig::default(),
        }
    }
}
