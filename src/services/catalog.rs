use crate::error::{ApiError, Result};
use crate::models::{CatalogItem, CatalogRecord};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CATALOG_LIMIT: usize = 50;

/// Product table loaded once at startup; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Loads the first `limit` rows of the CSV at `path`.
    pub fn load(path: &Path, limit: usize) -> Result<Self> {
        info!("Reading catalog from {}", path.display());
        let file = File::open(path).map_err(|e| {
            ApiError::CatalogError(format!("Cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, limit)
    }

    pub fn from_reader<R: Read>(reader: R, limit: usize) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut items = Vec::with_capacity(limit);
        for (row_index, result) in rdr.deserialize::<CatalogRecord>().take(limit).enumerate() {
            let record = result.map_err(|e| {
                ApiError::CatalogError(format!("Malformed catalog row {}: {}", row_index, e))
            })?;
            items.push(CatalogItem::from_record(row_index, record));
        }

        if items.is_empty() {
            return Err(ApiError::CatalogError(
                "Catalog contains no products".to_string(),
            ));
        }

        info!("Loaded {} catalog items", items.len());
        Ok(Self { items })
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, row_index: usize) -> Option<&CatalogItem> {
        self.items.get(row_index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
