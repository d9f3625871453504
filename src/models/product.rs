use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parse a catalog number that may carry currency signs, thousands separators or padding.
/// An empty cell reads as zero.
pub fn parse_catalog_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return if raw.trim().is_empty() { Some(0.0) } else { None };
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn deserialize_catalog_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_catalog_number(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid number: {:?}", raw)))
}

/// Integral values go out as JSON integers, everything else as floats.
pub fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// One row of the product CSV as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_catalog_number")]
    pub price: f64,
    #[serde(deserialize_with = "deserialize_catalog_number")]
    pub discount: f64,
    pub purl: String,
    pub img: String,
}

/// A product held in memory for the lifetime of the service. Identity is `row_index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub row_index: usize,
    pub name: String,
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,
    #[serde(serialize_with = "serialize_number")]
    pub discount: f64,
    pub purchase_url: String,
    pub image_url: String,
}

impl CatalogItem {
    pub fn from_record(row_index: usize, record: CatalogRecord) -> Self {
        Self {
            row_index,
            name: record.name,
            price: record.price,
            discount: record.discount,
            purchase_url: record.purl,
            image_url: record.img,
        }
    }
}

/// Product entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub name: String,
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,
    #[serde(serialize_with = "serialize_number")]
    pub discount: f64,
    pub url: String,
    pub image: String,
}

impl From<&CatalogItem> for ProductSuggestion {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            discount: item.discount,
            url: item.purchase_url.clone(),
            image: item.image_url.clone(),
        }
    }
}
