use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

pub use product::{CatalogItem, CatalogRecord, ProductSuggestion};

mod product;

pub const DEFAULT_IMAGE_MIME: &str = "application/octet-stream";

/// Raw image bytes received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        let mime_type = mime_type
            .filter(|mime| !mime.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        Self { bytes, mime_type }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Complementary products grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub top: Vec<ProductSuggestion>,
    pub bottom: Vec<ProductSuggestion>,
    pub accessory: Vec<ProductSuggestion>,
}

/// Response body of `POST /recommend`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub uploaded_image: String,
    pub given_category: String,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub catalog_size: usize,
}
