use crate::error::Result;
use crate::ml::VisionModel;
use crate::models::{
    CatalogItem, ProductSuggestion, RecommendationResponse, Recommendations, UploadedImage,
};
use crate::services::{
    category_filter::Category,
    reply_parser::{parse_reply, ClassificationResult},
    similarity_index::SimilarityIndex,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_RECOMMENDATIONS_PER_CATEGORY: usize = 2;

/// Classifies an uploaded garment and matches the model's suggestions against the catalog.
///
/// Holds only read-only state; a single instance serves all requests.
pub struct RecommendationService {
    index: SimilarityIndex,
    vision: Arc<dyn VisionModel>,
    per_category: usize,
}

impl RecommendationService {
    pub fn new(index: SimilarityIndex, vision: Arc<dyn VisionModel>, per_category: usize) -> Self {
        Self {
            index,
            vision,
            per_category,
        }
    }

    pub fn catalog_size(&self) -> usize {
        self.index.catalog().len()
    }

    /// Oversamples `2 * top_k` neighbours, then keeps those whose name matches `filter`.
    /// May return fewer than `top_k` items when the candidate pool is short on matches.
    pub async fn fetch_matching(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<Category>,
    ) -> Result<Vec<&CatalogItem>> {
        let hits = self.index.search(query, top_k.saturating_mul(2)).await?;

        let mut results = Vec::with_capacity(top_k.min(hits.len()));
        for hit in hits {
            if results.len() >= top_k {
                break;
            }
            if filter.map_or(true, |category| category.matches(&hit.item.name)) {
                results.push(hit.item);
            }
        }

        debug!(
            "Query {:?} ({}) matched {} of {} requested",
            query,
            filter.map_or("any", |c| c.as_str()),
            results.len(),
            top_k
        );
        Ok(results)
    }

    /// Runs the full classify, parse, match pipeline for one upload.
    pub async fn recommend(&self, image: &UploadedImage) -> Result<RecommendationResponse> {
        let data_url = image.to_data_url();

        let reply = self.vision.classify_image(&data_url).await?;
        let classification = parse_reply(&reply);
        info!(
            "Classified upload as {:?}",
            if classification.given.is_empty() {
                "<none>"
            } else {
                classification.given.as_str()
            }
        );

        let recommendations = self.assemble(&classification).await?;

        Ok(RecommendationResponse {
            uploaded_image: data_url,
            given_category: classification.given,
            recommendations,
        })
    }

    async fn assemble(&self, classification: &ClassificationResult) -> Result<Recommendations> {
        let mut recommendations = Recommendations::default();

        let Some(given) = classification.category() else {
            return Ok(recommendations);
        };

        for category in given.complements() {
            let query = classification.query_for(category);
            if query.is_empty() {
                continue;
            }

            let suggestions: Vec<ProductSuggestion> = self
                .fetch_matching(query, self.per_category, Some(category))
                .await?
                .into_iter()
                .map(ProductSuggestion::from)
                .collect();

            match category {
                Category::Top => recommendations.top = suggestions,
                Category::Bottom => recommendations.bottom = suggestions,
                Category::Accessory => recommendations.accessory = suggestions,
            }
        }

        Ok(recommendations)
    }
}
