use crate::error::{ApiError, Result};
use crate::ml::Embedder;
use crate::models::CatalogItem;
use crate::services::catalog::Catalog;
use ndarray::{Array2, ArrayView1};
use std::sync::Arc;
use tracing::{debug, info};

/// A catalog item with its squared L2 distance to the query. Lower is closer.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub item: &'a CatalogItem,
    pub distance: f32,
}

/// Exact nearest-neighbour index over catalog name embeddings.
///
/// Row `i` of `vectors` is the embedding of the catalog item with `row_index == i`.
/// Built once at startup and never mutated, so it is shared across requests without locking.
pub struct SimilarityIndex {
    catalog: Catalog,
    vectors: Array2<f32>,
    embedder: Arc<dyn Embedder>,
}

impl SimilarityIndex {
    /// Embeds every catalog name, `batch_size` names per provider call.
    pub async fn build(
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Result<Self> {
        let names: Vec<String> = catalog.items().iter().map(|item| item.name.clone()).collect();
        info!("Embedding {} catalog names", names.len());

        let mut embeddings = Vec::with_capacity(names.len());
        for batch in names.chunks(batch_size.max(1)) {
            let vectors = embedder.embed_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(ApiError::ModelInferenceError(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    vectors.len()
                )));
            }
            embeddings.extend(vectors);
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(ApiError::ModelInferenceError(
                "Embedding provider returned empty vectors".to_string(),
            ));
        }
        if let Some(row) = embeddings.iter().position(|v| v.len() != dimension) {
            return Err(ApiError::ModelInferenceError(format!(
                "Embedding for row {} has dimension {}, expected {}",
                row,
                embeddings[row].len(),
                dimension
            )));
        }

        let rows = embeddings.len();
        let flat: Vec<f32> = embeddings.into_iter().flatten().collect();
        let vectors = Array2::from_shape_vec((rows, dimension), flat)?;

        info!("Similarity index ready: {} vectors of dimension {}", rows, dimension);
        Ok(Self {
            catalog,
            vectors,
            embedder,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Embeds `query` and returns at most `k` items, closest first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit<'_>>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self.embedder.embed(query).await?;
        debug!("Searching {} nearest items for {:?}", k, query);
        self.nearest(&query_vector, k)
    }

    /// Brute-force scan; ties keep catalog order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        if query.len() != self.dimension() {
            return Err(ApiError::ModelInferenceError(format!(
                "Query embedding has dimension {}, index expects {}",
                query.len(),
                self.dimension()
            )));
        }

        let query = ArrayView1::from(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .rows()
            .into_iter()
            .enumerate()
            .map(|(row, vector)| {
                let diff = &vector - &query;
                (row, diff.dot(&diff))
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .filter_map(|(row, distance)| {
                self.catalog
                    .get(row)
                    .map(|item| SearchHit { item, distance })
            })
            .collect())
    }
}
