pub mod catalog;
pub mod category_filter;
pub mod recommendation;
pub mod reply_parser;
pub mod similarity_index;

// Re-export public types
pub use catalog::Catalog;
pub use category_filter::{classify, Category};
pub use recommendation::RecommendationService;
pub use reply_parser::{parse_reply, ClassificationResult};
pub use similarity_index::{SearchHit, SimilarityIndex};
