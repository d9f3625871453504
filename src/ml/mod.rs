pub mod openai_embedder;
pub mod vision_classifier;

#[cfg(test)]
pub(crate) mod fake_provider;

pub use openai_embedder::{Embedder, OpenAiEmbedder};
pub use vision_classifier::{OpenAiVisionClient, VisionModel, CLASSIFICATION_PROMPT};
