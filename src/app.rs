use crate::{
    config::Config,
    error::Result,
    ml::{OpenAiEmbedder, OpenAiVisionClient},
    routes::api_routes,
    services::{Catalog, RecommendationService, SimilarityIndex},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Load the catalog, embed it and wire up the provider clients.
    /// Any failure here is fatal: the service never starts without its index.
    pub async fn build_service(&self) -> Result<RecommendationService> {
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        let catalog = Catalog::load(Path::new(&self.config.catalog_path), self.config.catalog_limit)
            .context("Failed to load product catalog")?;

        let embedder = OpenAiEmbedder::new(
            &self.config.openai_api_key,
            &self.config.openai_base_url,
            &self.config.embedding_model,
            timeout,
        )
        .context("Failed to initialize embedding client")?;

        let index = SimilarityIndex::build(
            catalog,
            Arc::new(embedder),
            self.config.embedding_batch_size,
        )
        .await
        .context("Failed to build similarity index")?;

        let vision = OpenAiVisionClient::new(
            &self.config.openai_api_key,
            &self.config.openai_base_url,
            &self.config.chat_model,
            timeout,
        )
        .context("Failed to initialize vision client")?;

        Ok(RecommendationService::new(
            index,
            Arc::new(vision),
            self.config.recommendations_per_category,
        ))
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let recommendation_service = web::Data::new(self.build_service().await?);
        info!(
            "Recommendation service ready with {} catalog items",
            recommendation_service.catalog_size()
        );

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(recommendation_service.clone())
                .configure(api_routes)
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
