use actix_web::web;

use crate::handlers::{health_check, recommend};

/// Configure all routes for the API
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(recommend);
}
