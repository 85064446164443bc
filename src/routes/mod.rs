// Route exports
pub mod search;

pub use search::AppState;

use actix_web::web;

/// Mount the search surface at the root and under `/api`, where the browser front end posts
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").configure(search::configure_search))
        .configure(search::configure);
}

/// JSON extractor config that turns malformed bodies into a 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(crate::error::handle_json_payload_error)
}
