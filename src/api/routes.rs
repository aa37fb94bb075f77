// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::results_page))
        .service(
            web::scope("/results")
                .route("", web::get().to(handlers::results_page))
                .route("/fragment", web::get().to(handlers::results_fragment))
                .route("/status", web::get().to(handlers::results_status))
        )
        .route("/{_:.*}", web::get().to(handlers::static_file_handler));
}
