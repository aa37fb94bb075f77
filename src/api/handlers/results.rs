// src/api/handlers/results.rs
use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use crate::api::AppState;
use crate::api::page::render_page;
use crate::poller::PollerStatus;

#[derive(Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub interval_ms: u64,
    pub update_url: String,
    #[serde(flatten)]
    pub status: PollerStatus,
}

pub async fn results_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    let container = state.poller.container();
    let html = {
        let container = container.read().await;
        render_page(&container, state.poller.interval())
    };
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

pub async fn results_fragment(state: web::Data<AppState>) -> Result<HttpResponse> {
    let container = state.poller.container();
    let html = container.read().await.inner_html();
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

pub async fn results_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(StatusResponse {
        running: state.poller.is_running(),
        interval_ms: state.config.interval_ms,
        update_url: state.config.update_url(),
        status: state.poller.status().await,
    }))
}
