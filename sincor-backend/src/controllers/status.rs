//! Status, report, and metrics endpoints

use crate::AppState;
use crate::controllers::error_response;
use actix_web::{HttpResponse, Responder, web};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/status").route(web::get().to(get_status)));
    cfg.service(web::resource("/api/report").route(web::get().to(get_report)));
    cfg.service(web::resource("/api/metrics").route(web::get().to(get_metrics)));
}

async fn get_status(state: web::Data<AppState>) -> impl Responder {
    match state.orchestrator.status() {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => error_response(&e),
    }
}

async fn get_report(state: web::Data<AppState>) -> impl Responder {
    match state.orchestrator.report() {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

async fn get_metrics(state: web::Data<AppState>) -> impl Responder {
    match state.orchestrator.metrics() {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}
